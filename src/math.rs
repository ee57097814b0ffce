//! 2D geometry kernel shared by mesh operations and quality measures.
//!
//! All functions are pure and work on `glam::DVec2` positions. Triangle
//! orientation follows the usual convention: positive signed area means
//! counter-clockwise winding.

use glam::DVec2;

/// Signed area of the triangle `(a, b, c)`. Positive for CCW winding.
#[inline]
pub fn signed_triangle_area(a: DVec2, b: DVec2, c: DVec2) -> f64 {
  ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)) * 0.5
}

/// Absolute area of the triangle `(a, b, c)`.
#[inline]
pub fn triangle_area(a: DVec2, b: DVec2, c: DVec2) -> f64 {
  signed_triangle_area(a, b, c).abs()
}

/// True when `(v0, v1, v2)` wind counter-clockwise.
///
/// The corners are recentred on their barycentre before the area test, which
/// keeps the sign stable for triangles far from the origin.
#[inline]
pub fn is_ccw(v0: DVec2, v1: DVec2, v2: DVec2) -> bool {
  let vc = (v0 + v1 + v2) / 3.0;
  signed_triangle_area(v0 - vc, v1 - vc, v2 - vc) > 0.0
}

/// Length of the segment `(a, b)`.
#[inline]
pub fn edge_length(a: DVec2, b: DVec2) -> f64 {
  (a - b).length()
}

/// Interior angle at `v1` between the segments `(v0, v1)` and `(v2, v1)`,
/// in radians.
pub fn corner_angle(v0: DVec2, v1: DVec2, v2: DVec2) -> f64 {
  let a = v0 - v1;
  let b = v2 - v1;

  let aa = a.length_squared();
  let bb = b.length_squared();
  debug_assert!(aa > 0.0 && bb > 0.0, "corner_angle: zero length edge");

  let value = a.dot(b) / (aa.sqrt() * bb.sqrt());
  value.clamp(-1.0, 1.0).acos()
}

/// Ratio of the median to the shortest edge of the triangle `(a, b, c)`.
/// Large values flag needle shapes.
pub fn maxmin_edge_ratio(a: DVec2, b: DVec2, c: DVec2) -> f64 {
  let mut lengths = [edge_length(a, b), edge_length(b, c), edge_length(c, a)];
  lengths.sort_by(|x, y| x.partial_cmp(y).expect("edge lengths are finite"));
  debug_assert!(lengths[0] > 0.0, "maxmin_edge_ratio: degenerate triangle");

  lengths[1] / lengths[0]
}

/// Normalised area-to-edge ratio of the triangle `(a, b, c)`.
/// Equals 1 for an equilateral triangle and approaches 0 for caps and
/// needles.
pub fn area_edge_ratio(a: DVec2, b: DVec2, c: DVec2) -> f64 {
  let factor = 4.0 / 3.0f64.sqrt();

  let mut lengths = [edge_length(a, b), edge_length(b, c), edge_length(c, a)];
  lengths.sort_by(|x, y| x.partial_cmp(y).expect("edge lengths are finite"));
  debug_assert!(lengths[0] > 0.0, "area_edge_ratio: degenerate triangle");

  (factor * triangle_area(a, b, c)) / (lengths[2] * lengths[1])
}

/// Time at which the triangle `(v1, v2, v3)`, whose corners move with
/// constant velocities `(u1, u2, u3)`, degenerates to zero area.
///
/// Returns `None` when the triangle never collapses under the given
/// velocity field (including the area-preserving case). The returned time
/// may be negative when the collapse lies in the past; callers interested
/// in forward motion should filter on sign.
pub fn collapse_time(
  v1: DVec2,
  v2: DVec2,
  v3: DVec2,
  u1: DVec2,
  u2: DVec2,
  u3: DVec2,
) -> Option<f64> {
  let e12 = v2 - v1;
  let e13 = v3 - v1;
  let u12 = u2 - u1;
  let u13 = u3 - u1;

  // Area(t) is quadratic in t: a t^2 + b t + c, up to the constant 1/2.
  let a = u12.x * u13.y - u12.y * u13.x;
  let b = u12.x * e13.y + e12.x * u13.y - u12.y * e13.x - e12.y * u13.x;
  let c = e12.x * e13.y - e12.y * e13.x;

  if a.abs() == 0.0 {
    if b.abs() == 0.0 {
      return None;
    }
    return Some(-c / b);
  }

  let delta = b * b - 4.0 * a * c;
  if delta <= 0.0 {
    return None;
  }

  let root = (-b - delta.sqrt()) / (2.0 * a);
  if root >= 0.0 {
    return Some(root);
  }

  Some((-b + delta.sqrt()) / (2.0 * a))
}

/// Degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
  degrees * std::f64::consts::PI / 180.0
}

#[cfg(test)]
#[path = "math_test.rs"]
mod math_test;
