use glam::DVec2;

use super::*;

const EPS: f64 = 1e-12;

#[test]
fn signed_area_sign_follows_winding() {
  let a = DVec2::new(0.0, 0.0);
  let b = DVec2::new(1.0, 0.0);
  let c = DVec2::new(0.0, 1.0);

  assert!((signed_triangle_area(a, b, c) - 0.5).abs() < EPS);
  assert!((signed_triangle_area(a, c, b) + 0.5).abs() < EPS);
}

#[test]
fn degenerate_triangle_has_zero_area() {
  let a = DVec2::new(0.0, 0.0);
  let b = DVec2::new(1.0, 1.0);
  let c = DVec2::new(2.0, 2.0);

  assert!(signed_triangle_area(a, b, c).abs() < EPS);
}

#[test]
fn ccw_is_translation_invariant() {
  let offset = DVec2::new(1.0e6, -3.0e6);
  let a = DVec2::new(0.0, 0.0);
  let b = DVec2::new(1.0, 0.0);
  let c = DVec2::new(0.0, 1.0);

  assert!(is_ccw(a, b, c));
  assert!(is_ccw(a + offset, b + offset, c + offset));
  assert!(!is_ccw(a, c, b));
}

#[test]
fn right_angle_measures_half_pi() {
  let v0 = DVec2::new(1.0, 0.0);
  let v1 = DVec2::new(0.0, 0.0);
  let v2 = DVec2::new(0.0, 1.0);

  assert!((corner_angle(v0, v1, v2) - std::f64::consts::FRAC_PI_2).abs() < EPS);
}

#[test]
fn straight_interface_measures_pi() {
  let v0 = DVec2::new(-1.0, 0.0);
  let v1 = DVec2::new(0.0, 0.0);
  let v2 = DVec2::new(1.0, 0.0);

  assert!((corner_angle(v0, v1, v2) - std::f64::consts::PI).abs() < EPS);
}

#[test]
fn equilateral_triangle_is_perfectly_shaped() {
  let a = DVec2::new(0.0, 0.0);
  let b = DVec2::new(1.0, 0.0);
  let c = DVec2::new(0.5, 3.0f64.sqrt() / 2.0);

  assert!((area_edge_ratio(a, b, c) - 1.0).abs() < 1e-9);
  assert!((maxmin_edge_ratio(a, b, c) - 1.0).abs() < 1e-9);
}

#[test]
fn needle_has_poor_shape_ratios() {
  let a = DVec2::new(0.0, 0.0);
  let b = DVec2::new(1.0, 0.0);
  let c = DVec2::new(0.5, 0.01);

  assert!(area_edge_ratio(a, b, c) < 0.1);
  assert!(maxmin_edge_ratio(a, b, c) > 10.0);
}

#[test]
fn collapse_time_linear_case() {
  // One corner translates onto the opposite edge with constant speed;
  // the area shrinks linearly and vanishes at t = 1.
  let v1 = DVec2::new(0.0, 0.0);
  let v2 = DVec2::new(1.0, 0.0);
  let v3 = DVec2::new(0.0, 1.0);

  let u = DVec2::new(0.0, -1.0);
  let t = collapse_time(v1, v2, v3, DVec2::ZERO, DVec2::ZERO, u)
    .expect("triangle collapses");

  assert!((t - 1.0).abs() < EPS);
}

#[test]
fn collapse_time_none_for_rigid_translation() {
  let v1 = DVec2::new(0.0, 0.0);
  let v2 = DVec2::new(1.0, 0.0);
  let v3 = DVec2::new(0.0, 1.0);
  let u = DVec2::new(0.25, -0.75);

  assert!(collapse_time(v1, v2, v3, u, u, u).is_none());
}

#[test]
fn collapse_time_quadratic_case() {
  // Two corners move towards each other; the area is quadratic in t.
  let v1 = DVec2::new(0.0, 0.0);
  let v2 = DVec2::new(1.0, 0.0);
  let v3 = DVec2::new(0.5, 1.0);

  let t = collapse_time(
    v1,
    v2,
    v3,
    DVec2::new(0.5, 0.0),
    DVec2::new(-0.5, 0.0),
    DVec2::ZERO,
  )
  .expect("triangle collapses");

  assert!(t > 0.0);
  // At the returned time the displaced corners are coincident.
  let p1 = v1 + DVec2::new(0.5, 0.0) * t;
  let p2 = v2 + DVec2::new(-0.5, 0.0) * t;
  assert!(signed_triangle_area(p1, p2, v3).abs() < 1e-9);
}

#[test]
fn deg_to_rad_round_values() {
  assert!((deg_to_rad(180.0) - std::f64::consts::PI).abs() < EPS);
  assert!((deg_to_rad(90.0) - std::f64::consts::FRAC_PI_2).abs() < EPS);
}
