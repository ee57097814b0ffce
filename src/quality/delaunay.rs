//! Local Delaunay test for edge flipping.

use glam::DVec2;

use crate::attributes::AttributeStore;
use crate::math::is_ccw;
use crate::mesh::Mesh;
use crate::quality::QualityMeasure;
use crate::simplex::{Simplex, Simplex0};
use crate::util::triangle_signed_area;

/// An edge is bad when the quadrilateral formed by its two cofaces fails
/// the incircle test, i.e. flipping the edge would restore local
/// Delaunay-ness. Edges next to an already inverted triangle are never
/// flagged; flipping them could not help.
pub struct Delaunay;

impl Delaunay {
  pub fn new() -> Self {
    Self
  }
}

impl Default for Delaunay {
  fn default() -> Self {
    Self::new()
  }
}

fn det3(
  m00: f64,
  m01: f64,
  m02: f64,
  m10: f64,
  m11: f64,
  m12: f64,
  m20: f64,
  m21: f64,
  m22: f64,
) -> f64 {
  m00 * (m11 * m22 - m12 * m21) - m01 * (m10 * m22 - m12 * m20) + m02 * (m10 * m21 - m11 * m20)
}

/// Incircle test: true when `d` lies strictly inside the circumcircle of
/// the CCW triangle `(a, b, c)`.
fn should_flip(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
  let (b, c) = if is_ccw(a, b, c) { (b, c) } else { (c, b) };

  let dxdx = d.x * d.x;
  let dydy = d.y * d.y;

  det3(
    a.x - d.x,
    a.y - d.y,
    (a.x * a.x - dxdx) + (a.y * a.y - dydy),
    b.x - d.x,
    b.y - d.y,
    (b.x * b.x - dxdx) + (b.y * b.y - dydy),
    c.x - d.x,
    c.y - d.y,
    (c.x * c.x - dxdx) + (c.y * c.y - dydy),
  ) > 0.0
}

impl QualityMeasure for Delaunay {
  fn dimension(&self) -> u32 {
    1
  }

  fn is_bad(&self, s: Simplex, mesh: &Mesh, attributes: &AttributeStore) -> bool {
    let Simplex::Edge(e) = s else { return false };

    let cofaces = mesh.edge_cofaces(e);
    if cofaces.len() != 2 {
      return false;
    }

    if triangle_signed_area(mesh, attributes, cofaces[0]) <= 0.0
      || triangle_signed_area(mesh, attributes, cofaces[1]) <= 0.0
    {
      return false;
    }

    let opposites: [Simplex0; 2] = [
      cofaces[0].opposite_vertex(e),
      cofaces[1].opposite_vertex(e),
    ];
    let (v1, v2) = e.endpoints();

    should_flip(
      attributes.current(v1),
      attributes.current(v2),
      attributes.current(opposites[0]),
      attributes.current(opposites[1]),
    )
  }
}

#[cfg(test)]
#[path = "delaunay_test.rs"]
mod delaunay_test;
