//! Interface flatness test for interface smoothing.

use crate::attributes::AttributeStore;
use crate::logic::Expr;
use crate::math::{corner_angle, deg_to_rad};
use crate::mesh::Mesh;
use crate::params::Parameters;
use crate::quality::QualityMeasure;
use crate::simplex::Simplex;

/// A vertex qualifies when it sits on a 2-valent interface and the angle
/// its two interface neighbours span at it exceeds the threshold, i.e. the
/// interface is already close to straight there and smoothing the vertex
/// cannot distort the phase shape.
pub struct InterfaceFlatness {
  angle_threshold: f64,
}

impl InterfaceFlatness {
  pub fn new(operation_name: &str, label: u32, parameters: &Parameters) -> Self {
    Self {
      angle_threshold: deg_to_rad(parameters.angle_threshold(operation_name, label)),
    }
  }
}

impl QualityMeasure for InterfaceFlatness {
  fn dimension(&self) -> u32 {
    0
  }

  fn is_bad(&self, s: Simplex, mesh: &Mesh, attributes: &AttributeStore) -> bool {
    let Simplex::Vertex(v) = s else { return false };

    if mesh.is_submesh_boundary(v) || !mesh.is_interface(v) || mesh.is_boundary(v) {
      return false;
    }

    let interface_edges = mesh
      .star(v)
      .filter(mesh, &Expr::IsDimension(1).and(Expr::IsInterface));

    let mut neighbours = mesh.closure_set(&interface_edges);
    neighbours.remove(v);
    if neighbours.size(0) != 2 {
      return false;
    }

    let mut it = neighbours.vertices();
    let p = it.next().expect("two interface neighbours");
    let q = it.next().expect("two interface neighbours");

    corner_angle(
      attributes.current(p),
      attributes.current(v),
      attributes.current(q),
    ) > self.angle_threshold
  }
}

#[cfg(test)]
#[path = "flatness_test.rs"]
mod flatness_test;
