//! Smoothing operations. Both variants only move `current` coordinates;
//! connectivity never changes.

use crate::attributes::AttributeStore;
use crate::logic::Expr;
use crate::mesh::Mesh;
use crate::operations::{MeshOperation, Plan};
use crate::params::Parameters;
use crate::simplex::Simplex;
use crate::util::{inverts_any_on_move, midpoint};

/// Laplacian smoothing of interior vertices: each admissible vertex moves
/// to the average of its ring neighbours, unless that would invert a
/// triangle of its star.
pub struct LaplacianSmoothing;

impl LaplacianSmoothing {
  pub fn new() -> Self {
    Self
  }
}

impl Default for LaplacianSmoothing {
  fn default() -> Self {
    Self::new()
  }
}

impl MeshOperation for LaplacianSmoothing {
  fn update_local_attributes(&self, s: Simplex, mesh: &Mesh, attributes: &mut AttributeStore) -> bool {
    let Simplex::Vertex(v) = s else { return false };

    if !mesh.is_valid(v)
      || mesh.is_submesh_boundary(v)
      || mesh.is_boundary(v)
      || mesh.is_interface(v)
    {
      return false;
    }

    let star = mesh.star(v);
    let mut ring = mesh.closure_set(&star);
    ring.remove(v);

    let count = ring.size(0);
    if count == 0 {
      return false;
    }

    let sum = ring
      .vertices()
      .fold(glam::DVec2::ZERO, |acc, w| acc + attributes.current(w));
    let new_position = sum / count as f64;

    if inverts_any_on_move(mesh, attributes, v, &star, new_position, 0.0) {
      return false;
    }

    attributes.set_current(v, new_position);
    true
  }

  fn plan(&self, _s: Simplex, _mesh: &mut Mesh, _attributes: &AttributeStore) -> Option<Plan> {
    None
  }
}

/// Interface smoothing: a 2-valent interface vertex moves towards the
/// midpoint of its two interface neighbours, straightening the phase
/// boundary. Refused when it would invert a triangle or displace phase
/// area beyond the threshold.
pub struct InterfaceSmoothing {
  area_threshold: f64,
}

impl InterfaceSmoothing {
  pub fn new(operation_name: &str, label: u32, parameters: &Parameters) -> Self {
    Self {
      area_threshold: parameters.area_threshold(operation_name, label),
    }
  }
}

impl MeshOperation for InterfaceSmoothing {
  fn update_local_attributes(&self, s: Simplex, mesh: &Mesh, attributes: &mut AttributeStore) -> bool {
    let Simplex::Vertex(v) = s else { return false };

    if !mesh.is_valid(v)
      || mesh.is_submesh_boundary(v)
      || mesh.is_boundary(v)
      || !mesh.is_interface(v)
    {
      return false;
    }

    let star = mesh.star(v);
    let interface_edges = star.filter(mesh, &Expr::IsDimension(1).and(Expr::IsInterface));
    if interface_edges.size(1) != 2 {
      return false;
    }

    let mut neighbours = interface_edges.edges().map(|e| e.other(v));
    let p = neighbours.next().expect("two interface edges");
    let q = neighbours.next().expect("two interface edges");

    let new_position = midpoint(attributes, p, q);

    if inverts_any_on_move(mesh, attributes, v, &star, new_position, 0.0) {
      return false;
    }

    // Straightening moves area between the two phases; cap the transfer.
    if self.area_threshold > 0.0 {
      let old_position = attributes.current(v);
      let displaced =
        crate::math::triangle_area(attributes.current(p), old_position, attributes.current(q));
      if displaced > self.area_threshold {
        return false;
      }
    }

    attributes.set_current(v, new_position);
    true
  }

  fn plan(&self, _s: Simplex, _mesh: &mut Mesh, _attributes: &AttributeStore) -> Option<Plan> {
    None
  }
}

#[cfg(test)]
#[path = "smoothing_test.rs"]
mod smoothing_test;
