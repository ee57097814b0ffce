//! Edge collapse and the admissibility test for its endpoints.

use crate::attributes::AttributeStore;
use crate::mesh::Mesh;
use crate::operations::{MeshOperation, Plan};
use crate::params::Parameters;
use crate::simplex::{Simplex, Simplex0, Simplex1};
use crate::simplex_set::SimplexSet;
use crate::util::{inverts_any_on_move, phase_area_change_exceeds};

fn preserves_boundary(v: Simplex0, vo: Simplex0, e: Simplex1, mesh: &Mesh) -> bool {
  // Collapsing a submesh-boundary vertex, or onto one, would alter
  // attribute values the merge step treats as authoritative.
  if mesh.is_submesh_boundary(v) || mesh.is_submesh_boundary(vo) {
    return false;
  }
  if mesh.is_boundary(v) && !mesh.is_boundary(e) {
    return false;
  }
  true
}

fn preserves_interface(v: Simplex0, e: Simplex1, mesh: &Mesh) -> bool {
  if !mesh.is_interface(v) {
    return true;
  }
  if !mesh.is_interface(e) {
    return false;
  }
  // The interface must be a 1-manifold through v: exactly two interface
  // edges in its star.
  let interface_edges = mesh
    .star(v)
    .edges()
    .filter(|&g| mesh.is_interface(g))
    .count();
  interface_edges == 2
}

/// The subset of the endpoints of `e` that may be collapsed without
/// destroying the mesh topology, the mesh boundary or (when requested) the
/// interface.
pub fn collapsable_vertices(e: Simplex1, mesh: &Mesh, preserve_interface: bool) -> SimplexSet {
  let mut result = SimplexSet::new();

  if mesh.is_submesh_boundary(e) || !mesh.is_valid(e) {
    return result;
  }

  // Topological admissibility: link(v1) ∩ link(v2) = link(e).
  let (v1, v2) = e.endpoints();
  let intersection = mesh.link(v1).intersection(&mesh.link(v2));
  let excess = intersection.difference(&mesh.link(e));
  if excess.size(0) != 0 {
    return result;
  }

  result.insert(v1);
  result.insert(v2);

  if !preserves_boundary(v1, v2, e, mesh) {
    result.remove(v1);
  }
  if !preserves_boundary(v2, v1, e, mesh) {
    result.remove(v2);
  }
  if preserve_interface {
    if !preserves_interface(v1, e, mesh) {
      result.remove(v1);
    }
    if !preserves_interface(v2, e, mesh) {
      result.remove(v2);
    }
  }

  result
}

/// Collapse an edge by folding one endpoint onto the other.
///
/// With `preserve_interface` set the operation only removes vertices whose
/// collapse keeps every interface curve intact (the coarsening batches);
/// without it, interface vertices may fold too, which the merge finishing
/// pass uses to dissolve slivers.
pub struct EdgeCollapse {
  area_threshold: f64,
  preserve_interface: bool,
}

impl EdgeCollapse {
  pub fn new(
    operation_name: &str,
    label: u32,
    parameters: &Parameters,
    preserve_interface: bool,
  ) -> Self {
    Self {
      area_threshold: parameters.area_threshold(operation_name, label),
      preserve_interface,
    }
  }

  /// Build the plan folding `from` onto `to` across `edge`.
  fn collapse(&self, from: Simplex0, to: Simplex0, edge: Simplex1, mesh: &Mesh) -> Plan {
    let edge_star = mesh.star(edge);
    let from_star = mesh.star(from);

    let mut plan = Plan::new();
    plan.old_simplices.insert_set(&from_star);

    // Triangles around `from` outside the collapsing pair reconnect to
    // `to`.
    for t in from_star.difference(&edge_star).triangles() {
      let n = t.substitute(from, to);
      plan.new_simplices.insert(n);
      plan.triangle_parents.insert(n, t);
    }

    // Edges are handled separately so attributes of surviving edges are
    // not overwritten.
    let closure_of_star = mesh.closure_set(&edge_star);
    for g in from_star.difference(&closure_of_star).edges() {
      let n = g.substitute(from, to);
      plan.new_simplices.insert(n);
      plan.edge_parents.insert(n, g);
    }

    // The surviving vertex is listed so its attributes can be reassigned.
    plan.new_simplices.insert(to);

    plan
  }
}

impl MeshOperation for EdgeCollapse {
  fn plan(&self, s: Simplex, mesh: &mut Mesh, attributes: &AttributeStore) -> Option<Plan> {
    let Simplex::Edge(edge) = s else { return None };

    let candidates = collapsable_vertices(edge, mesh, self.preserve_interface);

    let (v1, v2) = edge.endpoints();
    let edge_star = mesh.star(edge);

    // Ascending id order makes the tie-break deterministic when both
    // endpoints qualify.
    for v in candidates.vertices() {
      let vp = if v == v1 { v2 } else { v1 };

      let reconnected = mesh.star(v).difference(&edge_star);
      if inverts_any_on_move(mesh, attributes, v, &reconnected, attributes.current(vp), 0.0) {
        continue;
      }
      if phase_area_change_exceeds(mesh, attributes, v, vp, self.area_threshold) {
        continue;
      }

      return Some(self.collapse(v, vp, edge, mesh));
    }

    None
  }
}

#[cfg(test)]
#[path = "edge_collapse_test.rs"]
mod edge_collapse_test;
