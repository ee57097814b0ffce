//! Merge: split a triangle whose opposite vertex hangs close to its
//! longest interface edge, letting two interfaces touch.

use crate::attributes::AttributeStore;
use crate::math::signed_triangle_area;
use crate::mesh::Mesh;
use crate::operations::{MeshOperation, Plan};
use crate::simplex::{Simplex, Simplex1, Simplex2};
use crate::util::longest_edge;

pub struct Merge;

impl Merge {
  pub fn new() -> Self {
    Self
  }
}

impl Default for Merge {
  fn default() -> Self {
    Self::new()
  }
}

impl MeshOperation for Merge {
  fn plan(&self, s: Simplex, mesh: &mut Mesh, attributes: &AttributeStore) -> Option<Plan> {
    let Simplex::Triangle(t) = s else { return None };
    if !mesh.is_valid(t) {
      return None;
    }

    let max_edge = longest_edge(mesh, attributes, t);

    // A candidate whose longest edge is not on the interface stopped
    // qualifying; skip it.
    if !mesh.is_interface(max_edge) || mesh.is_submesh_boundary(max_edge) {
      return None;
    }

    let vo = t.opposite_vertex(max_edge);
    if mesh.is_submesh_boundary(vo) {
      return None;
    }

    let cofaces = mesh.edge_cofaces(max_edge);
    if cofaces.len() != 2 {
      return None;
    }
    let other = if cofaces[0] == t { cofaces[1] } else { cofaces[0] };
    let w = other.opposite_vertex(max_edge);
    if w == vo {
      return None;
    }

    let (v1, v2) = max_edge.endpoints();
    let po = attributes.current(vo);
    let pw = attributes.current(w);
    let p1 = attributes.current(v1);
    let p2 = attributes.current(v2);

    // The replacement triangles must open to opposite sides of the new
    // edge (w, vo); otherwise one of them would be inverted.
    let a1 = signed_triangle_area(pw, po, p1);
    let a2 = signed_triangle_area(pw, po, p2);
    if a1 * a2 >= 0.0 {
      return None;
    }

    let mut plan = Plan::new();
    plan.old_simplices.insert_set(&mesh.star(max_edge));

    // vo is kept; it is listed so its attributes follow the fused phase.
    plan.new_simplices.insert(vo);

    let n1 = Simplex2::new(w, vo, v1);
    plan.new_simplices.insert(n1);
    plan.triangle_parents.insert(n1, other);

    let n2 = Simplex2::new(w, vo, v2);
    plan.new_simplices.insert(n2);
    plan.triangle_parents.insert(n2, other);

    let bridge = Simplex1::new(w, vo);
    plan.new_simplices.insert(bridge);
    plan.edge_parents.insert(bridge, max_edge);

    Some(plan)
  }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod merge_test;
