//! Edge flip: replace the diagonal of a quadrilateral of two triangles.

use crate::attributes::AttributeStore;
use crate::math::signed_triangle_area;
use crate::mesh::Mesh;
use crate::operations::{MeshOperation, Plan};
use crate::simplex::{Simplex, Simplex1, Simplex2};

pub struct EdgeFlip;

impl EdgeFlip {
  pub fn new() -> Self {
    Self
  }
}

impl Default for EdgeFlip {
  fn default() -> Self {
    Self::new()
  }
}

impl MeshOperation for EdgeFlip {
  fn plan(&self, s: Simplex, mesh: &mut Mesh, attributes: &AttributeStore) -> Option<Plan> {
    let Simplex::Edge(edge) = s else { return None };

    if mesh.is_interface(edge)
      || mesh.is_submesh_boundary(edge)
      || mesh.is_boundary(edge)
      || !mesh.is_valid(edge)
    {
      return None;
    }

    let cofaces = mesh.edge_cofaces(edge);
    let [t1, t2] = cofaces else { return None };
    let (t1, t2) = (*t1, *t2);

    let w1 = t1.opposite_vertex(edge);
    let w2 = t2.opposite_vertex(edge);
    if w1 == w2 {
      return None;
    }

    let (v1, v2) = edge.endpoints();
    let p1 = attributes.current(v1);
    let p2 = attributes.current(v2);
    let q1 = attributes.current(w1);
    let q2 = attributes.current(w2);

    // The endpoints must lie strictly on opposite sides of the new
    // diagonal, otherwise a replacement triangle would be inverted.
    let a1 = signed_triangle_area(q1, q2, p1);
    let a2 = signed_triangle_area(q1, q2, p2);
    if a1 * a2 >= 0.0 {
      return None;
    }

    let mut plan = Plan::new();
    plan.old_simplices.insert(edge);
    plan.old_simplices.insert(t1);
    plan.old_simplices.insert(t2);

    let n1 = Simplex2::new(w1, w2, v1);
    plan.new_simplices.insert(n1);
    plan.triangle_parents.insert(n1, t1);

    let n2 = Simplex2::new(w1, w2, v2);
    plan.new_simplices.insert(n2);
    plan.triangle_parents.insert(n2, t2);

    let diagonal = Simplex1::new(w1, w2);
    plan.new_simplices.insert(diagonal);
    plan.edge_parents.insert(diagonal, edge);

    Some(plan)
  }
}

#[cfg(test)]
#[path = "edge_flip_test.rs"]
mod edge_flip_test;
