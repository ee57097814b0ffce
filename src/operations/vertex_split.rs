//! Vertex split: duplicate an interface vertex so two phases with
//! divergent motion can separate, filling the opened gap with ambient
//! triangles.

use crate::attributes::AttributeStore;
use crate::logic::Expr;
use crate::mesh::Mesh;
use crate::operations::{MeshOperation, Plan};
use crate::params::Parameters;
use crate::simplex::{Simplex, Simplex1, Simplex2};

pub struct VertexSplit {
  label: u32,
  ambient_label: u32,
  use_ambient: bool,
}

impl VertexSplit {
  pub fn new(label: u32, parameters: &Parameters) -> Self {
    Self {
      label,
      ambient_label: parameters.ambient_label(),
      use_ambient: parameters.use_ambient(),
    }
  }
}

impl MeshOperation for VertexSplit {
  fn plan(&self, s: Simplex, mesh: &mut Mesh, _attributes: &AttributeStore) -> Option<Plan> {
    let Simplex::Vertex(v) = s else { return None };

    if !self.use_ambient || self.label == self.ambient_label {
      return None;
    }
    if !mesh.is_valid(v) || !mesh.is_interface(v) || mesh.is_submesh_boundary(v) {
      return None;
    }

    let star = mesh.star(v);

    // The fan of the phase being pulled off.
    let fan: Vec<Simplex2> = star
      .triangles()
      .filter(|&t| mesh.label(t) == self.label)
      .collect();
    if fan.is_empty() || fan.len() == star.size(2) {
      return None;
    }

    // The phase boundary must pass through v as a 1-manifold: exactly two
    // interface edges of this phase, bounding the fan.
    let boundary_edges: Vec<Simplex1> = star
      .filter(
        mesh,
        &Expr::IsDimension(1)
          .and(Expr::InPhase(self.label))
          .and(Expr::IsInterface),
      )
      .edges()
      .collect();
    let [b_edge1, b_edge2] = boundary_edges.as_slice() else {
      return None;
    };
    let (b_edge1, b_edge2) = (*b_edge1, *b_edge2);
    let b1 = b_edge1.other(v);
    let b2 = b_edge2.other(v);

    // Interior spokes of the fan: edges at v whose cofaces all lie in the
    // phase.
    let interior: Vec<Simplex1> = star
      .edges()
      .filter(|&g| {
        g != b_edge1
          && g != b_edge2
          && mesh
            .edge_cofaces(g)
            .iter()
            .all(|&t| mesh.label(t) == self.label)
      })
      .collect();

    let v_new = mesh.insert_vertex();

    let mut plan = Plan::new();
    plan.new_simplices.insert(v);
    plan.new_simplices.insert(v_new);

    for &t in &fan {
      plan.old_simplices.insert(t);
      let n = t.substitute(v, v_new);
      plan.new_simplices.insert(n);
      plan.triangle_parents.insert(n, t);
    }
    for &g in &interior {
      plan.old_simplices.insert(g);
      let n = g.substitute(v, v_new);
      plan.new_simplices.insert(n);
      plan.edge_parents.insert(n, g);
    }

    // The fan boundary reconnects to the duplicate; the original edges
    // stay behind as faces of the ambient fill.
    let r1 = Simplex1::new(v_new, b1);
    plan.new_simplices.insert(r1);
    plan.edge_parents.insert(r1, b_edge1);

    let r2 = Simplex1::new(v_new, b2);
    plan.new_simplices.insert(r2);
    plan.edge_parents.insert(r2, b_edge2);

    let seam = Simplex1::new(v, v_new);
    plan.new_simplices.insert(seam);
    plan.edge_parents.insert(seam, b_edge1.min(b_edge2));

    // Two ambient triangles fill the gap between the old vertex and its
    // duplicate. Their attributes inherit from the fan; their label is the
    // ambient phase, which no parent carries.
    let anchor = fan[0];
    for (gap_corner, fill_parent) in [(b1, anchor), (b2, anchor)] {
      let fill = Simplex2::new(v, v_new, gap_corner);
      plan.new_simplices.insert(fill);
      plan.triangle_parents.insert(fill, fill_parent);
      plan.label_overrides.insert(fill, self.ambient_label);
    }

    Some(plan)
  }
}

#[cfg(test)]
#[path = "vertex_split_test.rs"]
mod vertex_split_test;
