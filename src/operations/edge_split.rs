//! Edge split: introduce a midpoint vertex and retriangulate the star.

use crate::attributes::AttributeStore;
use crate::mesh::Mesh;
use crate::operations::{MeshOperation, Plan};
use crate::params::Parameters;
use crate::simplex::{Simplex, Simplex1, Simplex2};

pub struct EdgeSplit {
  sparse_edge_attributes: bool,
}

impl EdgeSplit {
  pub fn new(parameters: &Parameters) -> Self {
    Self {
      sparse_edge_attributes: parameters.use_sparse_edge_attributes(),
    }
  }
}

impl MeshOperation for EdgeSplit {
  fn plan(&self, s: Simplex, mesh: &mut Mesh, _attributes: &AttributeStore) -> Option<Plan> {
    let Simplex::Edge(edge) = s else { return None };

    if mesh.is_submesh_boundary(edge) || !mesh.is_valid(edge) {
      return None;
    }

    let star = mesh.star(edge);
    let (v1, v2) = edge.endpoints();

    let m = mesh.insert_vertex();

    let mut plan = Plan::new();
    plan.old_simplices.insert_set(&star);
    plan.new_simplices.insert(m);

    for t in star.triangles() {
      let vo = t.opposite_vertex(edge);

      let n1 = Simplex2::new(vo, m, v1);
      plan.new_simplices.insert(n1);
      plan.triangle_parents.insert(n1, t);

      let n2 = Simplex2::new(vo, m, v2);
      plan.new_simplices.insert(n2);
      plan.triangle_parents.insert(n2, t);

      // The spoke to the opposite vertex inherits from the split edge only
      // when sparse edge attributes are disabled.
      let spoke = Simplex1::new(m, vo);
      plan.new_simplices.insert(spoke);
      if !self.sparse_edge_attributes {
        plan.edge_parents.insert(spoke, edge);
      }
    }

    let half1 = Simplex1::new(m, v1);
    plan.new_simplices.insert(half1);
    plan.edge_parents.insert(half1, edge);

    let half2 = Simplex1::new(m, v2);
    plan.new_simplices.insert(half2);
    plan.edge_parents.insert(half2, edge);

    Some(plan)
  }
}

#[cfg(test)]
#[path = "edge_split_test.rs"]
mod edge_split_test;
