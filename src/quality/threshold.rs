//! Edge-length bounds read from an edge attribute.

use crate::attributes::AttributeStore;
use crate::math::edge_length;
use crate::mesh::Mesh;
use crate::quality::QualityMeasure;
use crate::simplex::Simplex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
  /// Edge is bad when longer than the stored value (refinement).
  Upper,
  /// Edge is bad when shorter than the stored value (coarsening).
  Lower,
}

/// Compares each edge's length against a per-edge bound stored in a named
/// edge attribute, so applications can prescribe spatially varying sizing
/// fields. A zero or unset bound disables the test for that edge.
pub struct Threshold {
  attribute: String,
  bound: Bound,
}

impl Threshold {
  pub fn new(attribute: &str, bound: Bound) -> Self {
    Self {
      attribute: attribute.to_string(),
      bound,
    }
  }
}

impl QualityMeasure for Threshold {
  fn dimension(&self) -> u32 {
    1
  }

  fn is_bad(&self, s: Simplex, mesh: &Mesh, attributes: &AttributeStore) -> bool {
    let Simplex::Edge(e) = s else { return false };
    if !mesh.is_valid(e) {
      return false;
    }

    let Ok(bound) = attributes.edge_value(&self.attribute, e) else {
      return false;
    };
    if bound <= 0.0 {
      return false;
    }

    let (a, b) = e.endpoints();
    let length = edge_length(attributes.current(a), attributes.current(b));

    match self.bound {
      Bound::Upper => length > bound,
      Bound::Lower => length < bound,
    }
  }
}

#[cfg(test)]
#[path = "threshold_test.rs"]
mod threshold_test;
