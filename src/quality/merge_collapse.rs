//! Finishing pass after merge: short ordinary edges whose endpoints both
//! sit on the interface.

use crate::attributes::AttributeStore;
use crate::math::edge_length;
use crate::mesh::Mesh;
use crate::params::Parameters;
use crate::quality::QualityMeasure;
use crate::simplex::Simplex;

/// After a merge the freed vertices hang on the fused interface, joined by
/// short non-interface edges. Collapsing those edges removes the remnants
/// of the dissolved sliver.
pub struct MergeCollapse {
  distance_threshold: f64,
}

impl MergeCollapse {
  pub fn new(operation_name: &str, label: u32, parameters: &Parameters) -> Self {
    Self {
      distance_threshold: parameters.distance_threshold(operation_name, label),
    }
  }
}

impl QualityMeasure for MergeCollapse {
  fn dimension(&self) -> u32 {
    1
  }

  fn is_bad(&self, s: Simplex, mesh: &Mesh, attributes: &AttributeStore) -> bool {
    let Simplex::Edge(e) = s else { return false };
    if !mesh.is_valid(e) {
      return false;
    }

    let (v0, v1) = e.endpoints();
    if mesh.is_interface(e) || !mesh.is_interface(v0) || !mesh.is_interface(v1) {
      return false;
    }

    edge_length(attributes.current(v0), attributes.current(v1)) < self.distance_threshold
  }
}

#[cfg(test)]
#[path = "merge_collapse_test.rs"]
mod merge_collapse_test;
