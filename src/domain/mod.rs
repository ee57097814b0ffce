//! Subdomains: the unit of parallel work inside one scheduler iteration.

use crate::algorithm::DefaultAlgorithm;
use crate::attributes::AttributeStore;
use crate::mesh::Mesh;
use crate::params::Parameters;
use crate::util::compute_phase_labels;

pub mod slab;

/// One subdomain: an owned submesh with its own attribute store and a
/// clone of the parameters. A worker thread runs the default algorithm on
/// it in isolation; nothing is shared until the scheduler merges.
pub struct SubDomain {
  pub id: usize,
  pub operations_done: usize,
  pub mesh: Mesh,
  pub parameters: Parameters,
  pub attributes: AttributeStore,
}

impl SubDomain {
  pub fn new(id: usize, mesh: Mesh, attributes: AttributeStore, parameters: Parameters) -> Self {
    Self {
      id,
      operations_done: 0,
      mesh,
      parameters,
      attributes,
    }
  }

  /// Run the remeshing pipeline on the submesh. Stores and returns the
  /// number of operations performed.
  pub fn run(&mut self) -> usize {
    if self.parameters.verbose() && !self.parameters.silent_threads() {
      tracing::debug!(subdomain = self.id, "worker start");
    }

    let labels = compute_phase_labels(&self.mesh);
    let algorithm = DefaultAlgorithm { id: self.id };
    self.operations_done = algorithm.run(
      &mut self.mesh,
      &mut self.attributes,
      &self.parameters,
      &labels,
    );
    self.operations_done
  }
}
