//! Engine facade: the single entry point applications interact with.

use std::path::Path;

use crate::attributes::AttributeStore;
use crate::error::Result;
use crate::io;
use crate::mesh::Mesh;
use crate::params::Parameters;
use crate::scheduler::Scheduler;

/// Seed the attribute store from a freshly loaded mesh: register every
/// simplex, derive each vertex's label set from its incident triangles
/// (minus ambient when ambient filling is on), and default every target
/// to the current position.
pub fn initialize_attributes(mesh: &Mesh, attributes: &mut AttributeStore, parameters: &Parameters) {
  attributes.insert_set(&mesh.all_simplices());

  for v in mesh.vertices_iter() {
    for t in mesh.vertex_triangles(v) {
      let label = mesh.label(t);
      if parameters.use_ambient() && label == parameters.ambient_label() {
        continue;
      }
      attributes.add_label(v, label);
    }
  }
}

/// The interface-tracking engine. Owns the mesh and its attributes;
/// `update` runs the remeshing scheduler under the given parameters.
pub struct MeshEngine {
  scheduler: Scheduler,
}

impl MeshEngine {
  pub fn new(mesh: Mesh, attributes: AttributeStore) -> Self {
    Self {
      scheduler: Scheduler::new(mesh, attributes),
    }
  }

  /// Load a text mesh file, relabel phases per the parameters, and seed
  /// the attribute store.
  pub fn from_mesh_file(path: impl AsRef<Path>, parameters: &Parameters) -> Result<Self> {
    let (mesh, mut attributes) = io::load_mesh(path, parameters)?;
    initialize_attributes(&mesh, &mut attributes, parameters);
    Ok(Self::new(mesh, attributes))
  }

  pub fn mesh(&self) -> &Mesh {
    &self.scheduler.mesh
  }

  pub fn mesh_mut(&mut self) -> &mut Mesh {
    &mut self.scheduler.mesh
  }

  pub fn attributes(&self) -> &AttributeStore {
    &self.scheduler.attributes
  }

  pub fn attributes_mut(&mut self) -> &mut AttributeStore {
    &mut self.scheduler.attributes
  }

  /// Evolve the mesh under the prescribed vertex motion: scheduler
  /// iterations of decomposition, parallel remeshing and merging, until
  /// the monitor halts. Returns the number of operations performed.
  pub fn update(&mut self, parameters: &Parameters) -> Result<usize> {
    self.scheduler.run(parameters)
  }

  pub fn save_mesh_file(&self, path: impl AsRef<Path>) -> Result<()> {
    io::save_mesh(path, self.mesh(), self.attributes())
  }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;
