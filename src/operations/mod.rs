//! Mesh operations: split, collapse, flip, merge, vertex split, move and
//! smoothing.
//!
//! Operations never commit anything themselves. `plan` returns a [`Plan`],
//! a plain record of the simplices to insert and remove plus parent
//! look-up tables, and the batch runner alone performs the commit through
//! `mesh.replace`. Attribute-only operations act through
//! `update_local_attributes` and return no plan. The only mesh mutation a
//! planner may perform is allocating the fresh vertices its plan
//! introduces; a plan that is subsequently rejected has those vertices
//! discarded by the runner.

use std::collections::BTreeMap;

use crate::attributes::AttributeStore;
use crate::mesh::Mesh;
use crate::simplex::{Simplex, Simplex1, Simplex2};
use crate::simplex_set::SimplexSet;

pub mod edge_collapse;
pub mod edge_flip;
pub mod edge_split;
pub mod merge;
pub mod move_vertices;
pub mod smoothing;
pub mod vertex_split;

pub use edge_collapse::{collapsable_vertices, EdgeCollapse};
pub use edge_flip::EdgeFlip;
pub use edge_split::EdgeSplit;
pub use merge::Merge;
pub use move_vertices::MoveVertices;
pub use smoothing::{InterfaceSmoothing, LaplacianSmoothing};
pub use vertex_split::VertexSplit;

/// A planned connectivity change, ready for the runner to commit.
#[derive(Clone, Debug, Default)]
pub struct Plan {
  /// Simplices to insert. Also contains surviving simplices whose
  /// attributes must be reassigned (e.g. the target vertex of a collapse).
  pub new_simplices: SimplexSet,
  /// Simplices to remove after the new ones are in place.
  pub old_simplices: SimplexSet,
  /// Attribute parent per new edge. Edges without an entry keep default
  /// values (sparse edge attributes).
  pub edge_parents: BTreeMap<Simplex1, Simplex1>,
  /// Attribute and label parent per new triangle.
  pub triangle_parents: BTreeMap<Simplex2, Simplex2>,
  /// Labels assigned directly, overriding parent inheritance. Used where
  /// a new triangle belongs to a phase no parent carries, such as the
  /// ambient fill of a vertex split.
  pub label_overrides: BTreeMap<Simplex2, u32>,
}

impl Plan {
  pub fn new() -> Self {
    Self::default()
  }
}

pub trait MeshOperation {
  /// Global preparation before a batch pass. Move and smoothing use this
  /// to precompute collision-safe sub-step targets.
  fn init(&mut self, _mesh: &Mesh, _attributes: &mut AttributeStore) {}

  /// Attribute-only handling of a candidate. Returning true counts the
  /// simplex as handled and skips the planner.
  fn update_local_attributes(
    &self,
    _s: Simplex,
    _mesh: &Mesh,
    _attributes: &mut AttributeStore,
  ) -> bool {
    false
  }

  /// Compute the connectivity change for a candidate, or `None` to skip.
  fn plan(&self, s: Simplex, mesh: &mut Mesh, attributes: &AttributeStore) -> Option<Plan>;
}
