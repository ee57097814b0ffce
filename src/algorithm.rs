//! The default remeshing pipeline: a fixed, ordered sequence of batches
//! run per phase inside one subdomain.

use crate::assignment::Assignment;
use crate::attributes::AttributeStore;
use crate::logic::Expr;
use crate::mesh::Mesh;
use crate::operations::{
  EdgeCollapse, EdgeFlip, EdgeSplit, InterfaceSmoothing, LaplacianSmoothing, Merge, MeshOperation,
  MoveVertices, VertexSplit,
};
use crate::params::Parameters;
use crate::quality::{
  AlwaysBad, Bound, Delaunay, InterfaceFlatness, MergeCollapse, MergeProximity, QualityMeasure,
  Threshold, VertexSplitCandidate,
};
use crate::runner::run_batch;

/// Runs the remeshing pipeline on one mesh. Inside the scheduler each
/// subdomain owns an instance; `id` identifies the subdomain in traces.
pub struct DefaultAlgorithm {
  pub id: usize,
}

impl DefaultAlgorithm {
  pub fn new() -> Self {
    Self { id: 0 }
  }
}

impl Default for DefaultAlgorithm {
  fn default() -> Self {
    Self::new()
  }
}

impl DefaultAlgorithm {
  /// Run every batch once, in pipeline order, over the given phase
  /// labels. Returns the total number of operations performed.
  pub fn run(
    &self,
    mesh: &mut Mesh,
    attributes: &mut AttributeStore,
    parameters: &Parameters,
    labels: &[u32],
  ) -> usize {
    let mut operations_done = 0;

    // 1. Apply sub-step targets.
    operations_done += run_batch(
      "move",
      labels,
      &Expr::Bool(true),
      parameters,
      mesh,
      attributes,
      |_| Box::new(AlwaysBad::new(0)) as Box<dyn QualityMeasure>,
      |label| Box::new(MoveVertices::new(label, parameters)) as Box<dyn MeshOperation>,
      |_| Assignment::Empty,
    );

    // 2. Separate phases whose targets diverge.
    operations_done += run_batch(
      "vertex_split",
      labels,
      &Expr::Bool(true),
      parameters,
      mesh,
      attributes,
      |label| {
        Box::new(VertexSplitCandidate::new("vertex_split", label, parameters))
          as Box<dyn QualityMeasure>
      },
      |label| Box::new(VertexSplit::new(label, parameters)) as Box<dyn MeshOperation>,
      |label| Assignment::VertexSplit {
        label,
        strength: parameters.strength("vertex_split", label),
      },
    );

    // 3. Straighten interfaces where they are already nearly flat.
    operations_done += run_batch(
      "interface_smoothing",
      labels,
      &Expr::IsInterface,
      parameters,
      mesh,
      attributes,
      |label| {
        Box::new(InterfaceFlatness::new("interface_smoothing", label, parameters))
          as Box<dyn QualityMeasure>
      },
      |label| {
        Box::new(InterfaceSmoothing::new("interface_smoothing", label, parameters))
          as Box<dyn MeshOperation>
      },
      |_| Assignment::Empty,
    );

    // 4. Laplacian smoothing of the phase interiors.
    operations_done += run_batch(
      "smoothing",
      labels,
      &Expr::IsInterface.negate(),
      parameters,
      mesh,
      attributes,
      |_| Box::new(AlwaysBad::new(0)) as Box<dyn QualityMeasure>,
      |_| Box::new(LaplacianSmoothing::new()) as Box<dyn MeshOperation>,
      |_| Assignment::Empty,
    );

    // 5. Edge split where edges outgrow the sizing field.
    operations_done += run_batch(
      "interface_refinement",
      labels,
      &Expr::IsInterface,
      parameters,
      mesh,
      attributes,
      |_| {
        Box::new(Threshold::new(
          parameters.upper_threshold_attribute("interface_refinement"),
          Bound::Upper,
        )) as Box<dyn QualityMeasure>
      },
      |_| Box::new(EdgeSplit::new(parameters)) as Box<dyn MeshOperation>,
      |_| Assignment::EdgeSplit,
    );
    operations_done += run_batch(
      "refinement",
      labels,
      &Expr::IsInterface.negate(),
      parameters,
      mesh,
      attributes,
      |_| {
        Box::new(Threshold::new(
          parameters.upper_threshold_attribute("refinement"),
          Bound::Upper,
        )) as Box<dyn QualityMeasure>
      },
      |_| Box::new(EdgeSplit::new(parameters)) as Box<dyn MeshOperation>,
      |_| Assignment::EdgeSplit,
    );

    // 6. Edge collapse where edges undershoot the sizing field.
    operations_done += run_batch(
      "interface_coarsening",
      labels,
      &Expr::IsInterface,
      parameters,
      mesh,
      attributes,
      |_| {
        Box::new(Threshold::new(
          parameters.lower_threshold_attribute("interface_coarsening"),
          Bound::Lower,
        )) as Box<dyn QualityMeasure>
      },
      |label| {
        Box::new(EdgeCollapse::new("interface_coarsening", label, parameters, true))
          as Box<dyn MeshOperation>
      },
      |_| Assignment::Copy,
    );
    operations_done += run_batch(
      "coarsening",
      labels,
      &Expr::IsInterface.negate(),
      parameters,
      mesh,
      attributes,
      |_| {
        Box::new(Threshold::new(
          parameters.lower_threshold_attribute("coarsening"),
          Bound::Lower,
        )) as Box<dyn QualityMeasure>
      },
      |label| {
        Box::new(EdgeCollapse::new("coarsening", label, parameters, true))
          as Box<dyn MeshOperation>
      },
      |_| Assignment::Copy,
    );

    // 7. Restore Delaunay-ness of ordinary edges.
    operations_done += run_batch(
      "edge_flip",
      labels,
      &Expr::IsInterface
        .negate()
        .and(Expr::IsBoundary.negate())
        .and(Expr::IsSubmeshBoundary.negate()),
      parameters,
      mesh,
      attributes,
      |_| Box::new(Delaunay::new()) as Box<dyn QualityMeasure>,
      |_| Box::new(EdgeFlip::new()) as Box<dyn MeshOperation>,
      |_| Assignment::Copy,
    );

    // 8. Fuse phases across thin slivers, then collapse the freed
    // vertices.
    operations_done += run_batch(
      "merge",
      labels,
      &Expr::Bool(true),
      parameters,
      mesh,
      attributes,
      |label| {
        Box::new(MergeProximity::new("merge", label, parameters)) as Box<dyn QualityMeasure>
      },
      |_| Box::new(Merge::new()) as Box<dyn MeshOperation>,
      |_| Assignment::Merge,
    );
    operations_done += run_batch(
      "merge_collapse",
      labels,
      &Expr::Bool(true),
      parameters,
      mesh,
      attributes,
      |label| {
        Box::new(MergeCollapse::new("merge_collapse", label, parameters))
          as Box<dyn QualityMeasure>
      },
      |label| {
        Box::new(EdgeCollapse::new("merge_collapse", label, parameters, false))
          as Box<dyn MeshOperation>
      },
      |_| Assignment::Copy,
    );

    if parameters.verbose() && !parameters.silent_threads() {
      tracing::debug!(subdomain = self.id, operations_done, "pipeline done");
    }

    operations_done
  }
}

#[cfg(test)]
#[path = "algorithm_test.rs"]
mod algorithm_test;
