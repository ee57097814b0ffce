//! Quality analyzer and batch runner.
//!
//! The analyzer snapshots one phase set and lazily yields each bad simplex
//! exactly once; simplices the operations insert during the pass are never
//! yielded. The runner owns the commit sequence around every candidate and
//! keeps the per-batch counter used for convergence tracking. Errors from
//! a single candidate are local: they are logged and the pass continues.

use std::collections::BTreeSet;

use crate::assignment::Assignment;
use crate::attributes::AttributeStore;
use crate::logic::Expr;
use crate::mesh::Mesh;
use crate::operations::{MeshOperation, Plan};
use crate::params::Parameters;
use crate::quality::QualityMeasure;
use crate::simplex::{Simplex, Simplex0};
use crate::simplex_set::SimplexSet;
use crate::util::compute_phase;

pub struct QualityAnalyzer<'a> {
  candidates: Vec<Simplex>,
  index: usize,
  measure: &'a dyn QualityMeasure,
}

impl<'a> QualityAnalyzer<'a> {
  /// Snapshot the simplices of the measure's dimension from `simplices`.
  pub fn new(simplices: &SimplexSet, measure: &'a dyn QualityMeasure) -> Self {
    let candidates: Vec<Simplex> = match measure.dimension() {
      0 => simplices.vertices().map(Simplex::Vertex).collect(),
      1 => simplices.edges().map(Simplex::Edge).collect(),
      _ => simplices.triangles().map(Simplex::Triangle).collect(),
    };
    Self {
      candidates,
      index: 0,
      measure,
    }
  }

  /// Next snapshot simplex the measure flags, judged against the mesh as
  /// it is now (earlier operations of the same pass count).
  pub fn next_bad(&mut self, mesh: &Mesh, attributes: &AttributeStore) -> Option<Simplex> {
    while self.index < self.candidates.len() {
      let s = self.candidates[self.index];
      self.index += 1;
      if self.measure.is_bad(s, mesh, attributes) {
        return Some(s);
      }
    }
    None
  }
}

/// One analyzer sweep: validity check, condition, attribute-only handling,
/// plan, assign, replace. Returns the number of performed operations.
pub fn do_operations(
  mesh: &mut Mesh,
  attributes: &mut AttributeStore,
  parameters: &Parameters,
  analyzer: &mut QualityAnalyzer<'_>,
  operation: &mut dyn MeshOperation,
  condition: &Expr,
  assignment: &Assignment,
) -> usize {
  operation.init(mesh, attributes);

  let mut operations_done = 0;

  while let Some(s) = analyzer.next_bad(mesh, attributes) {
    // The pick may have been invalidated by an earlier operation.
    if !mesh.is_valid(s) {
      continue;
    }
    if !condition.holds(mesh, s) {
      continue;
    }

    if parameters.debug_render() {
      tracing::trace!(
        simplex = %s,
        level = parameters.debug_render_level(),
        target_file = parameters.debug_render_filename(),
        "candidate"
      );
    }

    if operation.update_local_attributes(s, mesh, attributes) {
      operations_done += 1;
      continue;
    }

    let Some(plan) = operation.plan(s, mesh, attributes) else {
      continue;
    };

    let created = attributes.insert_set(&plan.new_simplices);

    let committed = assignment
      .apply(&plan, mesh, parameters, attributes)
      .and_then(|_| {
        mesh.replace(
          &plan.old_simplices,
          &plan.new_simplices,
          &plan.triangle_parents,
          &plan.label_overrides,
          attributes,
          parameters,
        )
      });

    match committed {
      Ok(()) => {
        attributes.remove_set(&plan.old_simplices);
        reconcile_vertex_labels(mesh, attributes, &plan, parameters);
        operations_done += 1;
      }
      Err(error) => {
        // Local failure: discard what the rejected plan introduced and
        // continue with the next candidate.
        tracing::warn!(simplex = %s, %error, "operation rejected");
        attributes.remove_set(&created);
        for v in plan.new_simplices.vertices() {
          mesh.discard_vertex(v);
        }
      }
    }
  }

  operations_done
}

/// Re-derive the label set of every vertex the committed plan touched, so
/// phase membership keeps matching the labels of the incident triangles
/// (minus ambient when ambient filling is on).
///
/// A label acquired through reconnection copies its scalar values from the
/// smallest adjacent vertex already carrying it; its target defaults to
/// the vertex's current position.
pub(crate) fn reconcile_vertex_labels(
  mesh: &Mesh,
  attributes: &mut AttributeStore,
  plan: &Plan,
  parameters: &Parameters,
) {
  let mut affected: BTreeSet<Simplex0> = plan.new_simplices.vertices().collect();
  for t in plan.new_simplices.triangles() {
    for v in t.vertices() {
      affected.insert(v);
    }
  }

  for v in affected {
    if !mesh.is_valid(v) || mesh.submesh_boundary(v) {
      continue;
    }

    let mut star_labels: BTreeSet<u32> = BTreeSet::new();
    for t in mesh.vertex_triangles(v) {
      let label = mesh.label(t);
      if parameters.use_ambient() && label == parameters.ambient_label() {
        continue;
      }
      star_labels.insert(label);
    }

    let known: Vec<u32> = attributes.labels(v).to_vec();

    for &label in &star_labels {
      if known.contains(&label) {
        continue;
      }
      attributes.add_label(v, label);

      let carrier = mesh
        .vertex_triangles(v)
        .filter(|&t| mesh.label(t) == label)
        .flat_map(|t| t.vertices())
        .filter(|&w| w != v && attributes.labels(w).contains(&label))
        .min();
      if let Some(w) = carrier {
        for name in attributes.vertex_attribute_names() {
          if let Ok(value) = attributes.vertex_value(&name, w, label) {
            let _ = attributes.set_vertex_value(&name, v, label, value);
          }
        }
      }
    }

    for label in known {
      if !star_labels.contains(&label) {
        attributes.erase_label(v, label);
      }
    }
  }
}

/// Run one named operation over a list of phase labels.
///
/// Per label the pass is repeated up to `max_iterations(name)` times, each
/// pass re-snapshotting the phase; a pass that performs no operation ends
/// the label early.
#[allow(clippy::too_many_arguments)]
pub fn run_batch(
  name: &str,
  labels: &[u32],
  condition: &Expr,
  parameters: &Parameters,
  mesh: &mut Mesh,
  attributes: &mut AttributeStore,
  make_measure: impl Fn(u32) -> Box<dyn QualityMeasure>,
  make_operation: impl Fn(u32) -> Box<dyn MeshOperation>,
  make_assignment: impl Fn(u32) -> Assignment,
) -> usize {
  let max_passes = parameters.max_iterations(name);
  if max_passes == 0 {
    return 0;
  }

  if parameters.verbose() && !parameters.silent_threads() {
    tracing::debug!(name, "batch");
  }
  let started = parameters.profiling().then(std::time::Instant::now);

  let mut total = 0;
  for &label in labels {
    for _pass in 0..max_passes {
      let phase = compute_phase(mesh, label);
      let measure = make_measure(label);
      let mut analyzer = QualityAnalyzer::new(&phase, measure.as_ref());
      let mut operation = make_operation(label);
      let assignment = make_assignment(label);

      let done = do_operations(
        mesh,
        attributes,
        parameters,
        &mut analyzer,
        operation.as_mut(),
        condition,
        &assignment,
      );
      total += done;
      if done == 0 {
        break;
      }
    }
  }

  if let Some(started) = started {
    tracing::debug!(
      name,
      operations_done = total,
      elapsed_us = started.elapsed().as_micros() as u64,
      "batch timing"
    );
  }

  total
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod runner_test;
