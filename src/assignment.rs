//! Attribute assignment strategies.
//!
//! After a planner has produced its change record and before the mesh
//! commits it, the batch runner applies one of these strategies to
//! populate the attributes of the new simplices. Strategies are the only
//! code that mutates per-vertex label sets; everything else treats phase
//! membership as read-only.

use crate::attributes::AttributeStore;
use crate::error::{EngineError, Result};
use crate::mesh::Mesh;
use crate::operations::Plan;
use crate::params::Parameters;
use crate::simplex::Simplex0;
use crate::util::{midpoint, offset_position};

#[derive(Clone, Debug)]
pub enum Assignment {
  /// Copy every named edge and triangle attribute from the parent in the
  /// look-up tables. A parent the store does not know raises
  /// `MissingParent`.
  Copy,
  /// No-op, for operations that mutate attributes directly.
  Empty,
  /// Midpoint interpolation for the new vertex of an edge split, then
  /// `Copy`.
  EdgeSplit,
  /// Offset placement and single-label transfer for the duplicate of a
  /// vertex split, then `Copy`.
  VertexSplit { label: u32, strength: f64 },
  /// `Copy`; the carried-over vertex listed in the plan keeps its values
  /// because registration is idempotent.
  Merge,
}

impl Assignment {
  pub fn apply(
    &self,
    plan: &Plan,
    mesh: &Mesh,
    parameters: &Parameters,
    attributes: &mut AttributeStore,
  ) -> Result<()> {
    match self {
      Assignment::Empty => Ok(()),
      Assignment::Copy | Assignment::Merge => copy_from_parents(plan, attributes),
      Assignment::EdgeSplit => {
        assign_edge_split(plan, mesh, parameters, attributes)?;
        copy_from_parents(plan, attributes)
      }
      Assignment::VertexSplit { label, strength } => {
        assign_vertex_split(plan, mesh, attributes, *label, *strength)?;
        copy_from_parents(plan, attributes)
      }
    }
  }
}

fn copy_from_parents(plan: &Plan, attributes: &mut AttributeStore) -> Result<()> {
  for (&new_edge, &parent) in &plan.edge_parents {
    if !attributes.is_registered(parent) {
      return Err(EngineError::MissingParent(format!("{parent}")));
    }
    for name in attributes.edge_attribute_names() {
      let value = attributes.edge_value(&name, parent)?;
      attributes.set_edge_value(&name, new_edge, value)?;
    }
  }

  for (&new_triangle, &parent) in &plan.triangle_parents {
    if !attributes.is_registered(parent) {
      return Err(EngineError::MissingParent(format!("{parent}")));
    }
    for name in attributes.triangle_attribute_names() {
      let value = attributes.triangle_value(&name, parent)?;
      attributes.set_triangle_value(&name, new_triangle, value)?;
    }
  }

  Ok(())
}

/// Place the midpoint vertex of an edge split and interpolate its
/// per-label scalars as half the sum of the endpoint values.
fn assign_edge_split(
  plan: &Plan,
  mesh: &Mesh,
  parameters: &Parameters,
  attributes: &mut AttributeStore,
) -> Result<()> {
  let vertex = plan
    .new_simplices
    .vertices()
    .next()
    .ok_or_else(|| EngineError::InvalidArgument("edge split plan without new vertex".into()))?;
  let edge = plan
    .old_simplices
    .edges()
    .next()
    .ok_or_else(|| EngineError::InvalidArgument("edge split plan without split edge".into()))?;

  let (v1, v2) = edge.endpoints();
  attributes.set_current(vertex, midpoint(attributes, v1, v2));

  // Labels of the new vertex: every non-ambient phase meeting the edge.
  let mut labels: Vec<u32> = Vec::new();
  for t in mesh.star(edge).triangles() {
    let label = mesh.label(t);
    if parameters.use_ambient() && label == parameters.ambient_label() {
      continue;
    }
    if let Err(slot) = labels.binary_search(&label) {
      labels.insert(slot, label);
    }
  }

  attributes.clear_labels(vertex);
  for &label in &labels {
    attributes.add_label(vertex, label);

    for name in attributes.vertex_attribute_names() {
      let a = attributes.vertex_value(&name, v1, label)?;
      let b = attributes.vertex_value(&name, v2, label)?;
      attributes.set_vertex_value(&name, vertex, label, 0.5 * (a + b))?;
    }

    let t1 = attributes.target(v1, label)?;
    let t2 = attributes.target(v2, label)?;
    attributes.set_target(vertex, label, (t1 + t2) * 0.5);
  }

  Ok(())
}

/// Place the duplicate of a vertex split on the inward offset curve of the
/// phase being pulled off, move the label and its values over, and erase
/// it from the original vertex.
fn assign_vertex_split(
  plan: &Plan,
  mesh: &Mesh,
  attributes: &mut AttributeStore,
  label: u32,
  strength: f64,
) -> Result<()> {
  let mut vertices = plan.new_simplices.vertices();
  let (a, b) = match (vertices.next(), vertices.next()) {
    (Some(a), Some(b)) => (a, b),
    _ => {
      return Err(EngineError::InvalidArgument(
        "vertex split plan needs the vertex and its duplicate".into(),
      ))
    }
  };

  let anchor = plan
    .old_simplices
    .triangles()
    .next()
    .ok_or_else(|| EngineError::InvalidArgument("vertex split plan without fan".into()))?;

  let (v_old, v_new): (Simplex0, Simplex0) = if anchor.contains(a) { (a, b) } else { (b, a) };

  let inside = offset_position(mesh, attributes, v_old, label, -strength).ok_or_else(|| {
    EngineError::InvalidArgument(format!("no offset position for {v_old} in phase {label}"))
  })?;

  attributes.set_current(v_new, inside);
  attributes.add_label(v_new, label);

  for name in attributes.vertex_attribute_names() {
    let value = attributes.vertex_value(&name, v_old, label)?;
    attributes.set_vertex_value(&name, v_new, label, value)?;
  }
  let target = attributes.target(v_old, label)?;
  attributes.set_target(v_new, label, target);

  attributes.erase_label(v_old, label);

  Ok(())
}

#[cfg(test)]
#[path = "assignment_test.rs"]
mod assignment_test;
