//! Named scalar fields over the complex, plus the reserved coordinate
//! fields.
//!
//! Vertex attributes are keyed by (vertex, phase label): a vertex sitting
//! on an interface carries one independent value per phase it touches.
//! Edge and triangle attributes are single-valued. Two reserved vector
//! fields exist on vertices: `current`, the embedding position, and
//! `target`, the prescribed destination per (vertex, label).
//!
//! The store also owns simplex registration: `insert_set` / `remove_set`
//! keep attribute lifecycles in step with mesh operations, and the
//! per-vertex label set is the single source of phase membership at a
//! vertex.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec2;

use crate::error::{EngineError, Result};
use crate::simplex::{Simplex, Simplex0, Simplex1, Simplex2};
use crate::simplex_set::SimplexSet;

#[derive(Clone, Debug, Default)]
pub struct AttributeStore {
  vertex_fields: BTreeMap<String, BTreeMap<(Simplex0, u32), f64>>,
  edge_fields: BTreeMap<String, BTreeMap<Simplex1, f64>>,
  triangle_fields: BTreeMap<String, BTreeMap<Simplex2, f64>>,
  vertex_labels: BTreeMap<Simplex0, Vec<u32>>,
  edge_present: BTreeSet<Simplex1>,
  triangle_present: BTreeSet<Simplex2>,
  current: BTreeMap<Simplex0, DVec2>,
  target: BTreeMap<(Simplex0, u32), DVec2>,
}

impl AttributeStore {
  pub fn new() -> Self {
    Self::default()
  }

  // ===========================================================================
  // Field creation and lookup
  // ===========================================================================

  /// Create a named field for one simplex dimension. Idempotent; creating
  /// a name that exists for a different dimension is an error.
  pub fn create(&mut self, name: &str, dimension: u32) -> Result<()> {
    let clash = match dimension {
      0 => self.edge_fields.contains_key(name) || self.triangle_fields.contains_key(name),
      1 => self.vertex_fields.contains_key(name) || self.triangle_fields.contains_key(name),
      2 => self.vertex_fields.contains_key(name) || self.edge_fields.contains_key(name),
      _ => {
        return Err(EngineError::InvalidArgument(format!(
          "no simplex dimension {dimension}"
        )))
      }
    };
    if clash {
      return Err(EngineError::InvalidArgument(format!(
        "attribute `{name}` already exists with a different dimension"
      )));
    }

    match dimension {
      0 => {
        self.vertex_fields.entry(name.to_string()).or_default();
      }
      1 => {
        self.edge_fields.entry(name.to_string()).or_default();
      }
      _ => {
        self.triangle_fields.entry(name.to_string()).or_default();
      }
    }
    Ok(())
  }

  pub fn exist(&self, name: &str, dimension: u32) -> bool {
    match dimension {
      0 => self.vertex_fields.contains_key(name),
      1 => self.edge_fields.contains_key(name),
      2 => self.triangle_fields.contains_key(name),
      _ => false,
    }
  }

  pub fn vertex_attribute_names(&self) -> Vec<String> {
    self.vertex_fields.keys().cloned().collect()
  }

  pub fn edge_attribute_names(&self) -> Vec<String> {
    self.edge_fields.keys().cloned().collect()
  }

  pub fn triangle_attribute_names(&self) -> Vec<String> {
    self.triangle_fields.keys().cloned().collect()
  }

  // ===========================================================================
  // Scalar values
  // ===========================================================================

  /// Value of a vertex field at (vertex, label). The label must be in the
  /// vertex's label set; a registered pair that was never written reads as
  /// zero.
  pub fn vertex_value(&self, name: &str, v: Simplex0, label: u32) -> Result<f64> {
    let field = self
      .vertex_fields
      .get(name)
      .ok_or_else(|| EngineError::MissingAttribute {
        name: name.to_string(),
        dimension: 0,
      })?;
    if !self.labels(v).contains(&label) {
      return Err(EngineError::UnknownLabel {
        vertex: v.index(),
        label,
      });
    }
    Ok(field.get(&(v, label)).copied().unwrap_or(0.0))
  }

  pub fn set_vertex_value(&mut self, name: &str, v: Simplex0, label: u32, value: f64) -> Result<()> {
    let field = self
      .vertex_fields
      .get_mut(name)
      .ok_or_else(|| EngineError::MissingAttribute {
        name: name.to_string(),
        dimension: 0,
      })?;
    field.insert((v, label), value);
    Ok(())
  }

  pub fn edge_value(&self, name: &str, e: Simplex1) -> Result<f64> {
    let field = self
      .edge_fields
      .get(name)
      .ok_or_else(|| EngineError::MissingAttribute {
        name: name.to_string(),
        dimension: 1,
      })?;
    Ok(field.get(&e).copied().unwrap_or(0.0))
  }

  pub fn set_edge_value(&mut self, name: &str, e: Simplex1, value: f64) -> Result<()> {
    let field = self
      .edge_fields
      .get_mut(name)
      .ok_or_else(|| EngineError::MissingAttribute {
        name: name.to_string(),
        dimension: 1,
      })?;
    field.insert(e, value);
    Ok(())
  }

  pub fn triangle_value(&self, name: &str, t: Simplex2) -> Result<f64> {
    let field = self
      .triangle_fields
      .get(name)
      .ok_or_else(|| EngineError::MissingAttribute {
        name: name.to_string(),
        dimension: 2,
      })?;
    Ok(field.get(&t).copied().unwrap_or(0.0))
  }

  pub fn set_triangle_value(&mut self, name: &str, t: Simplex2, value: f64) -> Result<()> {
    let field = self
      .triangle_fields
      .get_mut(name)
      .ok_or_else(|| EngineError::MissingAttribute {
        name: name.to_string(),
        dimension: 2,
      })?;
    field.insert(t, value);
    Ok(())
  }

  /// Write `value` to every registered simplex of the dimension.
  pub fn clear(&mut self, name: &str, dimension: u32, value: f64) -> Result<()> {
    match dimension {
      0 => {
        let pairs: Vec<(Simplex0, u32)> = self
          .vertex_labels
          .iter()
          .flat_map(|(&v, labels)| labels.iter().map(move |&l| (v, l)))
          .collect();
        let field = self
          .vertex_fields
          .get_mut(name)
          .ok_or_else(|| EngineError::MissingAttribute {
            name: name.to_string(),
            dimension: 0,
          })?;
        for key in pairs {
          field.insert(key, value);
        }
      }
      1 => {
        let edges: Vec<Simplex1> = self.edge_present.iter().copied().collect();
        let field = self
          .edge_fields
          .get_mut(name)
          .ok_or_else(|| EngineError::MissingAttribute {
            name: name.to_string(),
            dimension: 1,
          })?;
        for e in edges {
          field.insert(e, value);
        }
      }
      2 => {
        let triangles: Vec<Simplex2> = self.triangle_present.iter().copied().collect();
        let field = self
          .triangle_fields
          .get_mut(name)
          .ok_or_else(|| EngineError::MissingAttribute {
            name: name.to_string(),
            dimension: 2,
          })?;
        for t in triangles {
          field.insert(t, value);
        }
      }
      _ => {
        return Err(EngineError::InvalidArgument(format!(
          "no simplex dimension {dimension}"
        )))
      }
    }
    Ok(())
  }

  // ===========================================================================
  // Reserved vector fields
  // ===========================================================================

  /// Embedding position. The vertex must have been placed; use
  /// `try_current` when that is not guaranteed.
  pub fn current(&self, v: Simplex0) -> DVec2 {
    self.current[&v]
  }

  pub fn try_current(&self, v: Simplex0) -> Option<DVec2> {
    self.current.get(&v).copied()
  }

  pub fn set_current(&mut self, v: Simplex0, position: DVec2) {
    self.current.insert(v, position);
  }

  /// Prescribed destination of a vertex within one phase.
  pub fn target(&self, v: Simplex0, label: u32) -> Result<DVec2> {
    self
      .target
      .get(&(v, label))
      .copied()
      .ok_or(EngineError::UnknownLabel {
        vertex: v.index(),
        label,
      })
  }

  pub fn set_target(&mut self, v: Simplex0, label: u32, position: DVec2) {
    self.target.insert((v, label), position);
  }

  // ===========================================================================
  // Per-vertex label sets
  // ===========================================================================

  /// Phase labels the vertex participates in, ascending.
  pub fn labels(&self, v: Simplex0) -> &[u32] {
    self
      .vertex_labels
      .get(&v)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Add a label to a vertex. Seeds `target` with the vertex's current
  /// position so the pair is readable immediately.
  pub fn add_label(&mut self, v: Simplex0, label: u32) {
    let labels = self.vertex_labels.entry(v).or_default();
    if let Err(slot) = labels.binary_search(&label) {
      labels.insert(slot, label);
    }
    if !self.target.contains_key(&(v, label)) {
      let seed = self.current.get(&v).copied().unwrap_or(DVec2::ZERO);
      self.target.insert((v, label), seed);
    }
  }

  /// Remove a label from a vertex, dropping every value stored at that
  /// (vertex, label) pair. All other pairs of the vertex are preserved.
  pub fn erase_label(&mut self, v: Simplex0, label: u32) {
    if let Some(labels) = self.vertex_labels.get_mut(&v) {
      labels.retain(|&l| l != label);
    }
    for field in self.vertex_fields.values_mut() {
      field.remove(&(v, label));
    }
    self.target.remove(&(v, label));
  }

  pub fn clear_labels(&mut self, v: Simplex0) {
    let labels = self.vertex_labels.insert(v, Vec::new()).unwrap_or_default();
    for label in labels {
      for field in self.vertex_fields.values_mut() {
        field.remove(&(v, label));
      }
      self.target.remove(&(v, label));
    }
  }

  // ===========================================================================
  // Registration lifecycle
  // ===========================================================================

  /// True when the store tracks the simplex.
  pub fn is_registered(&self, s: impl Into<Simplex>) -> bool {
    match s.into() {
      Simplex::Vertex(v) => self.vertex_labels.contains_key(&v),
      Simplex::Edge(e) => self.edge_present.contains(&e),
      Simplex::Triangle(t) => self.triangle_present.contains(&t),
    }
  }

  /// Register every simplex of the set, default-filling named fields for
  /// edges and triangles. Already registered simplices keep their values.
  /// Returns the subset that was actually new.
  pub fn insert_set(&mut self, simplices: &SimplexSet) -> SimplexSet {
    let mut created = SimplexSet::new();

    for v in simplices.vertices() {
      if !self.vertex_labels.contains_key(&v) {
        self.vertex_labels.insert(v, Vec::new());
        created.insert(v);
      }
    }
    for e in simplices.edges() {
      if self.edge_present.insert(e) {
        created.insert(e);
        for field in self.edge_fields.values_mut() {
          field.entry(e).or_insert(0.0);
        }
      }
    }
    for t in simplices.triangles() {
      if self.triangle_present.insert(t) {
        created.insert(t);
        for field in self.triangle_fields.values_mut() {
          field.entry(t).or_insert(0.0);
        }
      }
    }

    created
  }

  /// Drop every value stored for the simplices of the set.
  pub fn remove_set(&mut self, simplices: &SimplexSet) {
    for v in simplices.vertices() {
      let labels = self.vertex_labels.remove(&v).unwrap_or_default();
      for label in labels {
        for field in self.vertex_fields.values_mut() {
          field.remove(&(v, label));
        }
        self.target.remove(&(v, label));
      }
      self.current.remove(&v);
    }
    for e in simplices.edges() {
      self.edge_present.remove(&e);
      for field in self.edge_fields.values_mut() {
        field.remove(&e);
      }
    }
    for t in simplices.triangles() {
      self.triangle_present.remove(&t);
      for field in self.triangle_fields.values_mut() {
        field.remove(&t);
      }
    }
  }

  // ===========================================================================
  // Cross-store copies (decomposition and merging)
  // ===========================================================================

  /// Create every field of `other` in this store.
  pub fn copy_names_from(&mut self, other: &AttributeStore) {
    for name in other.vertex_fields.keys() {
      self.vertex_fields.entry(name.clone()).or_default();
    }
    for name in other.edge_fields.keys() {
      self.edge_fields.entry(name.clone()).or_default();
    }
    for name in other.triangle_fields.keys() {
      self.triangle_fields.entry(name.clone()).or_default();
    }
  }

  /// Copy every value `other` stores for `from`, storing it here under
  /// `to`. The two handles usually coincide; they differ when merging
  /// remaps vertices created inside a subdomain.
  pub fn copy_vertex_from(&mut self, other: &AttributeStore, from: Simplex0, to: Simplex0) {
    let labels = other.labels(from).to_vec();
    self.vertex_labels.insert(to, labels.clone());
    if let Some(position) = other.try_current(from) {
      self.current.insert(to, position);
    }
    for &label in &labels {
      if let Some(position) = other.target.get(&(from, label)) {
        self.target.insert((to, label), *position);
      }
      for (name, field) in &other.vertex_fields {
        if let Some(&value) = field.get(&(from, label)) {
          self
            .vertex_fields
            .entry(name.clone())
            .or_default()
            .insert((to, label), value);
        }
      }
    }
  }

  pub fn copy_edge_from(&mut self, other: &AttributeStore, from: Simplex1, to: Simplex1) {
    self.edge_present.insert(to);
    for (name, field) in &other.edge_fields {
      if let Some(&value) = field.get(&from) {
        self
          .edge_fields
          .entry(name.clone())
          .or_default()
          .insert(to, value);
      }
    }
  }

  pub fn copy_triangle_from(&mut self, other: &AttributeStore, from: Simplex2, to: Simplex2) {
    self.triangle_present.insert(to);
    for (name, field) in &other.triangle_fields {
      if let Some(&value) = field.get(&from) {
        self
          .triangle_fields
          .entry(name.clone())
          .or_default()
          .insert(to, value);
      }
    }
  }
}

#[cfg(test)]
#[path = "attributes_test.rs"]
mod attributes_test;
