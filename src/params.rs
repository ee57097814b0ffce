//! Remeshing parameters.
//!
//! One immutable value drives a whole `update` call. Threshold-style
//! settings resolve per (operation name, phase label) with a name-level
//! value as fallback, matching how applications tune individual phases
//! without repeating the common case. Subdomains each receive a clone, so
//! worker threads never share parameter state.

use std::collections::BTreeMap;

/// A scalar setting keyed per (operation, label) with name-level and global
/// fallbacks.
#[derive(Clone, Debug)]
struct Setting {
  per_label: BTreeMap<(String, u32), f64>,
  per_name: BTreeMap<String, f64>,
  fallback: f64,
}

impl Setting {
  fn new(fallback: f64) -> Self {
    Self {
      per_label: BTreeMap::new(),
      per_name: BTreeMap::new(),
      fallback,
    }
  }

  fn get(&self, name: &str, label: u32) -> f64 {
    if let Some(value) = self.per_label.get(&(name.to_string(), label)) {
      return *value;
    }
    if let Some(value) = self.per_name.get(name) {
      return *value;
    }
    self.fallback
  }
}

#[derive(Clone, Debug)]
pub struct Parameters {
  number_of_subdomains: usize,
  ambient_label: u32,
  use_ambient: bool,
  input_labels: Vec<u32>,
  labels: Vec<u32>,
  use_sparse_edge_attributes: bool,
  use_only_interface: bool,
  verbose: bool,
  silent_threads: bool,
  profiling: bool,
  debug_render: bool,
  debug_render_filename: String,
  debug_render_level: u32,
  max_iterations: BTreeMap<String, usize>,
  default_max_iterations: usize,
  upper_threshold_attribute: BTreeMap<String, String>,
  lower_threshold_attribute: BTreeMap<String, String>,
  angle_threshold: Setting,
  distance_threshold: Setting,
  area_threshold: Setting,
  strength: Setting,
}

impl Default for Parameters {
  fn default() -> Self {
    Self {
      number_of_subdomains: 1,
      ambient_label: 0,
      use_ambient: false,
      input_labels: Vec::new(),
      labels: Vec::new(),
      use_sparse_edge_attributes: false,
      use_only_interface: false,
      verbose: false,
      silent_threads: false,
      profiling: false,
      debug_render: false,
      debug_render_filename: String::new(),
      debug_render_level: 0,
      max_iterations: BTreeMap::new(),
      default_max_iterations: 1,
      upper_threshold_attribute: BTreeMap::new(),
      lower_threshold_attribute: BTreeMap::new(),
      // The fallback thresholds are chosen so unconfigured operations stay
      // inert: a 180 degree flatness bound and zero distances/areas never
      // select a candidate.
      angle_threshold: Setting::new(180.0),
      distance_threshold: Setting::new(0.0),
      area_threshold: Setting::new(0.0),
      strength: Setting::new(0.0),
    }
  }
}

impl Parameters {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn number_of_subdomains(&self) -> usize {
    self.number_of_subdomains.max(1)
  }

  pub fn set_number_of_subdomains(&mut self, n: usize) -> &mut Self {
    self.number_of_subdomains = n.max(1);
    self
  }

  pub fn ambient_label(&self) -> u32 {
    self.ambient_label
  }

  pub fn set_ambient_label(&mut self, label: u32) -> &mut Self {
    self.ambient_label = label;
    self
  }

  pub fn use_ambient(&self) -> bool {
    self.use_ambient
  }

  pub fn set_use_ambient(&mut self, value: bool) -> &mut Self {
    self.use_ambient = value;
    self
  }

  /// Explicit phase relabelling: triangles loaded with `input_labels[i]`
  /// are stored as `labels[i]`.
  pub fn set_relabelling(&mut self, input_labels: Vec<u32>, labels: Vec<u32>) -> &mut Self {
    debug_assert_eq!(input_labels.len(), labels.len());
    self.input_labels = input_labels;
    self.labels = labels;
    self
  }

  pub fn relabel(&self, label: u32) -> u32 {
    match self.input_labels.iter().position(|&l| l == label) {
      Some(i) => self.labels[i],
      None => label,
    }
  }

  pub fn use_sparse_edge_attributes(&self) -> bool {
    self.use_sparse_edge_attributes
  }

  pub fn set_use_sparse_edge_attributes(&mut self, value: bool) -> &mut Self {
    self.use_sparse_edge_attributes = value;
    self
  }

  pub fn use_only_interface(&self) -> bool {
    self.use_only_interface
  }

  pub fn set_use_only_interface(&mut self, value: bool) -> &mut Self {
    self.use_only_interface = value;
    self
  }

  pub fn verbose(&self) -> bool {
    self.verbose
  }

  pub fn set_verbose(&mut self, value: bool) -> &mut Self {
    self.verbose = value;
    self
  }

  pub fn silent_threads(&self) -> bool {
    self.silent_threads
  }

  pub fn set_silent_threads(&mut self, value: bool) -> &mut Self {
    self.silent_threads = value;
    self
  }

  pub fn profiling(&self) -> bool {
    self.profiling
  }

  pub fn set_profiling(&mut self, value: bool) -> &mut Self {
    self.profiling = value;
    self
  }

  /// Emit a trace event for every candidate the runner touches.
  pub fn debug_render(&self) -> bool {
    self.debug_render
  }

  pub fn set_debug_render(&mut self, value: bool) -> &mut Self {
    self.debug_render = value;
    self
  }

  pub fn debug_render_filename(&self) -> &str {
    &self.debug_render_filename
  }

  pub fn set_debug_render_filename(&mut self, value: &str) -> &mut Self {
    self.debug_render_filename = value.to_string();
    self
  }

  pub fn debug_render_level(&self) -> u32 {
    self.debug_render_level
  }

  pub fn set_debug_render_level(&mut self, value: u32) -> &mut Self {
    self.debug_render_level = value;
    self
  }

  /// Batch pass cap for the named operation; `"scheduler"` caps scheduler
  /// iterations.
  pub fn max_iterations(&self, name: &str) -> usize {
    self
      .max_iterations
      .get(name)
      .copied()
      .unwrap_or(self.default_max_iterations)
  }

  pub fn set_max_iterations(&mut self, name: &str, value: usize) -> &mut Self {
    self.max_iterations.insert(name.to_string(), value);
    self
  }

  /// Cap applied to operations without an explicit entry.
  pub fn set_default_max_iterations(&mut self, value: usize) -> &mut Self {
    self.default_max_iterations = value;
    self
  }

  /// Name of the edge attribute holding the upper length bound consumed by
  /// the named split operation.
  pub fn upper_threshold_attribute(&self, name: &str) -> &str {
    self
      .upper_threshold_attribute
      .get(name)
      .map(String::as_str)
      .unwrap_or("refinement")
  }

  pub fn set_upper_threshold_attribute(&mut self, name: &str, attribute: &str) -> &mut Self {
    self
      .upper_threshold_attribute
      .insert(name.to_string(), attribute.to_string());
    self
  }

  /// Name of the edge attribute holding the lower length bound consumed by
  /// the named collapse operation.
  pub fn lower_threshold_attribute(&self, name: &str) -> &str {
    self
      .lower_threshold_attribute
      .get(name)
      .map(String::as_str)
      .unwrap_or("coarsening")
  }

  pub fn set_lower_threshold_attribute(&mut self, name: &str, attribute: &str) -> &mut Self {
    self
      .lower_threshold_attribute
      .insert(name.to_string(), attribute.to_string());
    self
  }

  /// Angle test (degrees) for flatness and merge style operations.
  pub fn angle_threshold(&self, name: &str, label: u32) -> f64 {
    self.angle_threshold.get(name, label)
  }

  pub fn set_angle_threshold(&mut self, name: &str, value: f64) -> &mut Self {
    self.angle_threshold.per_name.insert(name.to_string(), value);
    self
  }

  pub fn set_angle_threshold_for(&mut self, name: &str, label: u32, value: f64) -> &mut Self {
    self
      .angle_threshold
      .per_label
      .insert((name.to_string(), label), value);
    self
  }

  /// Proximity / vertex-split distance test.
  pub fn distance_threshold(&self, name: &str, label: u32) -> f64 {
    self.distance_threshold.get(name, label)
  }

  pub fn set_distance_threshold(&mut self, name: &str, value: f64) -> &mut Self {
    self
      .distance_threshold
      .per_name
      .insert(name.to_string(), value);
    self
  }

  pub fn set_distance_threshold_for(&mut self, name: &str, label: u32, value: f64) -> &mut Self {
    self
      .distance_threshold
      .per_label
      .insert((name.to_string(), label), value);
    self
  }

  /// Smallest admissible triangle area for collapse style operations.
  pub fn area_threshold(&self, name: &str, label: u32) -> f64 {
    self.area_threshold.get(name, label)
  }

  pub fn set_area_threshold(&mut self, name: &str, value: f64) -> &mut Self {
    self.area_threshold.per_name.insert(name.to_string(), value);
    self
  }

  pub fn set_area_threshold_for(&mut self, name: &str, label: u32, value: f64) -> &mut Self {
    self
      .area_threshold
      .per_label
      .insert((name.to_string(), label), value);
    self
  }

  /// Vertex-split offset magnitude.
  pub fn strength(&self, name: &str, label: u32) -> f64 {
    self.strength.get(name, label)
  }

  pub fn set_strength(&mut self, name: &str, value: f64) -> &mut Self {
    self.strength.per_name.insert(name.to_string(), value);
    self
  }

  pub fn set_strength_for(&mut self, name: &str, label: u32, value: f64) -> &mut Self {
    self
      .strength
      .per_label
      .insert((name.to_string(), label), value);
    self
  }
}

#[cfg(test)]
#[path = "params_test.rs"]
mod params_test;
