//! Termination monitors for the scheduler loop.

use crate::params::Parameters;

pub trait Monitor {
  fn init(&mut self, parameters: &Parameters);
  fn reset(&mut self);
  fn update(&mut self);
  fn next(&self) -> bool;
}

/// Caps the number of scheduler iterations, configured through
/// `max_iterations` under the monitor's name.
pub struct CountMonitor {
  name: String,
  max_iterations: usize,
  iterations: usize,
  verbose: bool,
}

impl CountMonitor {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      max_iterations: 0,
      iterations: 0,
      verbose: false,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

impl Monitor for CountMonitor {
  fn init(&mut self, parameters: &Parameters) {
    self.max_iterations = parameters.max_iterations(&self.name);
    self.verbose = parameters.verbose();
  }

  fn reset(&mut self) {
    self.iterations = 0;
  }

  fn update(&mut self) {
    self.iterations += 1;
  }

  fn next(&self) -> bool {
    if self.iterations >= self.max_iterations {
      if self.verbose {
        tracing::debug!(name = %self.name, "max iterations reached");
      }
      return false;
    }
    true
  }
}

#[cfg(test)]
#[path = "monitor_test.rs"]
mod monitor_test;
