//! Error taxonomy of the engine.
//!
//! Errors raised inside a single analyzer step are local: the batch runner
//! logs them and moves on to the next candidate. Errors from decomposition,
//! merging, I/O, or the glue boundary are fatal to the enclosing call and
//! surface to the caller. In either case the mesh and attribute store are
//! left in their last fully consistent state.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("attribute `{name}` does not exist for dimension {dimension}")]
  MissingAttribute { name: String, dimension: u32 },

  #[error("vertex {vertex} carries no label {label}")]
  UnknownLabel { vertex: u32, label: u32 },

  #[error("no parent entry for {0}")]
  MissingParent(String),

  #[error("topology violation: {0}")]
  TopologyViolation(String),

  #[error("invalid geometry: {0}")]
  InvalidGeometry(String),

  #[error("mesh i/o failed: {0}")]
  IoFailure(String),
}

impl From<std::io::Error> for EngineError {
  fn from(e: std::io::Error) -> Self {
    EngineError::IoFailure(e.to_string())
  }
}

pub type Result<T> = std::result::Result<T, EngineError>;
