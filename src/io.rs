//! Text mesh input and output.
//!
//! Line-oriented grammar:
//! - `v x y` declares a vertex; indices are assigned in declaration order
//!   starting at 1.
//! - `t i j k` declares a triangle over one-based vertex indices, expected
//!   CCW (a warning is emitted otherwise, but the triangle is kept).
//! - `l i j k phase` assigns a phase label to triangle `(i, j, k)`.
//! - `#` ends the file; other prefixes are ignored with a warning.

use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use glam::DVec2;

use crate::attributes::AttributeStore;
use crate::error::{EngineError, Result};
use crate::math::signed_triangle_area;
use crate::mesh::Mesh;
use crate::params::Parameters;
use crate::simplex::{Simplex0, Simplex2};

fn parse_token<T: FromStr>(token: Option<&str>, line_number: usize, what: &str) -> Result<T> {
  token
    .and_then(|t| t.parse().ok())
    .ok_or_else(|| EngineError::IoFailure(format!("line {line_number}: expected {what}")))
}

fn vertex_at(
  vertices: &[Simplex0],
  one_based: usize,
  line_number: usize,
) -> Result<Simplex0> {
  if one_based == 0 || one_based > vertices.len() {
    return Err(EngineError::IoFailure(format!(
      "line {line_number}: vertex index {one_based} out of bounds"
    )));
  }
  Ok(vertices[one_based - 1])
}

/// Load a mesh and its coordinates from a text file, applying the
/// parameters' phase relabelling.
pub fn load_mesh(path: impl AsRef<Path>, parameters: &Parameters) -> Result<(Mesh, AttributeStore)> {
  let path = path.as_ref();
  let text = std::fs::read_to_string(path)
    .map_err(|e| EngineError::IoFailure(format!("{}: {e}", path.display())))?;

  let mut mesh = Mesh::new();
  let mut attributes = AttributeStore::new();
  let mut vertices: Vec<Simplex0> = Vec::new();
  let mut triangle_count = 0usize;

  'lines: for (index, line) in text.lines().enumerate() {
    let line_number = index + 1;
    let mut tokens = line.split_whitespace();

    match tokens.next() {
      None => continue,
      Some("v") => {
        let x: f64 = parse_token(tokens.next(), line_number, "x coordinate")?;
        let y: f64 = parse_token(tokens.next(), line_number, "y coordinate")?;
        let v = mesh.insert_vertex();
        attributes.set_current(v, DVec2::new(x, y));
        vertices.push(v);
      }
      Some("t") => {
        let i: usize = parse_token(tokens.next(), line_number, "vertex index")?;
        let j: usize = parse_token(tokens.next(), line_number, "vertex index")?;
        let k: usize = parse_token(tokens.next(), line_number, "vertex index")?;

        let a = vertex_at(&vertices, i, line_number)?;
        let b = vertex_at(&vertices, j, line_number)?;
        let c = vertex_at(&vertices, k, line_number)?;

        let area = signed_triangle_area(
          attributes.current(a),
          attributes.current(b),
          attributes.current(c),
        );
        if area <= 0.0 {
          tracing::warn!(
            line_number,
            "triangle with non-positive orientation; possible error in input file"
          );
        }

        mesh
          .insert_triangle(a, b, c)
          .map_err(|e| EngineError::IoFailure(format!("line {line_number}: {e}")))?;
        triangle_count += 1;
      }
      Some("l") => {
        let i: usize = parse_token(tokens.next(), line_number, "vertex index")?;
        let j: usize = parse_token(tokens.next(), line_number, "vertex index")?;
        let k: usize = parse_token(tokens.next(), line_number, "vertex index")?;
        let phase: u32 = parse_token(tokens.next(), line_number, "phase label")?;

        let a = vertex_at(&vertices, i, line_number)?;
        let b = vertex_at(&vertices, j, line_number)?;
        let c = vertex_at(&vertices, k, line_number)?;

        let t = Simplex2::new(a, b, c);
        if mesh.is_valid(t) {
          mesh.set_label(t, parameters.relabel(phase));
        } else {
          tracing::warn!(line_number, "label for unknown triangle ignored");
        }
      }
      Some("#") => break 'lines,
      Some(prefix) => {
        tracing::warn!(line_number, prefix, "unknown line prefix ignored");
      }
    }
  }

  tracing::info!(
    path = %path.display(),
    vertices = vertices.len(),
    triangles = triangle_count,
    "mesh loaded"
  );

  Ok((mesh, attributes))
}

/// Write the mesh in the same grammar, vertices and triangles in
/// canonical id order, triangles in their stored CCW corner order.
pub fn save_mesh(path: impl AsRef<Path>, mesh: &Mesh, attributes: &AttributeStore) -> Result<()> {
  let mut remap = std::collections::BTreeMap::new();
  let mut out = String::new();

  for (counter, v) in mesh.vertices_iter().enumerate() {
    remap.insert(v, counter + 1);
    let p = attributes
      .try_current(v)
      .ok_or_else(|| EngineError::InvalidArgument(format!("{v} has no coordinates")))?;
    let _ = writeln!(out, "v {} {}", p.x, p.y);
  }

  for t in mesh.triangles_iter() {
    let [a, b, c] = mesh.corners(t);
    let _ = writeln!(out, "t {} {} {}", remap[&a], remap[&b], remap[&c]);
  }

  for t in mesh.triangles_iter() {
    let [a, b, c] = mesh.corners(t);
    let _ = writeln!(
      out,
      "l {} {} {} {}",
      remap[&a],
      remap[&b],
      remap[&c],
      mesh.label(t)
    );
  }

  let path = path.as_ref();
  std::fs::write(path, out)
    .map_err(|e| EngineError::IoFailure(format!("{}: {e}", path.display())))?;
  Ok(())
}

#[cfg(test)]
#[path = "io_test.rs"]
mod io_test;
