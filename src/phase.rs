//! Glue layer: contiguous local-index views over phase subsets.
//!
//! A [`Phase`] projects a subset of the mesh into dense arrays with local
//! vertex indexing, so application code (simulators, assembly loops) can
//! read and write attribute ranges without touching mesh handles. A phase
//! is a snapshot view: it borrows nothing, but it is only meaningful until
//! the next mesh mutation.

use std::collections::BTreeMap;

use glam::DVec2;

use crate::engine::MeshEngine;
use crate::error::{EngineError, Result};
use crate::simplex::{Simplex0, Simplex1, Simplex2};
use crate::simplex_set::SimplexSet;
use crate::util::{compute_interface, compute_phase};

/// Marker for "no neighbour" in adjacency triplets.
pub const UNDEFINED: u32 = u32::MAX;

#[derive(Clone, Debug, Default)]
pub struct Phase {
  /// Phase labels represented in this view, ascending.
  pub labels: Vec<u32>,
  /// Local index -> global vertex.
  pub vertices: Vec<Simplex0>,
  /// Global vertex id -> local index.
  indices: BTreeMap<u32, u32>,
  /// Edges in local indices.
  pub edges: Vec<[u32; 2]>,
  /// Triangles in local indices, stored CCW corner order.
  pub triangles: Vec<[u32; 3]>,
}

impl Phase {
  pub fn local_index(&self, v: Simplex0) -> Option<u32> {
    self.indices.get(&v.index()).copied()
  }

  pub fn vertex_count(&self) -> usize {
    self.vertices.len()
  }
}

/// Build a phase view over an arbitrary simplex subset.
pub fn make_phase_from_set(engine: &MeshEngine, domain: &SimplexSet) -> Phase {
  let mesh = engine.mesh();
  let mut phase = Phase::default();

  for (count, v) in domain
    .vertices()
    .filter(|&v| mesh.is_valid(v))
    .enumerate()
  {
    phase.indices.insert(v.index(), count as u32);
    phase.vertices.push(v);
  }

  for e in domain.edges().filter(|&e| mesh.is_valid(e)) {
    let (a, b) = e.endpoints();
    if let (Some(i), Some(j)) = (phase.local_index(a), phase.local_index(b)) {
      phase.edges.push([i, j]);
    }
  }

  for t in domain.triangles().filter(|&t| mesh.is_valid(t)) {
    let [a, b, c] = mesh.corners(t);
    if let (Some(i), Some(j), Some(k)) = (
      phase.local_index(a),
      phase.local_index(b),
      phase.local_index(c),
    ) {
      phase.triangles.push([i, j, k]);

      let label = mesh.label(t);
      if let Err(slot) = phase.labels.binary_search(&label) {
        phase.labels.insert(slot, label);
      }
    }
  }

  phase
}

/// Build the view of one phase label.
pub fn make_phase(engine: &MeshEngine, label: u32) -> Phase {
  let subset = compute_phase(engine.mesh(), label);
  make_phase_from_set(engine, &subset)
}

/// Build the view of the whole mesh.
pub fn make_phase_of_mesh(engine: &MeshEngine) -> Phase {
  let all = engine.mesh().all_simplices();
  make_phase_from_set(engine, &all)
}

/// Build the view of one phase's interface boundary. The view has edges
/// and vertices but no triangles; its label list is seeded explicitly.
pub fn make_boundary_of_phase(engine: &MeshEngine, label: u32) -> Phase {
  let subset = compute_phase(engine.mesh(), label);
  let boundary = compute_interface(engine.mesh(), &subset);
  let mut phase = make_phase_from_set(engine, &boundary);
  phase.labels = vec![label];
  phase
}

/// Read a named vertex attribute into a dense array over the phase's
/// local indexing. A vertex carrying several labels reads the value of
/// its highest label.
pub fn get_sub_range(engine: &MeshEngine, phase: &Phase, name: &str) -> Result<Vec<f64>> {
  if !engine.attributes().exist(name, 0) {
    return Err(EngineError::MissingAttribute {
      name: name.to_string(),
      dimension: 0,
    });
  }

  let mut values = vec![0.0; phase.vertex_count()];
  for (i, &v) in phase.vertices.iter().enumerate() {
    for &label in engine.attributes().labels(v) {
      values[i] = engine.attributes().vertex_value(name, v, label)?;
    }
  }
  Ok(values)
}

/// Write a dense array back into a named vertex attribute, at every label
/// of every phase vertex.
pub fn set_sub_range(
  engine: &mut MeshEngine,
  phase: &Phase,
  name: &str,
  values: &[f64],
) -> Result<()> {
  if !engine.attributes().exist(name, 0) {
    return Err(EngineError::MissingAttribute {
      name: name.to_string(),
      dimension: 0,
    });
  }
  if phase.vertex_count() != values.len() {
    return Err(EngineError::InvalidArgument(format!(
      "phase has {} vertices but {} values were given",
      phase.vertex_count(),
      values.len()
    )));
  }

  for (i, &v) in phase.vertices.iter().enumerate() {
    for label in engine.attributes().labels(v).to_vec() {
      engine
        .attributes_mut()
        .set_vertex_value(name, v, label, values[i])?;
    }
  }
  Ok(())
}

/// Read current coordinates into dense x/y arrays.
pub fn get_sub_range_current(engine: &MeshEngine, phase: &Phase) -> (Vec<f64>, Vec<f64>) {
  let mut x = vec![0.0; phase.vertex_count()];
  let mut y = vec![0.0; phase.vertex_count()];
  for (i, &v) in phase.vertices.iter().enumerate() {
    if let Some(p) = engine.attributes().try_current(v) {
      x[i] = p.x;
      y[i] = p.y;
    }
  }
  (x, y)
}

/// Overwrite current coordinates from dense x/y arrays.
pub fn set_sub_range_current(
  engine: &mut MeshEngine,
  phase: &Phase,
  x: &[f64],
  y: &[f64],
) -> Result<()> {
  if phase.vertex_count() != x.len() || phase.vertex_count() != y.len() {
    return Err(EngineError::InvalidArgument(
      "vertices and coordinate arrays must be of same size".into(),
    ));
  }
  for (i, &v) in phase.vertices.iter().enumerate() {
    engine
      .attributes_mut()
      .set_current(v, DVec2::new(x[i], y[i]));
  }
  Ok(())
}

/// Set target coordinates for the phase's vertices.
///
/// With `using_partial_data` (or when the view has edges but no
/// triangles, e.g. a boundary view) the remaining vertices of each
/// affected label default their target to their current position.
pub fn set_sub_range_target(
  engine: &mut MeshEngine,
  phase: &Phase,
  x: &[f64],
  y: &[f64],
  using_partial_data: bool,
) -> Result<()> {
  if phase.vertex_count() != x.len() || phase.vertex_count() != y.len() {
    return Err(EngineError::InvalidArgument(
      "vertices and target arrays must be of same size".into(),
    ));
  }

  let partial =
    using_partial_data || (phase.triangles.is_empty() && !phase.edges.is_empty());

  if partial {
    for &label in &phase.labels.clone() {
      let entire = make_phase(engine, label);

      // Default every target of the label to the current position, then
      // overlay the prescribed subset.
      let (mut tx, mut ty) = get_sub_range_current(engine, &entire);
      for (i, &v) in phase.vertices.iter().enumerate() {
        if let Some(local) = entire.local_index(v) {
          tx[local as usize] = x[i];
          ty[local as usize] = y[i];
        }
      }

      for (i, &v) in entire.vertices.iter().enumerate() {
        engine
          .attributes_mut()
          .set_target(v, label, DVec2::new(tx[i], ty[i]));
      }
    }
  } else {
    for (i, &v) in phase.vertices.iter().enumerate() {
      for label in engine.attributes().labels(v).to_vec() {
        engine
          .attributes_mut()
          .set_target(v, label, DVec2::new(x[i], y[i]));
      }
    }
  }

  Ok(())
}

/// Triangle adjacency in local indices: for each triangle, the neighbour
/// across each of its three edges, `UNDEFINED` when the neighbour is
/// outside the view or the edge is a boundary.
pub fn make_adjacency(engine: &MeshEngine, phase: &Phase) -> Vec<[u32; 3]> {
  let mesh = engine.mesh();

  let mut triangle_indices: BTreeMap<Simplex2, u32> = BTreeMap::new();
  for (i, tri) in phase.triangles.iter().enumerate() {
    let t = Simplex2::new(
      phase.vertices[tri[0] as usize],
      phase.vertices[tri[1] as usize],
      phase.vertices[tri[2] as usize],
    );
    triangle_indices.insert(t, i as u32);
  }

  let mut adjacency = Vec::with_capacity(phase.triangles.len());
  for tri in &phase.triangles {
    let corners = [
      phase.vertices[tri[0] as usize],
      phase.vertices[tri[1] as usize],
      phase.vertices[tri[2] as usize],
    ];
    let t = Simplex2::new(corners[0], corners[1], corners[2]);

    // Neighbour opposite each corner.
    let mut entry = [UNDEFINED; 3];
    for slot in 0..3 {
      let e = Simplex1::new(
        corners[(slot + 1) % 3],
        corners[(slot + 2) % 3],
      );
      entry[slot] = mesh
        .edge_cofaces(e)
        .iter()
        .copied()
        .find(|&n| n != t)
        .and_then(|n| triangle_indices.get(&n).copied())
        .unwrap_or(UNDEFINED);
    }
    adjacency.push(entry);
  }

  adjacency
}

/// Vertex-to-triangle incidence over local indices, CSR style: the
/// triangles of local vertex `i` are `v2t[offsets[i]..offsets[i + 1]]`.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
  /// (vertex, triangle) pairs grouped by vertex.
  pub v2t: Vec<(u32, u32)>,
  pub offsets: Vec<u32>,
}

pub fn compute_neighbors(triangles: &[[u32; 3]], vertex_count: usize) -> Neighbors {
  let mut pairs: Vec<(u32, u32)> = Vec::with_capacity(triangles.len() * 3);
  for (i, tri) in triangles.iter().enumerate() {
    for &v in tri {
      pairs.push((v, i as u32));
    }
  }
  pairs.sort_unstable();

  let mut offsets = vec![0u32; vertex_count + 1];
  for &(v, _) in &pairs {
    offsets[v as usize + 1] += 1;
  }
  for i in 0..vertex_count {
    offsets[i + 1] += offsets[i];
  }

  Neighbors { v2t: pairs, offsets }
}

#[cfg(test)]
#[path = "phase_test.rs"]
mod phase_test;
