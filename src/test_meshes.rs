//! Shared mesh builders for unit tests.

use glam::DVec2;

use crate::attributes::AttributeStore;
use crate::engine::initialize_attributes;
use crate::mesh::Mesh;
use crate::params::Parameters;
use crate::simplex::{Simplex0, Simplex2};

/// Insert vertices at the given coordinates.
pub fn place_vertices(
  mesh: &mut Mesh,
  attributes: &mut AttributeStore,
  coordinates: &[(f64, f64)],
) -> Vec<Simplex0> {
  coordinates
    .iter()
    .map(|&(x, y)| {
      let v = mesh.insert_vertex();
      attributes.set_current(v, DVec2::new(x, y));
      v
    })
    .collect()
}

/// Insert a labelled triangle over existing vertices.
pub fn add_triangle(
  mesh: &mut Mesh,
  vertices: &[Simplex0],
  (i, j, k): (usize, usize, usize),
  label: u32,
) -> Simplex2 {
  let t = mesh
    .insert_triangle(vertices[i], vertices[j], vertices[k])
    .expect("test triangle inserts");
  mesh.set_label(t, label);
  t
}

/// Register everything and derive label sets / targets, as the engine
/// does after loading.
pub fn finalize(mesh: &Mesh, attributes: &mut AttributeStore, parameters: &Parameters) {
  initialize_attributes(mesh, attributes, parameters);
}

/// Unit square of two CCW triangles, single phase 1.
///
/// ```text
/// 3 ---- 2
/// |  t1 /|
/// |   /  |
/// | / t0 |
/// 0 ---- 1
/// ```
pub fn unit_square() -> (Mesh, AttributeStore, Vec<Simplex0>) {
  let mut mesh = Mesh::new();
  let mut attributes = AttributeStore::new();

  let v = place_vertices(
    &mut mesh,
    &mut attributes,
    &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
  );
  add_triangle(&mut mesh, &v, (0, 1, 2), 1);
  add_triangle(&mut mesh, &v, (0, 2, 3), 1);

  finalize(&mesh, &mut attributes, &Parameters::default());
  (mesh, attributes, v)
}

/// Two unit squares side by side, phases 1 (left) and 2 (right); the
/// edge between vertices 1 and 2 is the interface.
///
/// ```text
/// 5 ---- 4 ---- 3
/// | 1  / | 2  / |
/// |  /   |  /   |
/// | /    | /    |
/// 0 ---- 1 ---- 2
/// ```
pub fn two_phase_strip() -> (Mesh, AttributeStore, Vec<Simplex0>) {
  let mut mesh = Mesh::new();
  let mut attributes = AttributeStore::new();

  let v = place_vertices(
    &mut mesh,
    &mut attributes,
    &[
      (0.0, 0.0),
      (1.0, 0.0),
      (2.0, 0.0),
      (2.0, 1.0),
      (1.0, 1.0),
      (0.0, 1.0),
    ],
  );
  add_triangle(&mut mesh, &v, (0, 1, 4), 1);
  add_triangle(&mut mesh, &v, (0, 4, 5), 1);
  add_triangle(&mut mesh, &v, (1, 2, 3), 2);
  add_triangle(&mut mesh, &v, (1, 3, 4), 2);

  finalize(&mesh, &mut attributes, &Parameters::default());
  (mesh, attributes, v)
}

/// Fan of `n` CCW triangles around a centre vertex (a disk), phase 1.
/// Returns (mesh, attributes, centre, rim vertices).
pub fn disk(n: usize) -> (Mesh, AttributeStore, Simplex0, Vec<Simplex0>) {
  assert!(n >= 3);

  let mut mesh = Mesh::new();
  let mut attributes = AttributeStore::new();

  let centre = mesh.insert_vertex();
  attributes.set_current(centre, DVec2::ZERO);

  let rim: Vec<Simplex0> = (0..n)
    .map(|i| {
      let angle = i as f64 / n as f64 * std::f64::consts::TAU;
      let v = mesh.insert_vertex();
      attributes.set_current(v, DVec2::new(angle.cos(), angle.sin()));
      v
    })
    .collect();

  for i in 0..n {
    let t = mesh
      .insert_triangle(centre, rim[i], rim[(i + 1) % n])
      .expect("disk triangle inserts");
    mesh.set_label(t, 1);
  }

  finalize(&mesh, &mut attributes, &Parameters::default());
  (mesh, attributes, centre, rim)
}

/// 2x2 grid of unit squares, nine vertices, eight triangles. The left
/// column is phase 1, the right column phase 2; the interface runs
/// vertically through the middle column of vertices. Returns the vertex
/// grid as `grid[ix][iy]` for `ix, iy` in `0..3`.
pub fn two_phase_grid() -> (Mesh, AttributeStore, Vec<Vec<Simplex0>>) {
  let mut mesh = Mesh::new();
  let mut attributes = AttributeStore::new();

  let grid: Vec<Vec<Simplex0>> = (0..3)
    .map(|ix| {
      (0..3)
        .map(|iy| {
          let v = mesh.insert_vertex();
          attributes.set_current(v, DVec2::new(ix as f64, iy as f64));
          v
        })
        .collect()
    })
    .collect();

  for ix in 0..2 {
    let label = (ix + 1) as u32;
    for iy in 0..2 {
      let a = grid[ix][iy];
      let b = grid[ix + 1][iy];
      let c = grid[ix + 1][iy + 1];
      let d = grid[ix][iy + 1];

      let t1 = mesh.insert_triangle(a, b, c).expect("grid triangle");
      mesh.set_label(t1, label);
      let t2 = mesh.insert_triangle(a, c, d).expect("grid triangle");
      mesh.set_label(t2, label);
    }
  }

  finalize(&mesh, &mut attributes, &Parameters::default());
  (mesh, attributes, grid)
}

/// A large triangle with an interior vertex close to one corner, giving
/// three triangles two of which are thin. Returns
/// (mesh, attributes, [corner_a, corner_b, corner_c], interior).
pub fn thin_ear() -> (Mesh, AttributeStore, Vec<Simplex0>, Simplex0) {
  let mut mesh = Mesh::new();
  let mut attributes = AttributeStore::new();

  let corners = place_vertices(
    &mut mesh,
    &mut attributes,
    &[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)],
  );
  let interior = mesh.insert_vertex();
  attributes.set_current(interior, DVec2::new(0.1, 0.1));

  for (i, j) in [(0, 1), (1, 2), (2, 0)] {
    let t = mesh
      .insert_triangle(corners[i], corners[j], interior)
      .expect("ear triangle");
    mesh.set_label(t, 1);
  }

  finalize(&mesh, &mut attributes, &Parameters::default());
  (mesh, attributes, corners, interior)
}

/// Commit a plan the way the batch runner does: register attributes,
/// assign, replace, drop old values, reconcile label sets.
pub fn commit_plan(
  mesh: &mut Mesh,
  attributes: &mut AttributeStore,
  parameters: &Parameters,
  plan: &crate::operations::Plan,
  assignment: &crate::assignment::Assignment,
) {
  attributes.insert_set(&plan.new_simplices);
  assignment
    .apply(plan, mesh, parameters, attributes)
    .expect("assignment applies");
  mesh
    .replace(
      &plan.old_simplices,
      &plan.new_simplices,
      &plan.triangle_parents,
      &plan.label_overrides,
      attributes,
      parameters,
    )
    .expect("replace commits");
  attributes.remove_set(&plan.old_simplices);
  crate::runner::reconcile_vertex_labels(mesh, attributes, plan, parameters);
}

/// Sum of the embedded areas of all triangles with the given label.
pub fn phase_area(mesh: &Mesh, attributes: &AttributeStore, label: u32) -> f64 {
  mesh
    .triangles_iter()
    .filter(|&t| mesh.label(t) == label)
    .map(|t| crate::util::triangle_signed_area(mesh, attributes, t))
    .sum()
}
