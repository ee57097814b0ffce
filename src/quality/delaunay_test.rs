use super::*;
use crate::attributes::AttributeStore;
use crate::mesh::Mesh;
use crate::quality::QualityMeasure;
use crate::simplex::Simplex1;
use crate::test_meshes::{finalize, place_vertices, unit_square};

/// Two triangles over edge (a, b) with the far corners at the given
/// heights.
fn quad(c: (f64, f64), d: (f64, f64)) -> (Mesh, AttributeStore, Vec<crate::simplex::Simplex0>) {
  let mut mesh = Mesh::new();
  let mut attrs = AttributeStore::new();

  let v = place_vertices(&mut mesh, &mut attrs, &[(0.0, 0.0), (2.0, 0.0), c, d]);
  let t1 = mesh.insert_triangle(v[0], v[1], v[2]).expect("upper");
  mesh.set_label(t1, 1);
  let t2 = mesh.insert_triangle(v[0], v[3], v[1]).expect("lower");
  mesh.set_label(t2, 1);

  finalize(&mesh, &mut attrs, &crate::params::Parameters::default());
  (mesh, attrs, v)
}

#[test]
fn close_opposite_vertex_flags_the_edge() {
  // d = (1, -0.5) lies inside the circumcircle of (a, b, c).
  let (mesh, attrs, v) = quad((1.0, 1.0), (1.0, -0.5));
  let e = Simplex1::new(v[0], v[1]);

  assert!(Delaunay::new().is_bad(e.into(), &mesh, &attrs));
}

#[test]
fn distant_opposite_vertex_passes() {
  // d = (1, -2) lies outside the circumcircle of (a, b, c).
  let (mesh, attrs, v) = quad((1.0, 1.0), (1.0, -2.0));
  let e = Simplex1::new(v[0], v[1]);

  assert!(!Delaunay::new().is_bad(e.into(), &mesh, &attrs));
}

#[test]
fn boundary_edges_are_never_bad() {
  let (mesh, attrs, v) = quad((1.0, 1.0), (1.0, -0.5));
  let rim = Simplex1::new(v[0], v[2]);

  assert!(!Delaunay::new().is_bad(rim.into(), &mesh, &attrs));
}

#[test]
fn square_diagonal_is_cocircular_and_passes() {
  let (mesh, attrs, v) = unit_square();
  let diagonal = Simplex1::new(v[0], v[2]);

  assert!(!Delaunay::new().is_bad(diagonal.into(), &mesh, &attrs));
}
