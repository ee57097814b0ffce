use glam::DVec2;

use super::*;
use crate::assignment::Assignment;
use crate::operations::MeshOperation;
use crate::test_meshes::{commit_plan, two_phase_strip, unit_square};

#[test]
fn interior_split_produces_four_triangles() {
  let (mut mesh, mut attrs, v) = unit_square();
  let params = Parameters::default();

  let e = Simplex1::new(v[0], v[2]);
  let plan = EdgeSplit::new(&params)
    .plan(e.into(), &mut mesh, &attrs)
    .expect("interior edge splits");

  assert_eq!(plan.old_simplices.size(1), 1);
  assert_eq!(plan.old_simplices.size(2), 2);
  assert_eq!(plan.new_simplices.size(0), 1);
  assert_eq!(plan.new_simplices.size(1), 4);
  assert_eq!(plan.new_simplices.size(2), 4);

  commit_plan(&mut mesh, &mut attrs, &params, &plan, &Assignment::EdgeSplit);

  assert_eq!(mesh.triangle_count(), 4);
  assert!(!mesh.is_valid(e));

  let m = plan.new_simplices.vertices().next().expect("midpoint vertex");
  assert!((attrs.current(m) - DVec2::new(0.5, 0.5)).length() < 1e-12);
  assert_eq!(attrs.labels(m), &[1]);

  for t in mesh.triangles_iter() {
    assert_eq!(mesh.label(t), 1);
    assert_eq!(mesh.orientation(t, &attrs), 1);
  }
}

#[test]
fn boundary_split_extends_the_boundary_cycle() {
  let (mut mesh, mut attrs, v) = unit_square();
  let params = Parameters::default();

  let boundary_edges = |mesh: &crate::mesh::Mesh| {
    mesh
      .edges_iter()
      .filter(|&e| mesh.is_boundary(e))
      .count()
  };
  assert_eq!(boundary_edges(&mesh), 4);

  let e = Simplex1::new(v[0], v[1]);
  let plan = EdgeSplit::new(&params)
    .plan(e.into(), &mut mesh, &attrs)
    .expect("boundary edge splits");
  assert_eq!(plan.old_simplices.size(2), 1);
  assert_eq!(plan.new_simplices.size(2), 2);

  commit_plan(&mut mesh, &mut attrs, &params, &plan, &Assignment::EdgeSplit);

  // One boundary edge became two half edges.
  assert_eq!(boundary_edges(&mesh), 5);
  assert_eq!(mesh.triangle_count(), 3);
}

#[test]
fn submesh_boundary_edges_are_skipped() {
  let (mut mesh, attrs, v) = unit_square();
  let params = Parameters::default();

  mesh.set_submesh_boundary(v[0], true);
  mesh.set_submesh_boundary(v[2], true);

  let e = Simplex1::new(v[0], v[2]);
  assert!(EdgeSplit::new(&params)
    .plan(e.into(), &mut mesh, &attrs)
    .is_none());
}

#[test]
fn sparse_mode_leaves_spokes_unparented() {
  let (mut mesh, attrs, v) = unit_square();

  let mut params = Parameters::default();
  params.set_use_sparse_edge_attributes(true);

  let e = Simplex1::new(v[0], v[2]);
  let plan = EdgeSplit::new(&params)
    .plan(e.into(), &mut mesh, &attrs)
    .expect("plan");

  // Only the two half edges inherit; the spokes to the opposite corners
  // do not.
  assert_eq!(plan.edge_parents.len(), 2);
  let m = plan.new_simplices.vertices().next().expect("midpoint");
  assert!(plan.edge_parents.contains_key(&Simplex1::new(m, v[0])));
  assert!(plan.edge_parents.contains_key(&Simplex1::new(m, v[2])));
}

#[test]
fn split_midpoint_interpolates_per_label_values() {
  let (mut mesh, mut attrs, v) = two_phase_strip();
  let params = Parameters::default();

  attrs.create("temperature", 0).unwrap();
  attrs.set_vertex_value("temperature", v[1], 1, 10.0).unwrap();
  attrs.set_vertex_value("temperature", v[1], 2, 20.0).unwrap();
  attrs.set_vertex_value("temperature", v[4], 1, 30.0).unwrap();
  attrs.set_vertex_value("temperature", v[4], 2, 40.0).unwrap();

  let e = Simplex1::new(v[1], v[4]);
  let plan = EdgeSplit::new(&params)
    .plan(e.into(), &mut mesh, &attrs)
    .expect("interface edge splits");
  commit_plan(&mut mesh, &mut attrs, &params, &plan, &Assignment::EdgeSplit);

  let m = plan.new_simplices.vertices().next().expect("midpoint");
  assert_eq!(attrs.labels(m), &[1, 2]);
  assert_eq!(attrs.vertex_value("temperature", m, 1).unwrap(), 20.0);
  assert_eq!(attrs.vertex_value("temperature", m, 2).unwrap(), 30.0);
}
