use glam::DVec2;

use super::*;
use crate::operations::MeshOperation;
use crate::test_meshes::{disk, finalize, place_vertices};

#[test]
fn rigid_translation_applies_targets_exactly() {
  let (mesh, mut attrs, centre, rim) = disk(8);
  let params = Parameters::default();

  let shift = DVec2::new(0.01, 0.0);
  let originals: Vec<(crate::simplex::Simplex0, DVec2)> = std::iter::once(centre)
    .chain(rim.iter().copied())
    .map(|v| (v, attrs.current(v)))
    .collect();

  for &(v, p) in &originals {
    for label in attrs.labels(v).to_vec() {
      attrs.set_target(v, label, p + shift);
    }
  }

  let mut op = MoveVertices::new(1, &params);
  op.init(&mesh, &mut attrs);

  for &(v, _) in &originals {
    assert!(op.update_local_attributes(v.into(), &mesh, &mut attrs));
  }

  // A rigid translation never collapses a triangle, so the sub-step is
  // the whole step and every vertex lands exactly on its target.
  for &(v, p) in &originals {
    assert!((attrs.current(v) - (p + shift)).length() < 1e-12);
  }
}

#[test]
fn collapsing_motion_is_sub_stepped() {
  let mut mesh = Mesh::new();
  let mut attrs = crate::attributes::AttributeStore::new();
  let v = place_vertices(&mut mesh, &mut attrs, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
  let t = mesh.insert_triangle(v[0], v[1], v[2]).expect("triangle");
  mesh.set_label(t, 1);
  finalize(&mesh, &mut attrs, &Parameters::default());

  // The apex dives through the opposite edge; the triangle collapses at
  // half of the step.
  attrs.set_target(v[2], 1, DVec2::new(0.0, -1.0));

  let params = Parameters::default();
  let mut op = MoveVertices::new(1, &params);
  op.init(&mesh, &mut attrs);

  assert!(op.update_local_attributes(v[2].into(), &mesh, &mut attrs));

  // fraction = 0.9 * 0.5; the apex moves 90% of the admissible distance.
  let expected = DVec2::new(0.0, 1.0) + DVec2::new(0.0, -2.0) * 0.45;
  assert!((attrs.current(v[2]) - expected).length() < 1e-12);

  // The triangle survived.
  assert!(crate::util::triangle_signed_area(&mesh, &attrs, t) > 0.0);
}

#[test]
fn move_skips_flagged_and_foreign_vertices() {
  let (mut mesh, mut attrs, centre, rim) = disk(6);
  let params = Parameters::default();

  attrs.set_target(centre, 1, DVec2::new(0.1, 0.0));
  let mut op = MoveVertices::new(1, &params);
  op.init(&mesh, &mut attrs);

  mesh.set_submesh_boundary(centre, true);
  assert!(!op.update_local_attributes(centre.into(), &mesh, &mut attrs));
  assert_eq!(attrs.current(centre), DVec2::ZERO);

  // A vertex outside the operation's phase is left alone.
  let foreign = MoveVertices::new(7, &params);
  assert!(!foreign.update_local_attributes(rim[0].into(), &mesh, &mut attrs));
}

#[test]
fn interface_only_mode_skips_interior_vertices() {
  let (mesh, mut attrs, centre, _rim) = disk(6);

  let mut params = Parameters::default();
  params.set_use_only_interface(true);

  attrs.set_target(centre, 1, DVec2::new(0.1, 0.0));
  let mut op = MoveVertices::new(1, &params);
  op.init(&mesh, &mut attrs);

  // A single-phase disk has no interface at all.
  assert!(!op.update_local_attributes(centre.into(), &mesh, &mut attrs));
}
