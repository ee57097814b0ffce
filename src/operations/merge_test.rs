use super::*;
use crate::assignment::Assignment;
use crate::operations::MeshOperation;
use crate::params::Parameters;
use crate::quality::{MergeProximity, QualityMeasure};
use crate::simplex::Simplex0;
use crate::test_meshes::{commit_plan, finalize, phase_area, place_vertices};

/// A thin sliver of phase 2 hanging over a phase 1 triangle, with the
/// sliver's apex on the far interface.
///
/// ```text
///        u
///      /   \        phase 1 above and below,
///    v1 -vo- v2     phase 2 in the flat sliver (v1, v2, vo)
///      \   /
///        w          vo sits 0.1 over the edge (v1, v2)
/// ```
fn sliver() -> (
  Mesh,
  crate::attributes::AttributeStore,
  Vec<Simplex0>,
) {
  let mut mesh = Mesh::new();
  let mut attrs = crate::attributes::AttributeStore::new();

  // v1, v2, vo, w, u
  let v = place_vertices(
    &mut mesh,
    &mut attrs,
    &[
      (0.0, 0.0),
      (2.0, 0.0),
      (1.0, 0.1),
      (1.0, -1.0),
      (1.0, 1.0),
    ],
  );

  let sliver = mesh.insert_triangle(v[0], v[1], v[2]).expect("sliver");
  mesh.set_label(sliver, 2);
  let below = mesh.insert_triangle(v[0], v[3], v[1]).expect("below");
  mesh.set_label(below, 1);
  let upper_left = mesh.insert_triangle(v[0], v[2], v[4]).expect("upper left");
  mesh.set_label(upper_left, 1);
  let upper_right = mesh.insert_triangle(v[2], v[1], v[4]).expect("upper right");
  mesh.set_label(upper_right, 1);

  finalize(&mesh, &mut attrs, &Parameters::default());
  (mesh, attrs, v)
}

#[test]
fn proximity_measure_flags_the_sliver() {
  let (mesh, attrs, v) = sliver();

  let mut params = Parameters::default();
  params.set_distance_threshold("merge", 0.5);

  let measure = MergeProximity::new("merge", 1, &params);
  let t = Simplex2::new(v[0], v[1], v[2]);
  assert!(measure.is_bad(t.into(), &mesh, &attrs));

  // The healthy phase 1 triangle below is not a candidate: its longest
  // edge is the interface, but its apex is far.
  let below = Simplex2::new(v[0], v[3], v[1]);
  assert!(!measure.is_bad(below.into(), &mesh, &attrs));
}

#[test]
fn merge_dissolves_the_sliver_into_the_other_phase() {
  let (mut mesh, mut attrs, v) = sliver();
  let params = Parameters::default();

  let sliver_area = 0.5 * 2.0 * 0.1;
  let area_phase_1 = phase_area(&mesh, &attrs, 1);
  let area_phase_2 = phase_area(&mesh, &attrs, 2);

  let t = Simplex2::new(v[0], v[1], v[2]);
  let plan = Merge::new()
    .plan(t.into(), &mut mesh, &attrs)
    .expect("sliver merges");

  commit_plan(&mut mesh, &mut attrs, &params, &plan, &Assignment::Merge);

  // The sliver's phase lost exactly its area; the other phase gained it.
  assert!((phase_area(&mesh, &attrs, 2) - (area_phase_2 - sliver_area)).abs() < 1e-12);
  assert!((phase_area(&mesh, &attrs, 1) - (area_phase_1 + sliver_area)).abs() < 1e-12);

  // The bridge edge connects the apex to the far side.
  assert!(mesh.is_valid(Simplex1::new(v[2], v[3])));
  assert!(crate::util::is_manifold_mesh(&mesh));

  // The apex no longer touches phase 2 and its label set follows.
  assert_eq!(attrs.labels(v[2]), &[1]);
}

#[test]
fn merge_skips_when_the_longest_edge_is_not_interface() {
  let (mut mesh, attrs, v) = sliver();

  // The healthy triangle below: longest edge is the interface, so force
  // the skip with the upper-left triangle whose longest edge is a rim
  // edge.
  let upper_left = Simplex2::new(v[0], v[2], v[4]);
  assert!(Merge::new()
    .plan(upper_left.into(), &mut mesh, &attrs)
    .is_none());
}

#[test]
fn merge_skips_submesh_boundary_apexes() {
  let (mut mesh, attrs, v) = sliver();

  mesh.set_submesh_boundary(v[2], true);
  let t = Simplex2::new(v[0], v[1], v[2]);
  assert!(Merge::new().plan(t.into(), &mut mesh, &attrs).is_none());
}
