use glam::DVec2;

use super::*;
use crate::operations::MeshOperation;
use crate::test_meshes::{disk, two_phase_grid};

#[test]
fn laplacian_centres_an_interior_vertex() {
  let (mesh, mut attrs, centre, _rim) = disk(6);

  attrs.set_current(centre, DVec2::new(0.2, 0.1));

  let op = LaplacianSmoothing::new();
  assert!(op.update_local_attributes(centre.into(), &mesh, &mut attrs));

  // The rim of a regular hexagon averages to the origin.
  assert!(attrs.current(centre).length() < 1e-12);
}

#[test]
fn laplacian_skips_boundary_and_interface_vertices() {
  let (mesh, mut attrs, _centre, rim) = disk(6);
  let op = LaplacianSmoothing::new();

  assert!(!op.update_local_attributes(rim[0].into(), &mesh, &mut attrs));

  let (grid_mesh, mut grid_attrs, grid) = two_phase_grid();
  // The centre vertex lies on the interface; Laplacian smoothing leaves
  // it to the interface variant.
  assert!(!op.update_local_attributes(grid[1][1].into(), &grid_mesh, &mut grid_attrs));
}

#[test]
fn interface_smoothing_straightens_the_interface() {
  let (mesh, mut attrs, grid) = two_phase_grid();
  let params = Parameters::default();

  // Bow the interface outwards, then smooth it back between its
  // neighbours.
  let centre = grid[1][1];
  attrs.set_current(centre, DVec2::new(1.2, 1.0));

  let op = InterfaceSmoothing::new("interface_smoothing", 1, &params);
  assert!(op.update_local_attributes(centre.into(), &mesh, &mut attrs));
  assert!((attrs.current(centre) - DVec2::new(1.0, 1.0)).length() < 1e-12);
}

#[test]
fn interface_smoothing_respects_the_area_budget() {
  let (mesh, mut attrs, grid) = two_phase_grid();

  let mut params = Parameters::default();
  params.set_area_threshold("interface_smoothing", 1e-6);

  let centre = grid[1][1];
  attrs.set_current(centre, DVec2::new(1.2, 1.0));

  // Moving back to the chord would displace far more area than the
  // budget allows.
  let op = InterfaceSmoothing::new("interface_smoothing", 1, &params);
  assert!(!op.update_local_attributes(centre.into(), &mesh, &mut attrs));
  assert_eq!(attrs.current(centre), DVec2::new(1.2, 1.0));
}

#[test]
fn smoothing_never_inverts_triangles() {
  let (mesh, mut attrs, centre, _rim) = disk(6);

  // Park the vertex far outside; the average pulls it back inside, which
  // is fine, but dragging it out again by hand and smoothing must never
  // produce a flipped triangle.
  attrs.set_current(centre, DVec2::new(0.9, 0.0));
  let op = LaplacianSmoothing::new();
  op.update_local_attributes(centre.into(), &mesh, &mut attrs);

  for t in mesh.triangles_iter() {
    assert!(crate::util::triangle_signed_area(&mesh, &attrs, t) > 0.0);
  }
}
