use glam::DVec2;

use super::*;
use crate::test_meshes::{disk, two_phase_strip};

#[test]
fn scheduler_stops_after_a_quiet_iteration() {
  let (mesh, attrs, _v) = two_phase_strip();

  let mut params = Parameters::default();
  params.set_default_max_iterations(0);
  params.set_max_iterations("scheduler", 10);

  let mut scheduler = Scheduler::new(mesh, attrs);
  let total = scheduler.run(&params).expect("scheduler runs");

  // Nothing is enabled: the first iteration performs no operation and
  // the loop ends long before the monitor cap.
  assert_eq!(total, 0);
}

#[test]
fn scheduler_honours_the_monitor_cap() {
  let (mesh, mut attrs, centre, rim) = disk(8);

  // A standing translation: move always reports work, so only the
  // monitor ends the loop.
  for v in std::iter::once(centre).chain(rim.iter().copied()) {
    let p = attrs.current(v);
    attrs.set_target(v, 1, p + DVec2::new(0.01, 0.0));
  }

  let mut params = Parameters::default();
  params.set_default_max_iterations(0);
  params.set_max_iterations("move", 1);
  params.set_max_iterations("scheduler", 3);

  let mut scheduler = Scheduler::new(mesh, attrs);
  let total = scheduler.run(&params).expect("scheduler runs");
  assert!(total > 0);
}

/// Scenario: rigid motion must commute with decomposition. Running the
/// same prescribed translation with one and with two subdomains yields
/// identical coordinates, because a vertex frozen on a cut in one
/// iteration is moved by a later one and the move is idempotent.
#[test]
fn two_subdomain_parity_for_rigid_motion() {
  let run = |subdomains: usize| {
    let (mesh, mut attrs, centre, rim) = disk(12);
    for v in std::iter::once(centre).chain(rim.iter().copied()) {
      let p = attrs.current(v);
      attrs.set_target(v, 1, p + DVec2::new(0.01, 0.0));
    }

    let mut params = Parameters::default();
    params.set_default_max_iterations(0);
    params.set_max_iterations("move", 1);
    params.set_max_iterations("scheduler", 4);
    params.set_number_of_subdomains(subdomains);
    params.set_silent_threads(true);

    let mut scheduler = Scheduler::new(mesh, attrs);
    scheduler.run(&params).expect("scheduler runs");
    scheduler
  };

  let serial = run(1);
  let parallel = run(2);

  assert_eq!(
    serial.mesh.vertex_count(),
    parallel.mesh.vertex_count()
  );

  // No topology changed, so vertices correspond by id.
  for v in serial.mesh.vertices_iter() {
    let a = serial.attributes.current(v);
    let b = parallel.attributes.current(v);
    assert!(
      (a - b).length() < 1e-12,
      "{v} diverged: {a:?} vs {b:?}"
    );
  }

  // And the edge sets agree as unordered sets.
  let edges = |mesh: &crate::mesh::Mesh| -> Vec<(u32, u32)> {
    mesh
      .edges_iter()
      .map(|e| {
        let (a, b) = e.endpoints();
        (a.index(), b.index())
      })
      .collect()
  };
  assert_eq!(edges(&serial.mesh), edges(&parallel.mesh));
}
