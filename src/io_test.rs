use super::*;
use crate::params::Parameters;
use crate::simplex::Simplex0;

fn scratch_path(name: &str) -> std::path::PathBuf {
  let mut path = std::env::temp_dir();
  path.push(format!("phase_mesh_{}_{}", std::process::id(), name));
  path
}

const TWO_PHASE_SQUARE: &str = "\
v 0.0 0.0
v 1.0 0.0
v 1.0 1.0
v 0.0 1.0
t 1 2 3
t 1 3 4
l 1 2 3 1
l 1 3 4 2
# trailing text is never read
v 9.0 9.0
";

#[test]
fn load_reads_vertices_triangles_and_labels() {
  let path = scratch_path("load.txt");
  std::fs::write(&path, TWO_PHASE_SQUARE).unwrap();

  let (mesh, attrs) = load_mesh(&path, &Parameters::default()).expect("loads");
  std::fs::remove_file(&path).ok();

  // The sentinel stopped the parse before the fifth vertex.
  assert_eq!(mesh.vertex_count(), 4);
  assert_eq!(mesh.triangle_count(), 2);

  let t1 = Simplex2::new(Simplex0::new(0), Simplex0::new(1), Simplex0::new(2));
  let t2 = Simplex2::new(Simplex0::new(0), Simplex0::new(2), Simplex0::new(3));
  assert_eq!(mesh.label(t1), 1);
  assert_eq!(mesh.label(t2), 2);

  assert_eq!(attrs.current(Simplex0::new(2)), glam::DVec2::new(1.0, 1.0));
}

#[test]
fn load_applies_the_relabelling_map() {
  let path = scratch_path("relabel.txt");
  std::fs::write(&path, TWO_PHASE_SQUARE).unwrap();

  let mut params = Parameters::default();
  params.set_relabelling(vec![1, 2], vec![10, 20]);

  let (mesh, _attrs) = load_mesh(&path, &params).expect("loads");
  std::fs::remove_file(&path).ok();

  let labels = crate::util::compute_phase_labels(&mesh);
  assert_eq!(labels, vec![10, 20]);
}

#[test]
fn unknown_prefixes_are_ignored() {
  let path = scratch_path("unknown.txt");
  std::fs::write(
    &path,
    "v 0 0\nv 1 0\nv 0 1\nq what is this\nt 1 2 3\n",
  )
  .unwrap();

  let (mesh, _attrs) = load_mesh(&path, &Parameters::default()).expect("loads");
  std::fs::remove_file(&path).ok();
  assert_eq!(mesh.triangle_count(), 1);
}

#[test]
fn missing_file_is_an_io_failure() {
  let result = load_mesh("/nonexistent/mesh.txt", &Parameters::default());
  assert!(matches!(result, Err(EngineError::IoFailure(_))));
}

#[test]
fn malformed_lines_are_io_failures() {
  let path = scratch_path("bad.txt");
  std::fs::write(&path, "v 0.0\n").unwrap();
  let result = load_mesh(&path, &Parameters::default());
  std::fs::remove_file(&path).ok();
  assert!(matches!(result, Err(EngineError::IoFailure(_))));

  let path = scratch_path("oob.txt");
  std::fs::write(&path, "v 0 0\nv 1 0\nt 1 2 9\n").unwrap();
  let result = load_mesh(&path, &Parameters::default());
  std::fs::remove_file(&path).ok();
  assert!(matches!(result, Err(EngineError::IoFailure(_))));
}

#[test]
fn save_then_load_round_trips() {
  let path = scratch_path("roundtrip.txt");
  std::fs::write(&path, TWO_PHASE_SQUARE).unwrap();

  let params = Parameters::default();
  let (mesh, attrs) = load_mesh(&path, &params).expect("loads");

  let out = scratch_path("roundtrip_out.txt");
  save_mesh(&out, &mesh, &attrs).expect("saves");
  let (again, again_attrs) = load_mesh(&out, &params).expect("reloads");

  std::fs::remove_file(&path).ok();
  std::fs::remove_file(&out).ok();

  assert_eq!(again.all_simplices(), mesh.all_simplices());
  for t in mesh.triangles_iter() {
    assert_eq!(again.label(t), mesh.label(t));
  }
  for v in mesh.vertices_iter() {
    assert_eq!(again_attrs.current(v), attrs.current(v));
  }
}

#[test]
fn save_emits_deterministic_output() {
  let path = scratch_path("determinism.txt");
  std::fs::write(&path, TWO_PHASE_SQUARE).unwrap();

  let params = Parameters::default();
  let (mesh, attrs) = load_mesh(&path, &params).expect("loads");
  std::fs::remove_file(&path).ok();

  let out1 = scratch_path("det1.txt");
  let out2 = scratch_path("det2.txt");
  save_mesh(&out1, &mesh, &attrs).expect("saves");
  save_mesh(&out2, &mesh, &attrs).expect("saves");

  let a = std::fs::read_to_string(&out1).unwrap();
  let b = std::fs::read_to_string(&out2).unwrap();
  std::fs::remove_file(&out1).ok();
  std::fs::remove_file(&out2).ok();

  assert_eq!(a, b);
}
