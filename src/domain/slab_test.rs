use super::*;
use crate::test_meshes::{two_phase_grid, two_phase_strip};

#[test]
fn single_subdomain_is_a_full_clone() {
  let (mesh, attrs, _v) = two_phase_strip();
  let params = Parameters::default();

  let domains = create_subdomains(&params, &mesh, &attrs, 0).expect("decompose");
  assert_eq!(domains.len(), 1);
  assert_eq!(domains[0].mesh.triangle_count(), mesh.triangle_count());
  assert!(domains[0]
    .mesh
    .vertices_iter()
    .all(|v| !domains[0].mesh.submesh_boundary(v)));
}

#[test]
fn slabs_partition_triangles_and_flag_the_cut() {
  let (mesh, attrs, v) = two_phase_strip();

  let mut params = Parameters::default();
  params.set_number_of_subdomains(2);

  let domains = create_subdomains(&params, &mesh, &attrs, 0).expect("decompose");
  assert_eq!(domains.len(), 2);

  // Every global triangle lands in exactly one slab.
  let total: usize = domains.iter().map(|d| d.mesh.triangle_count()).sum();
  assert_eq!(total, mesh.triangle_count());

  // The shared column of vertices is flagged in every slab that carries
  // it; slab-interior vertices are not.
  for domain in &domains {
    for w in [v[1], v[4]] {
      if domain.mesh.is_valid(w) {
        assert!(domain.mesh.submesh_boundary(w));
      }
    }
    for w in [v[0], v[2]] {
      if domain.mesh.is_valid(w) {
        assert!(!domain.mesh.submesh_boundary(w));
      }
    }
  }
}

#[test]
fn decompose_then_merge_is_the_identity() {
  let (mesh, attrs, _grid) = two_phase_grid();

  let mut params = Parameters::default();
  params.set_number_of_subdomains(3);

  let snapshot = mesh.all_simplices();
  let labels: Vec<u32> = mesh.triangles_iter().map(|t| mesh.label(t)).collect();

  let mut merged_mesh = mesh.clone();
  let mut merged_attrs = attrs.clone();

  let domains = create_subdomains(&params, &merged_mesh, &merged_attrs, 0).expect("decompose");
  merge_subdomains(domains, &params, &mut merged_mesh, &mut merged_attrs)
    .expect("merge");

  assert_eq!(merged_mesh.all_simplices(), snapshot);
  let merged_labels: Vec<u32> = merged_mesh
    .triangles_iter()
    .map(|t| merged_mesh.label(t))
    .collect();
  assert_eq!(merged_labels, labels);

  for v in mesh.vertices_iter() {
    assert_eq!(merged_attrs.current(v), attrs.current(v));
    assert_eq!(merged_attrs.labels(v), attrs.labels(v));
    assert!(!merged_mesh.submesh_boundary(v));
  }
}

#[test]
fn merge_remaps_vertices_created_inside_a_slab() {
  let (mesh, attrs, _v) = two_phase_strip();

  let mut params = Parameters::default();
  params.set_number_of_subdomains(2);

  let mut global_mesh = mesh.clone();
  let mut global_attrs = attrs.clone();

  let mut domains =
    create_subdomains(&params, &global_mesh, &global_attrs, 0).expect("decompose");

  // Simulate each worker allocating a vertex: both see the same local id.
  use crate::operations::MeshOperation;
  let mut fresh_ids = Vec::new();
  for domain in &mut domains {
    let slab_params = domain.parameters.clone();

    // Split an edge of the slab's first triangle so the fresh vertex is
    // part of a triangle and survives the merge.
    let t = domain.mesh.triangles_iter().next().expect("slab has a triangle");
    let [a, b, _] = domain.mesh.corners(t);
    let edge = crate::simplex::Simplex1::new(a, b);

    let op = crate::operations::EdgeSplit::new(&slab_params);
    let plan = op
      .plan(edge.into(), &mut domain.mesh, &domain.attributes)
      .expect("edge splits");
    let fresh = plan.new_simplices.vertices().next().expect("midpoint");
    fresh_ids.push(fresh.index());

    crate::test_meshes::commit_plan(
      &mut domain.mesh,
      &mut domain.attributes,
      &slab_params,
      &plan,
      &crate::assignment::Assignment::EdgeSplit,
    );
  }
  assert_eq!(fresh_ids[0], fresh_ids[1]);

  merge_subdomains(domains, &params, &mut global_mesh, &mut global_attrs)
    .expect("merge");

  // Both fresh vertices survived under distinct global ids.
  assert_eq!(global_mesh.vertex_count(), mesh.vertex_count() + 2);
  assert_eq!(global_mesh.triangle_count(), mesh.triangle_count() + 2);

  for v in global_mesh.vertices_iter() {
    assert!(global_attrs.try_current(v).is_some());
  }
}

#[test]
fn staggered_cuts_move_between_iterations() {
  let (mesh, attrs, _grid) = two_phase_grid();

  let mut params = Parameters::default();
  params.set_number_of_subdomains(2);

  let flagged = |domains: &[SubDomain]| -> Vec<u32> {
    let mut out = Vec::new();
    for d in domains {
      for v in d.mesh.vertices_iter() {
        if d.mesh.submesh_boundary(v) && !out.contains(&v.index()) {
          out.push(v.index());
        }
      }
    }
    out.sort_unstable();
    out
  };

  let even = create_subdomains(&params, &mesh, &attrs, 0).expect("decompose");
  let odd = create_subdomains(&params, &mesh, &attrs, 1).expect("decompose");

  assert_ne!(flagged(&even), flagged(&odd));
}
