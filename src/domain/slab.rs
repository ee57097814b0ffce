//! Slab decomposition: partition the mesh into vertical slabs along the
//! x-axis, one subdomain per slab, and merge the processed slabs back.
//!
//! Vertices keep their global ids inside the submeshes; vertices on a cut
//! are duplicated into every adjacent slab and flagged as submesh
//! boundary, which bars the operations from touching them. That exclusion
//! is what makes the later merge a plain union: each global triangle lives
//! in exactly one slab, and cut-vertex attributes cannot have diverged.

use std::collections::BTreeMap;

use crate::attributes::AttributeStore;
use crate::domain::SubDomain;
use crate::error::{EngineError, Result};
use crate::mesh::Mesh;
use crate::params::Parameters;
use crate::simplex::{Simplex0, Simplex2};

/// Decide the slab of each vertex: vertex-count quantiles of the
/// x-coordinate, which balances work across subdomains.
///
/// On odd scheduler iterations the quantile boundaries are shifted by half
/// a slab (`stagger`), so vertices frozen on a cut in one iteration fall
/// inside a slab in the next and their deferred work completes.
fn vertex_slabs(
  mesh: &Mesh,
  attributes: &AttributeStore,
  slabs: usize,
  stagger: usize,
) -> BTreeMap<Simplex0, usize> {
  let mut order: Vec<(f64, Simplex0)> = mesh
    .vertices_iter()
    .map(|v| (attributes.current(v).x, v))
    .collect();
  order.sort_by(|a, b| a.partial_cmp(b).expect("coordinates are finite"));

  let count = order.len().max(1);
  let offset = if stagger % 2 == 1 { count / (2 * slabs) } else { 0 };
  order
    .into_iter()
    .enumerate()
    .map(|(rank, (_, v))| (v, ((rank + offset) * slabs / count).min(slabs - 1)))
    .collect()
}

/// Median slab of the three corners.
fn triangle_slab(t: Simplex2, slab_of: &BTreeMap<Simplex0, usize>) -> usize {
  let mut slabs: Vec<usize> = t.vertices().iter().map(|v| slab_of[v]).collect();
  slabs.sort_unstable();
  slabs[1]
}

/// Partition the mesh into `number_of_subdomains` slab subdomains, each
/// with its own submesh and attribute store.
pub fn create_subdomains(
  parameters: &Parameters,
  mesh: &Mesh,
  attributes: &AttributeStore,
  stagger: usize,
) -> Result<Vec<SubDomain>> {
  let slabs = parameters.number_of_subdomains();

  if mesh.triangle_count() == 0 {
    return Err(EngineError::InvalidArgument(
      "cannot decompose an empty mesh".into(),
    ));
  }

  if slabs == 1 {
    return Ok(vec![SubDomain::new(
      0,
      mesh.clone(),
      attributes.clone(),
      parameters.clone(),
    )]);
  }

  let slab_of = vertex_slabs(mesh, attributes, slabs, stagger);

  let mut assignments: BTreeMap<Simplex2, usize> = BTreeMap::new();
  for t in mesh.triangles_iter() {
    assignments.insert(t, triangle_slab(t, &slab_of));
  }

  // A vertex is on a cut when its incident triangles are not all assigned
  // to one slab.
  let mut cut: BTreeMap<Simplex0, bool> = BTreeMap::new();
  for v in mesh.vertices_iter() {
    let mut incident = mesh.vertex_triangles(v).map(|t| assignments[&t]);
    let first = incident.next();
    let on_cut = match first {
      Some(slab) => incident.any(|other| other != slab),
      None => false,
    };
    cut.insert(v, on_cut);
  }

  let mark = mesh.vertex_mark();
  let mut domains = Vec::with_capacity(slabs);

  for slab in 0..slabs {
    let mut submesh = Mesh::new();
    let mut subattributes = AttributeStore::new();
    subattributes.copy_names_from(attributes);

    for (&t, &assigned) in &assignments {
      if assigned != slab {
        continue;
      }
      for v in t.vertices() {
        if !submesh.is_valid(v) {
          submesh.adopt_vertex(v);
          subattributes.copy_vertex_from(attributes, v, v);
        }
      }
      submesh
        .insert_triangle_exact(mesh.corners(t), mesh.label(t))
        .map_err(|e| {
          EngineError::TopologyViolation(format!("slab {slab} copy failed: {e}"))
        })?;
      subattributes.copy_triangle_from(attributes, t, t);
      for e in t.edges() {
        subattributes.copy_edge_from(attributes, e, e);
      }
    }

    let flagged: Vec<Simplex0> = submesh
      .vertices_iter()
      .filter(|v| cut.get(v).copied().unwrap_or(false))
      .collect();
    for v in flagged {
      submesh.set_submesh_boundary(v, true);
    }

    // Fresh ids allocated inside any slab start past the global
    // allocator, so the merge can tell them apart and remap.
    submesh.set_vertex_floor(mark);

    domains.push(SubDomain::new(
      slab,
      submesh,
      subattributes,
      parameters.clone(),
    ));
  }

  Ok(domains)
}

/// Merge processed subdomains back into the global mesh and attributes.
///
/// Vertices created inside a slab (id at or past the decomposition mark)
/// are remapped onto fresh global ids in subdomain order, so parallel
/// allocations cannot collide. For cut vertices the global store stays
/// authoritative: the operations were barred from changing them.
pub fn merge_subdomains(
  mut domains: Vec<SubDomain>,
  parameters: &Parameters,
  mesh: &mut Mesh,
  attributes: &mut AttributeStore,
) -> Result<usize> {
  let mark = mesh.vertex_mark();
  let operations_done: usize = domains.iter().map(|d| d.operations_done).sum();

  let mut merged = Mesh::new();
  merged.set_vertex_floor(mark);
  let mut merged_attributes = AttributeStore::new();
  merged_attributes.copy_names_from(attributes);

  domains.sort_by_key(|d| d.id);

  for domain in &domains {
    let mut remap: BTreeMap<Simplex0, Simplex0> = BTreeMap::new();

    for v in domain.mesh.vertices_iter() {
      let global = if v.index() >= mark {
        let fresh = merged.insert_vertex();
        remap.insert(v, fresh);
        fresh
      } else {
        merged.adopt_vertex(v);
        v
      };

      let authoritative = domain.mesh.submesh_boundary(v) && attributes.is_registered(v);
      if authoritative {
        merged_attributes.copy_vertex_from(attributes, v, global);
      } else {
        merged_attributes.copy_vertex_from(&domain.attributes, v, global);
      }
    }

    let rename = |v: Simplex0| remap.get(&v).copied().unwrap_or(v);

    for t in domain.mesh.triangles_iter() {
      let corners = domain.mesh.corners(t).map(rename);
      let global_t = merged
        .insert_triangle_exact(corners, domain.mesh.label(t))
        .map_err(|e| {
          EngineError::TopologyViolation(format!(
            "merging subdomain {} failed: {e}",
            domain.id
          ))
        })?;
      merged_attributes.copy_triangle_from(&domain.attributes, t, global_t);
      for edge in t.edges() {
        let (a, b) = edge.endpoints();
        let global_edge = crate::simplex::Simplex1::new(rename(a), rename(b));
        merged_attributes.copy_edge_from(&domain.attributes, edge, global_edge);
      }
    }
  }

  if parameters.verbose() {
    tracing::debug!(
      subdomains = domains.len(),
      operations_done,
      "subdomains merged"
    );
  }

  *mesh = merged;
  *attributes = merged_attributes;

  Ok(operations_done)
}

#[cfg(test)]
#[path = "slab_test.rs"]
mod slab_test;
