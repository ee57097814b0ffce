//! Mesh-level helpers shared by operations, quality measures and glue.

use glam::DVec2;

use crate::attributes::AttributeStore;
use crate::logic::Expr;
use crate::math::{edge_length, signed_triangle_area};
use crate::mesh::Mesh;
use crate::simplex::{Simplex0, Simplex1, Simplex2};
use crate::simplex_set::SimplexSet;

/// All simplices of one phase: the triangles carrying `label` plus their
/// closure.
pub fn compute_phase(mesh: &Mesh, label: u32) -> SimplexSet {
  let mut triangles = SimplexSet::new();
  for t in mesh.triangles_iter() {
    if mesh.label(t) == label {
      triangles.insert(t);
    }
  }
  mesh.closure_set(&triangles)
}

/// Interface edges of `simplices`, with their vertices.
pub fn compute_interface(mesh: &Mesh, simplices: &SimplexSet) -> SimplexSet {
  let mut interface = SimplexSet::new();
  for e in simplices.edges() {
    if mesh.is_interface(e) {
      interface.insert(e);
      let (a, b) = e.endpoints();
      interface.insert(a);
      interface.insert(b);
    }
  }
  interface
}

/// Every phase label present in the mesh, ascending.
pub fn compute_phase_labels(mesh: &Mesh) -> Vec<u32> {
  let mut labels: Vec<u32> = Vec::new();
  for t in mesh.triangles_iter() {
    let label = mesh.label(t);
    if let Err(slot) = labels.binary_search(&label) {
      labels.insert(slot, label);
    }
  }
  labels
}

/// Longest edge among the edges of a set.
pub fn longest_edge_in_set(simplices: &SimplexSet, attributes: &AttributeStore) -> Option<Simplex1> {
  let mut best: Option<(f64, Simplex1)> = None;
  for e in simplices.edges() {
    let (a, b) = e.endpoints();
    let length = edge_length(attributes.current(a), attributes.current(b));
    if best.map_or(true, |(l, _)| length > l) {
      best = Some((length, e));
    }
  }
  best.map(|(_, e)| e)
}

/// Longest edge of a triangle.
pub fn longest_edge(mesh: &Mesh, attributes: &AttributeStore, t: Simplex2) -> Simplex1 {
  longest_edge_in_set(&mesh.full_boundary(t), attributes)
    .expect("a triangle has three edges")
}

pub fn midpoint(attributes: &AttributeStore, a: Simplex0, b: Simplex0) -> DVec2 {
  (attributes.current(a) + attributes.current(b)) * 0.5
}

/// Unit normal of an interface edge, pointing out of the phase `label`.
/// Returns `None` when the edge is not an interface edge of that phase.
pub fn interface_normal(
  mesh: &Mesh,
  attributes: &AttributeStore,
  e: Simplex1,
  label: u32,
) -> Option<DVec2> {
  if !mesh.is_interface(e) {
    return None;
  }
  let (v1, v2) = e.endpoints();
  let p1 = attributes.current(v1);
  let p2 = attributes.current(v2);

  let direction = (p2 - p1).try_normalize()?;
  let normal = DVec2::new(-direction.y, direction.x);

  // The coface inside the phase decides which side is "out".
  let inside = mesh
    .edge_cofaces(e)
    .iter()
    .copied()
    .find(|&t| mesh.label(t) == label)?;
  let vo = inside.opposite_vertex(e);
  let r = attributes.current(vo) - p1;

  if r.dot(normal) < 0.0 {
    Some(normal)
  } else {
    Some(-normal)
  }
}

/// Projection of an interface vertex onto the offset curve of the phase
/// boundary. Positive `distance` offsets outwards, negative inwards.
/// Requires the interface of the phase to be a 1-manifold through `v`
/// (exactly two interface edges in the star).
pub fn offset_position(
  mesh: &Mesh,
  attributes: &AttributeStore,
  v: Simplex0,
  label: u32,
  distance: f64,
) -> Option<DVec2> {
  let star = mesh.star(v);
  let interface_edges = star.filter(
    mesh,
    &Expr::IsDimension(1)
      .and(Expr::InPhase(label))
      .and(Expr::IsInterface),
  );
  if interface_edges.size(1) != 2 {
    return None;
  }

  let mut normals = interface_edges
    .edges()
    .map(|e| interface_normal(mesh, attributes, e, label));
  let n1 = normals.next()??;
  let n2 = normals.next()??;

  let n = (n1 + n2).try_normalize()?;
  let c = n.dot(n1);
  if c <= 0.0 {
    return None;
  }

  Some(attributes.current(v) + n * (distance / c))
}

/// Signed area of a triangle using its stored (oriented) corner sequence.
pub fn triangle_signed_area(mesh: &Mesh, attributes: &AttributeStore, t: Simplex2) -> f64 {
  let [a, b, c] = mesh.corners(t);
  signed_triangle_area(
    attributes.current(a),
    attributes.current(b),
    attributes.current(c),
  )
}

/// Signed area of a triangle when vertex `v` sits at `position` instead of
/// its current coordinates.
pub fn triangle_signed_area_moved(
  mesh: &Mesh,
  attributes: &AttributeStore,
  t: Simplex2,
  v: Simplex0,
  position: DVec2,
) -> f64 {
  let [a, b, c] = mesh.corners(t);
  let place = |w: Simplex0| if w == v { position } else { attributes.current(w) };
  signed_triangle_area(place(a), place(b), place(c))
}

/// True when any triangle of the set has signed area at or below the
/// threshold.
pub fn is_any_inverted(
  mesh: &Mesh,
  attributes: &AttributeStore,
  simplices: &SimplexSet,
  threshold: f64,
) -> bool {
  simplices
    .triangles()
    .any(|t| triangle_signed_area(mesh, attributes, t) <= threshold)
}

/// True when moving `v` to `position` drives the signed area of any
/// triangle of the set to or below the threshold.
pub fn inverts_any_on_move(
  mesh: &Mesh,
  attributes: &AttributeStore,
  v: Simplex0,
  simplices: &SimplexSet,
  position: DVec2,
  threshold: f64,
) -> bool {
  simplices
    .triangles()
    .any(|t| triangle_signed_area_moved(mesh, attributes, t, v, position) <= threshold)
}

/// True when collapsing `v` onto `vo` changes the embedded area of any
/// phase among the triangles of `star(v)` by more than the threshold.
///
/// The before state sums signed areas per label over the whole star; the
/// after state sums over the reconnected triangles (those not collapsing
/// to zero) with `v` placed at `vo`.
pub fn phase_area_change_exceeds(
  mesh: &Mesh,
  attributes: &AttributeStore,
  v: Simplex0,
  vo: Simplex0,
  threshold: f64,
) -> bool {
  use std::collections::BTreeMap;

  let new_position = attributes.current(vo);
  let mut deltas: BTreeMap<u32, f64> = BTreeMap::new();

  for t in mesh.vertex_triangles(v) {
    let label = mesh.label(t);
    let entry = deltas.entry(label).or_insert(0.0);
    *entry -= triangle_signed_area(mesh, attributes, t);
    if !t.contains(vo) {
      *entry += triangle_signed_area_moved(mesh, attributes, t, v, new_position);
    }
  }

  deltas.values().any(|delta| delta.abs() > threshold + 1e-12)
}

/// Global manifoldness sweep used by tests and debug checks.
pub fn is_manifold_mesh(mesh: &Mesh) -> bool {
  mesh.edges_iter().all(|e| mesh.is_manifold(e)) && mesh.vertices_iter().all(|v| mesh.is_manifold(v))
}

#[cfg(test)]
#[path = "util_test.rs"]
mod util_test;
