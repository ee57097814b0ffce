//! Incidence-preserving store of the labelled 2-complex.
//!
//! The mesh keeps, per triangle, its oriented corner sequence and phase
//! label; per edge, the one or two triangles sharing it; per vertex, its
//! incident triangles and the submesh-boundary flag set by decomposition.
//! Coordinates are not stored here. They live in the attribute store as the
//! reserved `current` field, and are consulted only when `replace` derives
//! the CCW corner order of freshly inserted triangles.
//!
//! `replace` is the single commit point used by every mesh operation: it
//! validates the whole connectivity change first and only then mutates, so
//! a rejected change leaves the mesh untouched.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use crate::attributes::AttributeStore;
use crate::error::{EngineError, Result};
use crate::math::signed_triangle_area;
use crate::params::Parameters;
use crate::simplex::{Simplex, Simplex0, Simplex1, Simplex2};
use crate::simplex_set::SimplexSet;

#[derive(Clone, Debug)]
struct TriangleData {
  /// Corner sequence in geometric orientation (CCW for every triangle
  /// committed through `replace`).
  corners: [Simplex0; 3],
  label: u32,
}

#[derive(Clone, Debug, Default)]
struct VertexData {
  triangles: BTreeSet<Simplex2>,
  submesh_boundary: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
  vertices: BTreeMap<Simplex0, VertexData>,
  edges: BTreeMap<Simplex1, SmallVec<[Simplex2; 2]>>,
  triangles: BTreeMap<Simplex2, TriangleData>,
  next_vertex: u32,
}

impl Mesh {
  pub fn new() -> Self {
    Self::default()
  }

  // ===========================================================================
  // Primitives
  // ===========================================================================

  /// Allocate a fresh vertex. The vertex starts isolated; it becomes part
  /// of the complex once a triangle references it.
  pub fn insert_vertex(&mut self) -> Simplex0 {
    let v = Simplex0::new(self.next_vertex);
    self.next_vertex += 1;
    self.vertices.insert(v, VertexData::default());
    v
  }

  /// Register a vertex under an existing id, bumping the allocator past
  /// it. Used when decomposition copies a mesh region while preserving
  /// global ids.
  pub(crate) fn adopt_vertex(&mut self, v: Simplex0) {
    self.vertices.entry(v).or_default();
    self.next_vertex = self.next_vertex.max(v.index() + 1);
  }

  /// Raise the allocator so fresh ids start at or above `mark`.
  pub(crate) fn set_vertex_floor(&mut self, mark: u32) {
    self.next_vertex = self.next_vertex.max(mark);
  }

  /// First id the allocator has not handed out yet.
  pub(crate) fn vertex_mark(&self) -> u32 {
    self.next_vertex
  }

  /// Drop an isolated vertex. Returns false when the vertex still has
  /// incident triangles (or does not exist).
  pub(crate) fn discard_vertex(&mut self, v: Simplex0) -> bool {
    match self.vertices.get(&v) {
      Some(data) if data.triangles.is_empty() => {
        self.vertices.remove(&v);
        true
      }
      _ => false,
    }
  }

  /// Insert a triangle over existing vertices, creating its edges as
  /// needed. The given corner order is kept as the stored orientation.
  pub fn insert_triangle(&mut self, a: Simplex0, b: Simplex0, c: Simplex0) -> Result<Simplex2> {
    if a == b || b == c || a == c {
      return Err(EngineError::InvalidGeometry(format!(
        "triangle with coincident vertices ({a}, {b}, {c})"
      )));
    }
    for v in [a, b, c] {
      if !self.vertices.contains_key(&v) {
        return Err(EngineError::InvalidArgument(format!(
          "{v} is not a vertex of the mesh"
        )));
      }
    }

    let t = Simplex2::new(a, b, c);
    if self.triangles.contains_key(&t) {
      return Err(EngineError::TopologyViolation(format!("{t} already present")));
    }
    for e in t.edges() {
      if self.edges.get(&e).map_or(false, |cofaces| cofaces.len() >= 2) {
        return Err(EngineError::TopologyViolation(format!(
          "{e} already has two incident triangles"
        )));
      }
    }

    self.register_triangle(t, [a, b, c], 0);
    Ok(t)
  }

  /// Insert a triangle with a known corner order and label, used when
  /// copying between meshes.
  pub(crate) fn insert_triangle_exact(
    &mut self,
    corners: [Simplex0; 3],
    label: u32,
  ) -> Result<Simplex2> {
    let t = self.insert_triangle(corners[0], corners[1], corners[2])?;
    self.set_label(t, label);
    Ok(t)
  }

  /// Remove a simplex. Vertices and edges are removed only when nothing
  /// depends on them; triangle removal cascades to sub-simplices it
  /// orphans.
  pub fn remove(&mut self, s: impl Into<Simplex>) -> Result<()> {
    match s.into() {
      Simplex::Vertex(v) => {
        if self.vertices.get(&v).map_or(true, |d| !d.triangles.is_empty()) {
          return Err(EngineError::TopologyViolation(format!(
            "{v} still has incident triangles"
          )));
        }
        self.vertices.remove(&v);
        Ok(())
      }
      Simplex::Edge(e) => {
        if self.edges.get(&e).map_or(true, |cofaces| !cofaces.is_empty()) {
          return Err(EngineError::TopologyViolation(format!(
            "{e} still has incident triangles"
          )));
        }
        self.edges.remove(&e);
        Ok(())
      }
      Simplex::Triangle(t) => {
        if !self.triangles.contains_key(&t) {
          return Err(EngineError::InvalidArgument(format!("{t} is not in the mesh")));
        }
        self.unregister_triangle(t);
        let vertices = t.vertices();
        for v in vertices {
          if self.vertices.get(&v).map_or(false, |d| d.triangles.is_empty()) {
            self.vertices.remove(&v);
          }
        }
        Ok(())
      }
    }
  }

  fn register_triangle(&mut self, t: Simplex2, corners: [Simplex0; 3], label: u32) {
    self.triangles.insert(t, TriangleData { corners, label });
    for e in t.edges() {
      self.edges.entry(e).or_default().push(t);
    }
    for v in t.vertices() {
      self
        .vertices
        .entry(v)
        .or_default()
        .triangles
        .insert(t);
    }
  }

  fn unregister_triangle(&mut self, t: Simplex2) {
    if self.triangles.remove(&t).is_none() {
      return;
    }
    for e in t.edges() {
      let orphaned = match self.edges.get_mut(&e) {
        Some(cofaces) => {
          cofaces.retain(|&mut c| c != t);
          cofaces.is_empty()
        }
        None => false,
      };
      if orphaned {
        self.edges.remove(&e);
      }
    }
    for v in t.vertices() {
      if let Some(data) = self.vertices.get_mut(&v) {
        data.triangles.remove(&t);
      }
    }
  }

  // ===========================================================================
  // Atomic connectivity swap
  // ===========================================================================

  /// Commit a planned connectivity change: insert every simplex of
  /// `new_simplices`, then remove every simplex of `old_simplices`.
  ///
  /// Each new triangle inherits its label from `label_overrides`, or else
  /// from its entry in `triangle_parents`; its stored corner order is
  /// derived CCW from the `current` coordinates. Fails with
  /// `TopologyViolation` when the change would create a non-manifold edge,
  /// a duplicate triangle, or a triangle of non-positive signed area, and
  /// with `MissingParent` when a new triangle has neither a label override
  /// nor a live parent. On failure the mesh is left exactly as it was.
  pub fn replace(
    &mut self,
    old_simplices: &SimplexSet,
    new_simplices: &SimplexSet,
    triangle_parents: &BTreeMap<Simplex2, Simplex2>,
    label_overrides: &BTreeMap<Simplex2, u32>,
    attributes: &AttributeStore,
    parameters: &Parameters,
  ) -> Result<()> {
    let mut staged: Vec<(Simplex2, [Simplex0; 3], u32)> = Vec::new();

    for t in new_simplices.triangles() {
      if self.triangles.contains_key(&t) && !old_simplices.contains(t) {
        return Err(EngineError::TopologyViolation(format!(
          "{t} duplicates an existing triangle"
        )));
      }

      let [a, b, c] = t.vertices();
      for v in [a, b, c] {
        if !self.vertices.contains_key(&v) && !new_simplices.contains(v) {
          return Err(EngineError::TopologyViolation(format!(
            "{t} references unknown vertex {v}"
          )));
        }
      }

      let pa = attributes
        .try_current(a)
        .ok_or_else(|| EngineError::InvalidArgument(format!("{a} has no coordinates")))?;
      let pb = attributes
        .try_current(b)
        .ok_or_else(|| EngineError::InvalidArgument(format!("{b} has no coordinates")))?;
      let pc = attributes
        .try_current(c)
        .ok_or_else(|| EngineError::InvalidArgument(format!("{c} has no coordinates")))?;

      let area = signed_triangle_area(pa, pb, pc);
      if area == 0.0 {
        return Err(EngineError::TopologyViolation(format!("{t} is degenerate")));
      }
      let corners = if area > 0.0 { [a, b, c] } else { [a, c, b] };

      let label = match label_overrides.get(&t) {
        Some(&label) => label,
        None => {
          let parent = triangle_parents
            .get(&t)
            .ok_or_else(|| EngineError::MissingParent(format!("{t}")))?;
          self
            .triangles
            .get(parent)
            .map(|data| data.label)
            .ok_or_else(|| EngineError::MissingParent(format!("{parent} (parent of {t})")))?
        }
      };

      staged.push((t, corners, label));
    }

    // Per-edge coface count after the swap; more than two is a fan.
    let mut checked: BTreeSet<Simplex1> = BTreeSet::new();
    for (t, _, _) in &staged {
      for e in t.edges() {
        if !checked.insert(e) {
          continue;
        }
        let surviving = self
          .edges
          .get(&e)
          .map(|cofaces| {
            cofaces
              .iter()
              .filter(|&&c| !old_simplices.contains(c))
              .count()
          })
          .unwrap_or(0);
        let incoming = staged.iter().filter(|(s, _, _)| s.contains_edge(e)).count();
        if surviving + incoming > 2 {
          return Err(EngineError::TopologyViolation(format!(
            "{e} would have {} incident triangles",
            surviving + incoming
          )));
        }
      }
    }

    if parameters.verbose() {
      tracing::trace!(
        new_triangles = staged.len(),
        old_triangles = old_simplices.size(2),
        "replace"
      );
    }

    // Commit: insert first, remove after, so attribute parenting can read
    // surviving state at any point in between.
    for v in new_simplices.vertices() {
      self.vertices.entry(v).or_default();
      self.next_vertex = self.next_vertex.max(v.index() + 1);
    }
    for (t, corners, label) in staged {
      // A triangle listed in both sets is re-inserted, not duplicated.
      if self.triangles.contains_key(&t) {
        self.unregister_triangle(t);
      }
      self.register_triangle(t, corners, label);
    }
    for t in old_simplices.triangles() {
      if !new_simplices.contains(t) {
        self.unregister_triangle(t);
      }
    }
    for e in old_simplices.edges() {
      if self.edges.get(&e).map_or(false, |cofaces| cofaces.is_empty()) {
        self.edges.remove(&e);
      }
    }
    for v in old_simplices.vertices() {
      if !new_simplices.contains(v) {
        self.discard_vertex(v);
      }
    }

    Ok(())
  }

  // ===========================================================================
  // Labels, flags, orientation
  // ===========================================================================

  /// Phase label of a triangle. The triangle must be in the mesh.
  pub fn label(&self, t: Simplex2) -> u32 {
    self.triangles[&t].label
  }

  pub fn set_label(&mut self, t: Simplex2, label: u32) {
    if let Some(data) = self.triangles.get_mut(&t) {
      data.label = label;
    }
  }

  /// Stored (oriented) corner sequence of a triangle.
  pub fn corners(&self, t: Simplex2) -> [Simplex0; 3] {
    self.triangles[&t].corners
  }

  /// Sign of the embedded area of the stored corner sequence: 1 for CCW,
  /// -1 for CW, 0 for degenerate.
  pub fn orientation(&self, t: Simplex2, attributes: &AttributeStore) -> i32 {
    let [a, b, c] = self.corners(t);
    let area = signed_triangle_area(
      attributes.current(a),
      attributes.current(b),
      attributes.current(c),
    );
    if area > 0.0 {
      1
    } else if area < 0.0 {
      -1
    } else {
      0
    }
  }

  pub fn submesh_boundary(&self, v: Simplex0) -> bool {
    self.vertices.get(&v).map_or(false, |d| d.submesh_boundary)
  }

  pub fn set_submesh_boundary(&mut self, v: Simplex0, flag: bool) {
    if let Some(data) = self.vertices.get_mut(&v) {
      data.submesh_boundary = flag;
    }
  }

  // ===========================================================================
  // Counts and iteration
  // ===========================================================================

  pub fn vertex_count(&self) -> usize {
    self.vertices.len()
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  pub fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  pub fn vertices_iter(&self) -> impl Iterator<Item = Simplex0> + '_ {
    self.vertices.keys().copied()
  }

  pub fn edges_iter(&self) -> impl Iterator<Item = Simplex1> + '_ {
    self.edges.keys().copied()
  }

  pub fn triangles_iter(&self) -> impl Iterator<Item = Simplex2> + '_ {
    self.triangles.keys().copied()
  }

  /// The one or two triangles sharing an edge.
  pub fn edge_cofaces(&self, e: Simplex1) -> &[Simplex2] {
    match self.edges.get(&e) {
      Some(cofaces) => cofaces.as_slice(),
      None => &[],
    }
  }

  pub fn vertex_triangles(&self, v: Simplex0) -> impl Iterator<Item = Simplex2> + '_ {
    self
      .vertices
      .get(&v)
      .into_iter()
      .flat_map(|data| data.triangles.iter().copied())
  }

  pub fn all_simplices(&self) -> SimplexSet {
    let mut set = SimplexSet::new();
    for &v in self.vertices.keys() {
      set.insert(v);
    }
    for &e in self.edges.keys() {
      set.insert(e);
    }
    for &t in self.triangles.keys() {
      set.insert(t);
    }
    set
  }

  // ===========================================================================
  // Derived queries
  // ===========================================================================

  pub fn is_valid(&self, s: impl Into<Simplex>) -> bool {
    match s.into() {
      Simplex::Vertex(v) => self.vertices.contains_key(&v),
      Simplex::Edge(e) => self.edges.contains_key(&e),
      Simplex::Triangle(t) => self.triangles.contains_key(&t),
    }
  }

  /// Immediate boundary: the three edges of a triangle, the two vertices
  /// of an edge, nothing for a vertex.
  pub fn boundary(&self, s: impl Into<Simplex>) -> SimplexSet {
    let mut set = SimplexSet::new();
    match s.into() {
      Simplex::Vertex(_) => {}
      Simplex::Edge(e) => {
        let (a, b) = e.endpoints();
        set.insert(a);
        set.insert(b);
      }
      Simplex::Triangle(t) => {
        for e in t.edges() {
          set.insert(e);
        }
      }
    }
    set
  }

  /// Closure of the boundary.
  pub fn full_boundary(&self, s: impl Into<Simplex>) -> SimplexSet {
    self.closure_set(&self.boundary(s))
  }

  /// Every simplex whose closure contains `s`, plus `s` itself.
  pub fn star(&self, s: impl Into<Simplex>) -> SimplexSet {
    let mut set = SimplexSet::new();
    match s.into() {
      Simplex::Vertex(v) => {
        if !self.vertices.contains_key(&v) {
          return set;
        }
        set.insert(v);
        for t in self.vertex_triangles(v) {
          set.insert(t);
          for e in t.edges() {
            if e.contains(v) {
              set.insert(e);
            }
          }
        }
      }
      Simplex::Edge(e) => {
        if !self.edges.contains_key(&e) {
          return set;
        }
        set.insert(e);
        for &t in self.edge_cofaces(e) {
          set.insert(t);
        }
      }
      Simplex::Triangle(t) => {
        if self.triangles.contains_key(&t) {
          set.insert(t);
        }
      }
    }
    set
  }

  /// Union of the stars of every member.
  pub fn star_set(&self, simplices: &SimplexSet) -> SimplexSet {
    let mut set = SimplexSet::new();
    for s in simplices.iter() {
      set.insert_set(&self.star(s));
    }
    set
  }

  /// `s` plus every sub-simplex of `s`.
  pub fn closure(&self, s: impl Into<Simplex>) -> SimplexSet {
    let mut set = SimplexSet::new();
    match s.into() {
      Simplex::Vertex(v) => {
        set.insert(v);
      }
      Simplex::Edge(e) => {
        let (a, b) = e.endpoints();
        set.insert(e);
        set.insert(a);
        set.insert(b);
      }
      Simplex::Triangle(t) => {
        set.insert(t);
        for e in t.edges() {
          set.insert(e);
        }
        for v in t.vertices() {
          set.insert(v);
        }
      }
    }
    set
  }

  /// Union of the closures of every member.
  pub fn closure_set(&self, simplices: &SimplexSet) -> SimplexSet {
    let mut set = SimplexSet::new();
    for s in simplices.iter() {
      set.insert_set(&self.closure(s));
    }
    set
  }

  /// `closure(star(s)) \ star(closure(s))`: the boundary of the
  /// neighbourhood of `s`.
  pub fn link(&self, s: impl Into<Simplex>) -> SimplexSet {
    let s = s.into();
    let cs = self.closure_set(&self.star(s));
    let sc = self.star_set(&self.closure(s));
    cs.difference(&sc)
  }

  pub fn is_interface(&self, s: impl Into<Simplex>) -> bool {
    match s.into() {
      Simplex::Vertex(v) => self
        .vertex_triangles(v)
        .flat_map(|t| t.edges())
        .any(|e| e.contains(v) && self.edge_is_interface(e)),
      Simplex::Edge(e) => self.edge_is_interface(e),
      Simplex::Triangle(_) => false,
    }
  }

  fn edge_is_interface(&self, e: Simplex1) -> bool {
    match self.edge_cofaces(e) {
      [t1, t2] => self.triangles[t1].label != self.triangles[t2].label,
      _ => false,
    }
  }

  pub fn is_boundary(&self, s: impl Into<Simplex>) -> bool {
    match s.into() {
      Simplex::Vertex(v) => self
        .vertex_triangles(v)
        .flat_map(|t| t.edges())
        .any(|e| e.contains(v) && self.edge_cofaces(e).len() < 2),
      Simplex::Edge(e) => self.edges.contains_key(&e) && self.edge_cofaces(e).len() < 2,
      Simplex::Triangle(_) => false,
    }
  }

  /// Vertices flagged by decomposition; an edge counts when both its
  /// endpoints are flagged. Triangles never do, only their faces can.
  pub fn is_submesh_boundary(&self, s: impl Into<Simplex>) -> bool {
    match s.into() {
      Simplex::Vertex(v) => self.submesh_boundary(v),
      Simplex::Edge(e) => {
        let (a, b) = e.endpoints();
        self.submesh_boundary(a) && self.submesh_boundary(b)
      }
      Simplex::Triangle(_) => false,
    }
  }

  /// A vertex is manifold when its incident triangles form a single fan
  /// and the number of boundary edges through it is zero (interior) or two
  /// (on the mesh boundary). An edge is manifold when it has one or two
  /// cofaces. A triangle trivially is.
  pub fn is_manifold(&self, s: impl Into<Simplex>) -> bool {
    match s.into() {
      Simplex::Vertex(v) => self.vertex_is_manifold(v),
      Simplex::Edge(e) => {
        let n = self.edge_cofaces(e).len();
        n == 1 || n == 2
      }
      Simplex::Triangle(t) => self.triangles.contains_key(&t),
    }
  }

  fn vertex_is_manifold(&self, v: Simplex0) -> bool {
    let tris: Vec<Simplex2> = self.vertex_triangles(v).collect();
    if tris.is_empty() {
      return false;
    }

    let boundary_edges = tris
      .iter()
      .flat_map(|t| t.edges())
      .filter(|e| e.contains(v) && self.edge_cofaces(*e).len() == 1)
      .collect::<BTreeSet<_>>()
      .len();
    if boundary_edges != 0 && boundary_edges != 2 {
      return false;
    }

    // Fan connectivity: walk triangle-to-triangle across edges through v.
    let mut visited = BTreeSet::new();
    let mut stack = vec![tris[0]];
    while let Some(t) = stack.pop() {
      if !visited.insert(t) {
        continue;
      }
      for e in t.edges() {
        if !e.contains(v) {
          continue;
        }
        for &n in self.edge_cofaces(e) {
          if n != t && !visited.contains(&n) {
            stack.push(n);
          }
        }
      }
    }
    visited.len() == tris.len()
  }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
