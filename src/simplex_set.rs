//! Ordered sets of simplices, one collection per dimension.
//!
//! Sets iterate in canonical simplex order, which keeps every consumer of a
//! set deterministic. That determinism is load-bearing: the two-subdomain
//! parity property relies on batches visiting candidates in the same order
//! regardless of how the mesh was assembled.

use std::collections::BTreeSet;

use crate::logic::Expr;
use crate::mesh::Mesh;
use crate::simplex::{Simplex, Simplex0, Simplex1, Simplex2};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimplexSet {
  vertices: BTreeSet<Simplex0>,
  edges: BTreeSet<Simplex1>,
  triangles: BTreeSet<Simplex2>,
}

impl SimplexSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, s: impl Into<Simplex>) {
    match s.into() {
      Simplex::Vertex(v) => {
        self.vertices.insert(v);
      }
      Simplex::Edge(e) => {
        self.edges.insert(e);
      }
      Simplex::Triangle(t) => {
        self.triangles.insert(t);
      }
    }
  }

  /// Insert every member of `other`.
  pub fn insert_set(&mut self, other: &SimplexSet) {
    self.vertices.extend(other.vertices.iter().copied());
    self.edges.extend(other.edges.iter().copied());
    self.triangles.extend(other.triangles.iter().copied());
  }

  pub fn remove(&mut self, s: impl Into<Simplex>) -> bool {
    match s.into() {
      Simplex::Vertex(v) => self.vertices.remove(&v),
      Simplex::Edge(e) => self.edges.remove(&e),
      Simplex::Triangle(t) => self.triangles.remove(&t),
    }
  }

  pub fn contains(&self, s: impl Into<Simplex>) -> bool {
    match s.into() {
      Simplex::Vertex(v) => self.vertices.contains(&v),
      Simplex::Edge(e) => self.edges.contains(&e),
      Simplex::Triangle(t) => self.triangles.contains(&t),
    }
  }

  /// Number of members of the given dimension.
  pub fn size(&self, dimension: u32) -> usize {
    match dimension {
      0 => self.vertices.len(),
      1 => self.edges.len(),
      2 => self.triangles.len(),
      _ => 0,
    }
  }

  pub fn len(&self) -> usize {
    self.vertices.len() + self.edges.len() + self.triangles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn vertices(&self) -> impl Iterator<Item = Simplex0> + '_ {
    self.vertices.iter().copied()
  }

  pub fn edges(&self) -> impl Iterator<Item = Simplex1> + '_ {
    self.edges.iter().copied()
  }

  pub fn triangles(&self) -> impl Iterator<Item = Simplex2> + '_ {
    self.triangles.iter().copied()
  }

  /// All members, lowest dimension first.
  pub fn iter(&self) -> impl Iterator<Item = Simplex> + '_ {
    self
      .vertices()
      .map(Simplex::Vertex)
      .chain(self.edges().map(Simplex::Edge))
      .chain(self.triangles().map(Simplex::Triangle))
  }

  pub fn union(&self, other: &SimplexSet) -> SimplexSet {
    let mut result = self.clone();
    result.insert_set(other);
    result
  }

  pub fn intersection(&self, other: &SimplexSet) -> SimplexSet {
    SimplexSet {
      vertices: self.vertices.intersection(&other.vertices).copied().collect(),
      edges: self.edges.intersection(&other.edges).copied().collect(),
      triangles: self
        .triangles
        .intersection(&other.triangles)
        .copied()
        .collect(),
    }
  }

  /// Members of `self` that are not members of `other`.
  pub fn difference(&self, other: &SimplexSet) -> SimplexSet {
    SimplexSet {
      vertices: self.vertices.difference(&other.vertices).copied().collect(),
      edges: self.edges.difference(&other.edges).copied().collect(),
      triangles: self
        .triangles
        .difference(&other.triangles)
        .copied()
        .collect(),
    }
  }

  /// Members for which `expr` holds on `mesh`.
  pub fn filter(&self, mesh: &Mesh, expr: &Expr) -> SimplexSet {
    let mut result = SimplexSet::new();
    for s in self.iter() {
      if expr.holds(mesh, s) {
        result.insert(s);
      }
    }
    result
  }

  /// Members of the given dimension only.
  pub fn of_dimension(&self, dimension: u32) -> SimplexSet {
    let mut result = SimplexSet::new();
    match dimension {
      0 => result.vertices = self.vertices.clone(),
      1 => result.edges = self.edges.clone(),
      2 => result.triangles = self.triangles.clone(),
      _ => {}
    }
    result
  }
}

impl FromIterator<Simplex> for SimplexSet {
  fn from_iter<I: IntoIterator<Item = Simplex>>(iter: I) -> Self {
    let mut set = SimplexSet::new();
    for s in iter {
      set.insert(s);
    }
    set
  }
}

#[cfg(test)]
#[path = "simplex_set_test.rs"]
mod simplex_set_test;
