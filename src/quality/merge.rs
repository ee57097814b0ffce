//! Proximity test selecting triangles for the merge operation.

use crate::attributes::AttributeStore;
use crate::math::{deg_to_rad, edge_length};
use crate::mesh::Mesh;
use crate::params::Parameters;
use crate::quality::QualityMeasure;
use crate::simplex::Simplex;
use crate::util::longest_edge;

/// A triangle qualifies when its longest edge lies on the interface and
/// the vertex opposite that edge is an interface vertex hanging close to
/// it: closer than the distance threshold, or inside a sliver sharper than
/// the angle threshold. Splitting such a triangle lets the two interfaces
/// touch and the phases merge.
pub struct MergeProximity {
  angle_threshold: f64,
  distance_threshold: f64,
}

impl MergeProximity {
  pub fn new(operation_name: &str, label: u32, parameters: &Parameters) -> Self {
    Self {
      angle_threshold: deg_to_rad(parameters.angle_threshold(operation_name, label)),
      distance_threshold: parameters.distance_threshold(operation_name, label),
    }
  }
}

impl QualityMeasure for MergeProximity {
  fn dimension(&self) -> u32 {
    2
  }

  fn is_bad(&self, s: Simplex, mesh: &Mesh, attributes: &AttributeStore) -> bool {
    let Simplex::Triangle(t) = s else { return false };
    if !mesh.is_valid(t) {
      return false;
    }

    let e = longest_edge(mesh, attributes, t);
    if !mesh.is_interface(e) {
      return false;
    }

    let vo = t.opposite_vertex(e);
    if !mesh.is_interface(vo) {
      return false;
    }

    let cofaces = mesh.edge_cofaces(e);
    if cofaces.len() != 2 {
      return false;
    }
    let other = if cofaces[0] == t { cofaces[1] } else { cofaces[0] };
    let w = other.opposite_vertex(e);

    let (v1, v2) = e.endpoints();
    let p1 = attributes.current(v1);
    let p2 = attributes.current(v2);
    let po = attributes.current(vo);
    let pw = attributes.current(w);

    // The replacement triangles (w, vo, v1) and (w, vo, v2) must open to
    // opposite sides of the line through w and vo, and neither may be
    // degenerate.
    let a0 = (pw - p1).perp_dot(po - p1);
    let a1 = (pw - p2).perp_dot(po - p2);
    if a0 * a1 > 0.0 || a0.abs() < 1e-9 || a1.abs() < 1e-9 {
      return false;
    }

    // Height of vo over the edge.
    let direction = (p2 - p1) / edge_length(p1, p2);
    let r = po - p1;
    let h = r - direction * r.dot(direction);

    // A wide, distant vertex is a healthy triangle; everything else is a
    // merge candidate.
    let e1 = (p1 - po).normalize_or_zero();
    let e2 = (p2 - po).normalize_or_zero();
    if e1.dot(e2) > self.angle_threshold.cos()
      && h.length_squared() > self.distance_threshold * self.distance_threshold
    {
      return false;
    }

    true
  }
}
