//! Move: advance vertices towards their prescribed targets by the largest
//! collision-free fraction of the step.

use glam::DVec2;

use crate::attributes::AttributeStore;
use crate::math::collapse_time;
use crate::mesh::Mesh;
use crate::operations::{MeshOperation, Plan};
use crate::params::Parameters;
use crate::simplex::Simplex;

const SUBSTEP_X: &str = "__move_substep_target_x";
const SUBSTEP_Y: &str = "__move_substep_target_y";

/// Fraction of the admissible sub-step actually taken, leaving a margin
/// before the first triangle degenerates.
const SUBSTEP_SAFETY: f64 = 0.9;

pub struct MoveVertices {
  label: u32,
  use_only_interface: bool,
}

impl MoveVertices {
  pub fn new(label: u32, parameters: &Parameters) -> Self {
    Self {
      label,
      use_only_interface: parameters.use_only_interface(),
    }
  }
}

impl MeshOperation for MoveVertices {
  /// Solve, per triangle, for the time its area vanishes under the motion
  /// `current -> target`, take the safe fraction of the earliest positive
  /// root, and store the resulting sub-step targets.
  fn init(&mut self, mesh: &Mesh, attributes: &mut AttributeStore) {
    let mut fraction: f64 = 1.0;

    for t in mesh.triangles_iter() {
      let label = mesh.label(t);
      let [a, b, c] = mesh.corners(t);

      let positions = [
        attributes.current(a),
        attributes.current(b),
        attributes.current(c),
      ];
      let velocity = |v| {
        attributes
          .target(v, label)
          .map(|target| target - attributes.current(v))
          .unwrap_or(DVec2::ZERO)
      };
      let velocities = [velocity(a), velocity(b), velocity(c)];

      if velocities.iter().all(|u| u.length_squared() == 0.0) {
        continue;
      }

      if let Some(time) = collapse_time(
        positions[0],
        positions[1],
        positions[2],
        velocities[0],
        velocities[1],
        velocities[2],
      ) {
        if time > 0.0 {
          fraction = fraction.min(SUBSTEP_SAFETY * time);
        }
      }
    }

    tracing::debug!(fraction, "move sub-step");

    let _ = attributes.create(SUBSTEP_X, 0);
    let _ = attributes.create(SUBSTEP_Y, 0);

    let vertices: Vec<_> = mesh.vertices_iter().collect();
    for v in vertices {
      let position = match attributes.try_current(v) {
        Some(p) => p,
        None => continue,
      };
      for label in attributes.labels(v).to_vec() {
        let Ok(target) = attributes.target(v, label) else {
          continue;
        };
        let substep = position + (target - position) * fraction;
        let _ = attributes.set_vertex_value(SUBSTEP_X, v, label, substep.x);
        let _ = attributes.set_vertex_value(SUBSTEP_Y, v, label, substep.y);
      }
    }
  }

  fn update_local_attributes(&self, s: Simplex, mesh: &Mesh, attributes: &mut AttributeStore) -> bool {
    let Simplex::Vertex(v) = s else { return false };

    if !mesh.is_valid(v) || mesh.is_submesh_boundary(v) {
      return false;
    }
    if self.use_only_interface && !mesh.is_interface(v) {
      return false;
    }
    if !attributes.exist(SUBSTEP_X, 0) || !attributes.exist(SUBSTEP_Y, 0) {
      return false;
    }

    let Ok(x) = attributes.vertex_value(SUBSTEP_X, v, self.label) else {
      return false;
    };
    let Ok(y) = attributes.vertex_value(SUBSTEP_Y, v, self.label) else {
      return false;
    };

    attributes.set_current(v, DVec2::new(x, y));
    true
  }

  fn plan(&self, _s: Simplex, _mesh: &mut Mesh, _attributes: &AttributeStore) -> Option<Plan> {
    None
  }
}

#[cfg(test)]
#[path = "move_vertices_test.rs"]
mod move_vertices_test;
