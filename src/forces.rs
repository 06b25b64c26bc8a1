use core::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::body::{RigidBody, RigidBodyState};
use crate::math::Vec3;

/// Speeds below this (squared) produce no drag; normalizing a near-zero
/// velocity would amplify noise into NaNs.
const MIN_DRAG_SPEED_SQ: f64 = 1e-12;

/// Net force and torque acting on a body at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForceAccumulator {
    /// Newtons.
    pub force: Vec3,
    /// Newton-meters.
    pub torque: Vec3,
}

/// The environment the coin flies through.
///
/// Gravity plus quadratic air drag on translation and a small linear drag on
/// rotation. Orientation-dependent aerodynamics (Magnus lift, area change)
/// are deliberately not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceModel {
    /// m/s², acting along -y.
    pub gravity: f64,
    /// kg/m³.
    pub air_density: f64,
    /// Dimensionless drag coefficient for a face-on disc.
    pub drag_coefficient: f64,
    /// Linear angular drag coefficient, N·m·s/rad. Calibrated, not physical;
    /// anything small and positive behaves the same.
    pub angular_damping: f64,
}

impl Default for ForceModel {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            air_density: 1.2,
            drag_coefficient: 1.17,
            angular_damping: 1e-8,
        }
    }
}

impl ForceModel {
    /// A model with every effect switched off, for torque-free integration.
    pub fn none() -> Self {
        Self {
            gravity: 0.0,
            air_density: 0.0,
            drag_coefficient: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Evaluates the net force and torque on `body` at the given state.
    ///
    /// The state is passed separately because the integrator evaluates
    /// forces at predicted intermediate states, not just the committed one.
    pub fn accumulate(&self, body: &RigidBody, state: &RigidBodyState) -> ForceAccumulator {
        let gravity = Vec3::new(0.0, -body.mass() * self.gravity, 0.0);
        let drag = self.linear_drag(body, state.linear_velocity);
        let torque = state.angular_velocity * -self.angular_damping;
        ForceAccumulator {
            force: gravity + drag,
            torque,
        }
    }

    /// Quadratic drag `-½·ρ·C_d·π·r²·|v|²·v̂` against a face-on disc area.
    fn linear_drag(&self, body: &RigidBody, velocity: Vec3) -> Vec3 {
        let speed_sq = velocity.magnitude_squared();
        if speed_sq < MIN_DRAG_SPEED_SQ {
            return Vec3::ZERO;
        }
        let area = PI * body.radius() * body.radius();
        let magnitude = 0.5 * self.air_density * self.drag_coefficient * area * speed_sq;
        velocity.normalize() * -magnitude
    }
}
