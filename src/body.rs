use serde::{Deserialize, Serialize};

use crate::config::CoinConfig;
use crate::error::FlipError;
use crate::math::{Mat3, Quaternion, Vec3};

/// Snapshot of a rigid body's dynamic state.
///
/// This is the record the integrator advances and the trajectory recorder
/// copies out; the orientation is always a unit quaternion with `w >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    /// Center of mass, meters.
    pub position: Vec3,
    pub orientation: Quaternion,
    /// Meters per second.
    pub linear_velocity: Vec3,
    /// World frame, radians per second.
    pub angular_velocity: Vec3,
}

impl Default for RigidBodyState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quaternion::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }
}

impl RigidBodyState {
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.orientation.is_finite()
            && self.linear_velocity.is_finite()
            && self.angular_velocity.is_finite()
    }
}

/// A simulated coin: dynamic state plus immutable body properties.
///
/// The inertia tensor is built once at construction from a solid-cylinder
/// model and never mutated afterwards; its inverse is precomputed because
/// the integrator and the collision responder both need it every step.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub state: RigidBodyState,
    mass: f64,
    radius: f64,
    thickness: f64,
    inertia: Mat3,
    inverse_inertia: Mat3,
}

impl RigidBody {
    /// Builds a coin body from its geometry and an initial state.
    ///
    /// Cylinder about the disc axis (y in the body frame):
    /// `I_yy = m·r²/2`, `I_xx = I_zz = m·(3r² + h²)/12`.
    pub fn new(state: RigidBodyState, coin: &CoinConfig) -> Result<Self, FlipError> {
        let r_sq = coin.radius * coin.radius;
        let h_sq = coin.thickness * coin.thickness;
        let i_spin = 0.5 * coin.mass * r_sq;
        let i_tumble = coin.mass * (3.0 * r_sq + h_sq) / 12.0;
        let inertia = Mat3::from_diagonal(Vec3::new(i_tumble, i_spin, i_tumble));
        Self::with_inertia(state, coin.mass, coin.radius, coin.thickness, inertia)
    }

    /// Builds a body with an explicit body-frame inertia tensor.
    ///
    /// Fails when the tensor is singular or any parameter is non-physical.
    pub fn with_inertia(
        state: RigidBodyState,
        mass: f64,
        radius: f64,
        thickness: f64,
        inertia: Mat3,
    ) -> Result<Self, FlipError> {
        let singular = || FlipError::SingularInertia {
            mass,
            radius,
            thickness,
        };
        if !(mass > 0.0 && mass.is_finite()) || !inertia.is_finite() {
            return Err(singular());
        }
        let inverse_inertia = inertia.inverse().ok_or_else(singular)?;
        Ok(Self {
            state,
            mass,
            radius,
            thickness,
            inertia,
            inverse_inertia,
        })
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    #[inline]
    pub fn inertia(&self) -> Mat3 {
        self.inertia
    }

    /// Body-frame inertia rotated into the world frame at an arbitrary
    /// orientation: `I_world = R · I_body · Rᵀ`.
    #[inline]
    pub fn inertia_world_at(&self, orientation: Quaternion) -> Mat3 {
        let r = Mat3::from_quaternion(orientation);
        r * self.inertia * r.transpose()
    }

    /// Same transform applied to the precomputed inverse.
    #[inline]
    pub fn inverse_inertia_world_at(&self, orientation: Quaternion) -> Mat3 {
        let r = Mat3::from_quaternion(orientation);
        r * self.inverse_inertia * r.transpose()
    }

    /// World-frame inverse inertia at the body's current orientation.
    #[inline]
    pub fn inverse_inertia_world(&self) -> Mat3 {
        self.inverse_inertia_world_at(self.state.orientation)
    }

    /// Applies an instantaneous impulse at a world-space point:
    /// `v += J/m`, `ω += I⁻¹_world · (r × J)`.
    pub fn apply_impulse_at(&mut self, impulse: Vec3, point: Vec3) {
        let r = point - self.state.position;
        self.state.linear_velocity = self.state.linear_velocity + impulse / self.mass;
        self.state.angular_velocity =
            self.state.angular_velocity + self.inverse_inertia_world() * r.cross(impulse);
    }

    /// The coin's face normal in world space.
    #[inline]
    pub fn face_normal(&self) -> Vec3 {
        self.state.orientation.rotate(Vec3::UP)
    }

    /// World-space center of whichever face currently hangs lower.
    ///
    /// The two face centers sit at `C ± (h/2)·n̂`; the collision detector and
    /// the stability detector both key off the lower one.
    pub fn lower_face_center(&self) -> Vec3 {
        let offset = self.face_normal() * (self.thickness * 0.5);
        let a = self.state.position + offset;
        let b = self.state.position - offset;
        if a.y < b.y {
            a
        } else {
            b
        }
    }

    /// Rotational kinetic energy `½·ω·(I_world·ω)`.
    pub fn rotational_energy(&self) -> f64 {
        let omega = self.state.angular_velocity;
        let i_world = self.inertia_world_at(self.state.orientation);
        0.5 * omega.dot(i_world * omega)
    }

    /// Translational kinetic energy `½·m·|v|²`.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.state.linear_velocity.magnitude_squared()
    }
}
