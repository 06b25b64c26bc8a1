//! Contact detection and response between the coin and the ground plane.
//!
//! The ground is the implicit plane `y = 0` with normal `(0, 1, 0)`. The
//! coin is tested through its two face centers `C ± (h/2)·n̂`; the disc
//! radius is deliberately not part of the contact solve, so rim contact for
//! tilted discs is approximated by the face-center test.

use crate::body::RigidBody;
use crate::config::ContactMaterial;
use crate::math::Vec3;

/// Penetrations at or below this depth are reported as non-contact; the
/// dead band keeps a resting coin from jittering between states.
pub const PENETRATION_TOLERANCE: f64 = 1e-4;

/// Impacts slower than this along the normal are treated as perfectly
/// inelastic, which terminates the infinite tail of ever-smaller bounces.
const MIN_BOUNCE_SPEED: f64 = 0.1;

/// Below this squared tangential speed there is no direction to rub along.
const MIN_TANGENT_SPEED_SQ: f64 = 1e-12;

/// A detected coin/ground contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Ground normal; always `(0, 1, 0)` for the plane.
    pub normal: Vec3,
    /// How far the lower face sits below the plane, beyond the tolerance.
    pub penetration: f64,
    /// Lower face center projected onto the plane (x and z preserved).
    pub point: Vec3,
}

/// Tests the coin against the ground plane.
pub fn detect_ground_contact(body: &RigidBody) -> Option<Contact> {
    let lower = body.lower_face_center();
    let penetration = -lower.y;
    if penetration <= PENETRATION_TOLERANCE {
        return None;
    }
    Some(Contact {
        normal: Vec3::UP,
        penetration,
        point: Vec3::new(lower.x, 0.0, lower.z),
    })
}

/// Resolves a contact with an instantaneous impulse and a positional
/// projection.
///
/// The impulse combines restitution along the normal (gated for slow
/// impacts) with clamped Coulomb friction along the tangent. Friction is
/// capped at the impulse that would bring the tangential contact-point
/// motion to rest, so it can reduce sliding but never reverse it. Angular
/// friction falls out of `r × J`; there is no extra rotational damping
/// here.
pub fn resolve_ground_contact(body: &mut RigidBody, contact: &Contact, material: &ContactMaterial) {
    let n = contact.normal;
    let r = contact.point - body.state.position;
    let inv_mass = 1.0 / body.mass();
    let inv_inertia = body.inverse_inertia_world();

    let v_point = body.state.linear_velocity + body.state.angular_velocity.cross(r);
    let v_n_scalar = v_point.dot(n);

    // Normal impulse, only while approaching.
    let mut j_n = 0.0;
    if v_n_scalar < 0.0 {
        let restitution = if v_n_scalar > -MIN_BOUNCE_SPEED {
            0.0
        } else {
            material.restitution
        };
        let r_cross_n = r.cross(n);
        let k_n = inv_mass + (inv_inertia * r_cross_n).dot(r_cross_n);
        j_n = -(1.0 + restitution) * v_n_scalar / k_n;
    }

    // Tangential impulse, Coulomb-clamped against the normal impulse.
    let v_t = v_point - n * v_n_scalar;
    let mut friction_impulse = Vec3::ZERO;
    if v_t.magnitude_squared() > MIN_TANGENT_SPEED_SQ {
        let tangent = v_t.normalize();
        let r_cross_t = r.cross(tangent);
        let k_t = inv_mass + (inv_inertia * r_cross_t).dot(r_cross_t);
        let j_t = (-v_t.magnitude() / k_t).max(-material.friction * j_n.abs());
        friction_impulse = tangent * j_t;
    }

    let impulse = n * j_n + friction_impulse;
    if impulse.magnitude_squared() > 0.0 {
        body.state.linear_velocity = body.state.linear_velocity + impulse * inv_mass;
        body.state.angular_velocity =
            body.state.angular_velocity + inv_inertia * r.cross(impulse);
    }

    // Push the body out of the plane. Sub-tolerance penetrations never reach
    // this point, so there is no projection jitter at rest.
    if contact.penetration > 0.0 {
        body.state.position = body.state.position + n * contact.penetration;
    }
}
