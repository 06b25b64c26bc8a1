use core::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use super::Vec3;

/// Components this close to zero are snapped to exact zero by
/// [`Quaternion::normalize`], which keeps `-0.0` from leaking into
/// orientation comparisons and replay output.
const SNAP_EPSILON: f64 = 1e-6;

/// Squared-magnitude floor below which [`Quaternion::inverse`] gives up.
const MIN_INVERTIBLE_MAG_SQ: f64 = 1e-6;

/// A quaternion `w + xi + yj + zk`.
///
/// Unit quaternions are the normal form for orientations: [`normalize`]
/// canonicalizes the sign so `w >= 0`, and every rotation consumer assumes
/// its input is already unit length.
///
/// [`normalize`]: Quaternion::normalize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// The axis is normalized internally; a zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let axis = axis.normalize();
        let (s, c) = (angle * 0.5).sin_cos();
        Quaternion::new(c, axis.x * s, axis.y * s, axis.z * s).normalize()
    }

    /// Recovers `(axis, angle)`. The identity maps to `(UP, 0.0)`.
    pub fn to_axis_angle(self) -> (Vec3, f64) {
        let q = self.normalize();
        let sin_half = (1.0 - q.w * q.w).max(0.0).sqrt();
        if sin_half < SNAP_EPSILON {
            return (Vec3::UP, 0.0);
        }
        let axis = Vec3::new(q.x, q.y, q.z) / sin_half;
        (axis, 2.0 * q.w.clamp(-1.0, 1.0).acos())
    }

    #[inline]
    pub fn magnitude_squared(self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Unit quaternion with canonical sign.
    ///
    /// - zero input maps to the identity;
    /// - the sign is flipped if needed so `w >= 0` (q and -q encode the same
    ///   rotation, and replay comparisons need one representative);
    /// - components within 1e-6 of zero are snapped to exact zero.
    pub fn normalize(self) -> Quaternion {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Quaternion::IDENTITY;
        }
        let sign = if self.w < 0.0 { -1.0 } else { 1.0 };
        let scale = sign / mag;
        let snap = |v: f64| if v.abs() < SNAP_EPSILON { 0.0 } else { v };
        Quaternion::new(
            snap(self.w * scale),
            snap(self.x * scale),
            snap(self.y * scale),
            snap(self.z * scale),
        )
    }

    #[inline]
    pub fn conjugate(self) -> Quaternion {
        Quaternion::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Multiplicative inverse, or the all-zero quaternion when the input is
    /// too close to zero to invert.
    pub fn inverse(self) -> Quaternion {
        let mag_sq = self.magnitude_squared();
        if mag_sq < MIN_INVERTIBLE_MAG_SQ {
            return Quaternion::new(0.0, 0.0, 0.0, 0.0);
        }
        let c = self.conjugate();
        Quaternion::new(c.w / mag_sq, c.x / mag_sq, c.y / mag_sq, c.z / mag_sq)
    }

    /// Rotates `v` by this (unit) quaternion via the sandwich product
    /// `q ⊗ (0, v) ⊗ q*`.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let p = Quaternion::new(0.0, v.x, v.y, v.z);
        let r = self * p * self.conjugate();
        Vec3::new(r.x, r.y, r.z)
    }

    /// Orientation derivative for a body spinning at world-frame angular
    /// velocity `omega`: `dq/dt = ½ · (0, ω) ⊗ q`.
    pub fn derivative(self, omega: Vec3) -> Quaternion {
        let spin = Quaternion::new(0.0, omega.x, omega.y, omega.z);
        (spin * self) * 0.5
    }

    pub fn is_finite(self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Hamilton product.
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, r: Quaternion) -> Quaternion {
        Quaternion::new(
            self.w * r.w - self.x * r.x - self.y * r.y - self.z * r.z,
            self.w * r.x + self.x * r.w + self.y * r.z - self.z * r.y,
            self.w * r.y - self.x * r.z + self.y * r.w + self.z * r.x,
            self.w * r.z + self.x * r.y - self.y * r.x + self.z * r.w,
        )
    }
}

impl Mul<f64> for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn mul(self, s: f64) -> Quaternion {
        Quaternion::new(self.w * s, self.x * s, self.y * s, self.z * s)
    }
}

impl Add for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn add(self, r: Quaternion) -> Quaternion {
        Quaternion::new(self.w + r.w, self.x + r.x, self.y + r.y, self.z + r.z)
    }
}
