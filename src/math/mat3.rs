use core::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use super::{Quaternion, Vec3};

/// Determinants below this magnitude are treated as singular.
///
/// Coin-scale inertia tensors have determinants around 1e-20, so the guard
/// has to sit far below any physically meaningful value.
const MIN_INVERTIBLE_DET: f64 = 1e-30;

/// A 3×3 `f64` matrix in row-major order.
///
/// Used for inertia tensors and rotation matrices. Like the other math
/// types, all operations return fresh values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat3 {
    m: [f64; 9],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    #[inline]
    pub const fn new(m: [f64; 9]) -> Self {
        Self { m }
    }

    /// Diagonal matrix with the given entries, zeros elsewhere.
    #[inline]
    pub const fn from_diagonal(d: Vec3) -> Self {
        Mat3::new([d.x, 0.0, 0.0, 0.0, d.y, 0.0, 0.0, 0.0, d.z])
    }

    /// Element at `(row, col)`, both in `0..3`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.m[row * 3 + col]
    }

    /// Skew-symmetric cross-product matrix: `skew(v) * u == v × u`.
    #[inline]
    pub fn skew(v: Vec3) -> Self {
        Mat3::new([0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0])
    }

    /// Rotation about the x axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Mat3::new([1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c])
    }

    /// Rotation about the y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Mat3::new([c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c])
    }

    /// Rotation about the z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Mat3::new([c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0])
    }

    /// Rotation matrix equivalent to a unit quaternion.
    ///
    /// The input must already be normalized; the orientation invariant
    /// guarantees that for every quaternion reaching this constructor.
    pub fn from_quaternion(q: Quaternion) -> Self {
        let (w, x, y, z) = (q.w, q.x, q.y, q.z);
        Mat3::new([
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - w * z),
            2.0 * (x * z + w * y),
            2.0 * (x * y + w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - w * x),
            2.0 * (x * z - w * y),
            2.0 * (y * z + w * x),
            1.0 - 2.0 * (x * x + y * y),
        ])
    }

    #[inline]
    pub fn transpose(&self) -> Mat3 {
        let m = &self.m;
        Mat3::new([m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]])
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    #[inline]
    pub fn trace(&self) -> f64 {
        self.m[0] + self.m[4] + self.m[8]
    }

    /// Inverse via the adjugate, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Mat3> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < MIN_INVERTIBLE_DET {
            return None;
        }
        let m = &self.m;
        let inv_det = 1.0 / det;
        Some(Mat3::new([
            (m[4] * m[8] - m[5] * m[7]) * inv_det,
            (m[2] * m[7] - m[1] * m[8]) * inv_det,
            (m[1] * m[5] - m[2] * m[4]) * inv_det,
            (m[5] * m[6] - m[3] * m[8]) * inv_det,
            (m[0] * m[8] - m[2] * m[6]) * inv_det,
            (m[2] * m[3] - m[0] * m[5]) * inv_det,
            (m[3] * m[7] - m[4] * m[6]) * inv_det,
            (m[1] * m[6] - m[0] * m[7]) * inv_det,
            (m[0] * m[4] - m[1] * m[3]) * inv_det,
        ]))
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|v| v.is_finite())
    }
}

impl Add for Mat3 {
    type Output = Mat3;

    fn add(self, rhs: Mat3) -> Mat3 {
        let mut m = [0.0; 9];
        for (i, slot) in m.iter_mut().enumerate() {
            *slot = self.m[i] + rhs.m[i];
        }
        Mat3::new(m)
    }
}

impl Sub for Mat3 {
    type Output = Mat3;

    fn sub(self, rhs: Mat3) -> Mat3 {
        let mut m = [0.0; 9];
        for (i, slot) in m.iter_mut().enumerate() {
            *slot = self.m[i] - rhs.m[i];
        }
        Mat3::new(m)
    }
}

impl Mul<f64> for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: f64) -> Mat3 {
        let mut m = self.m;
        for slot in m.iter_mut() {
            *slot *= rhs;
        }
        Mat3::new(m)
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut m = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                let mut sum = 0.0;
                for k in 0..3 {
                    sum += self.at(row, k) * rhs.at(k, col);
                }
                m[row * 3 + col] = sum;
            }
        }
        Mat3::new(m)
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0] * v.x + m[1] * v.y + m[2] * v.z,
            m[3] * v.x + m[4] * v.y + m[5] * v.z,
            m[6] * v.x + m[7] * v.y + m[8] * v.z,
        )
    }
}
