use serde::{Deserialize, Serialize};

use crate::entropy::EntropyLevel;
use crate::forces::ForceModel;
use crate::math::{Quaternion, Vec3};

/// Physical description of the coin, SI units.
///
/// Defaults match a US quarter: 5.67 g, 24.26 mm diameter, 1.75 mm thick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinConfig {
    /// Mass in kilograms.
    pub mass: f64,
    /// Disc radius in meters.
    pub radius: f64,
    /// Disc thickness in meters.
    pub thickness: f64,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            mass: 0.00567,
            radius: 0.01213,
            thickness: 0.00175,
        }
    }
}

/// Optional `[min, max]` ranges describing how the coin is thrown.
///
/// A supplied range is mapped to distribution parameters as
/// `mean = (min + max) / 2`, `std_dev = (max - min) / 4`; absent fields fall
/// back to the defaults in [`LaunchParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TossProfile {
    /// Upward launch speed range in m/s.
    pub linear_velocity_range: Option<[f64; 2]>,
    /// Spin magnitude range in rad/s.
    pub angular_velocity_range: Option<[f64; 2]>,
    /// Launch height range in meters.
    pub height_range: Option<[f64; 2]>,
}

/// Distribution parameters the sampler draws from, plus the fixed parts of
/// the launch state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParameters {
    pub impulse_mean: f64,
    pub impulse_std_dev: f64,
    pub spin_mean: f64,
    pub spin_std_dev: f64,
    /// Per-axis standard deviation of the spin-axis wobble.
    pub axis_wobble_std_dev: f64,
    /// The axis a perfect thumb-flick would spin around.
    pub ideal_spin_axis: Vec3,
    pub position: Vec3,
    pub orientation: Quaternion,
}

impl Default for LaunchParameters {
    fn default() -> Self {
        Self {
            impulse_mean: 5.0,
            impulse_std_dev: 0.5,
            spin_mean: 120.0,
            spin_std_dev: 20.0,
            axis_wobble_std_dev: 0.1,
            ideal_spin_axis: Vec3::RIGHT,
            position: Vec3::new(0.0, 1.0, 0.0),
            orientation: Quaternion::IDENTITY,
        }
    }
}

impl LaunchParameters {
    /// Resolves a toss profile against the defaults.
    ///
    /// The height range collapses to its midpoint: the launch position is
    /// copied into the initial state verbatim rather than sampled.
    pub fn from_profile(profile: &TossProfile) -> Self {
        let mut params = Self::default();
        if let Some([min, max]) = profile.linear_velocity_range {
            params.impulse_mean = (min + max) / 2.0;
            params.impulse_std_dev = (max - min) / 4.0;
        }
        if let Some([min, max]) = profile.angular_velocity_range {
            params.spin_mean = (min + max) / 2.0;
            params.spin_std_dev = (max - min) / 4.0;
        }
        if let Some([min, max]) = profile.height_range {
            params.position.y = (min + max) / 2.0;
        }
        params
    }
}

/// Contact material shared by every coin/ground collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactMaterial {
    /// Fraction of normal velocity retained after a bounce.
    pub restitution: f64,
    /// Coulomb friction coefficient.
    pub friction: f64,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.5,
            friction: 0.3,
        }
    }
}

/// Tuning for the inner simulation loop.
///
/// The default timestep of 100 µs (10 kHz) is what the collision tolerances
/// and the integrator error budget are calibrated for; change it only with
/// matching re-calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Fixed timestep in seconds.
    pub dt: f64,
    pub material: ContactMaterial,
    /// Velocity retention applied on contact steps near the ground; the
    /// energy sink that bounds settling time.
    pub near_ground_damping: f64,
    pub forces: ForceModel,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1e-4,
            material: ContactMaterial::default(),
            near_ground_damping: 0.8,
            forces: ForceModel::default(),
        }
    }
}

/// Options for [`flip_coin`](crate::flip_coin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipOptions {
    pub entropy_level: EntropyLevel,
    pub coin: CoinConfig,
    pub toss: TossProfile,
    pub sim: SimConfig,
    /// Wall-clock budget per attempt, milliseconds.
    pub timeout_ms: u64,
    /// How many times an edge landing is retried with fresh entropy.
    pub max_edge_retries: u32,
}

impl Default for FlipOptions {
    fn default() -> Self {
        Self {
            entropy_level: EntropyLevel::default(),
            coin: CoinConfig::default(),
            toss: TossProfile::default(),
            sim: SimConfig::default(),
            timeout_ms: 10_000,
            max_edge_retries: 5,
        }
    }
}
