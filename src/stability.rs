use serde::{Deserialize, Serialize};

use crate::body::RigidBody;

/// Thresholds deciding when the coin has come to rest.
///
/// A step is stable when the body is slow, barely spinning, and grounded.
/// Grounded means two things at once: the center of mass is inside the
/// near-ground band, and the lower face is almost touching the plane. The
/// second clause rejects the slow instants at the apex of a low bounce and
/// at the top of the flight, where velocity alone looks settled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilitySettings {
    /// m/s.
    pub max_linear_speed: f64,
    /// rad/s.
    pub max_angular_speed: f64,
    /// Center-of-mass height band, meters.
    pub ground_band: f64,
    /// Maximum lower-face clearance above the plane, meters.
    pub ground_clearance: f64,
    /// Consecutive stable steps before settlement is declared.
    pub required_steps: u32,
}

impl Default for StabilitySettings {
    fn default() -> Self {
        Self {
            max_linear_speed: 0.01,
            max_angular_speed: 0.1,
            ground_band: 0.01,
            ground_clearance: 5e-4,
            required_steps: 10,
        }
    }
}

impl StabilitySettings {
    /// Settings sized for a specific coin.
    ///
    /// The band scales as `max(0.01, 2·radius)` so that an oversized coin
    /// whose resting center sits above the stock band can still settle.
    pub fn for_coin(radius: f64) -> Self {
        Self {
            ground_band: (2.0 * radius).max(0.01),
            ..Self::default()
        }
    }
}

/// Counts consecutive stable steps; settlement needs an unbroken run.
#[derive(Debug, Clone)]
pub struct StabilityDetector {
    settings: StabilitySettings,
    consecutive: u32,
}

impl StabilityDetector {
    pub fn new(settings: StabilitySettings) -> Self {
        Self {
            settings,
            consecutive: 0,
        }
    }

    /// Whether a single state passes the thresholds.
    pub fn is_stable(&self, body: &RigidBody) -> bool {
        body.state.linear_velocity.magnitude() <= self.settings.max_linear_speed
            && body.state.angular_velocity.magnitude() <= self.settings.max_angular_speed
            && body.state.position.y < self.settings.ground_band
            && body.lower_face_center().y <= self.settings.ground_clearance
    }

    /// Feeds one step's end state; returns true once the coin has been
    /// stable for the required run of steps.
    pub fn observe(&mut self, body: &RigidBody) -> bool {
        if self.is_stable(body) {
            self.consecutive += 1;
        } else {
            self.consecutive = 0;
        }
        self.consecutive >= self.settings.required_steps
    }

    pub fn reset(&mut self) {
        self.consecutive = 0;
    }

    pub fn consecutive_stable_steps(&self) -> u32 {
        self.consecutive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RigidBodyState;
    use crate::config::CoinConfig;
    use crate::math::Vec3;

    fn resting_body() -> RigidBody {
        let state = RigidBodyState {
            position: Vec3::new(0.0, 0.00175 / 2.0, 0.0),
            ..RigidBodyState::default()
        };
        RigidBody::new(state, &CoinConfig::default()).unwrap()
    }

    #[test]
    fn test_band_scales_with_radius() {
        assert_eq!(StabilitySettings::for_coin(0.001).ground_band, 0.01);
        assert_eq!(StabilitySettings::for_coin(0.05).ground_band, 0.1);
    }

    #[test]
    fn test_resting_coin_is_stable() {
        let detector = StabilityDetector::new(StabilitySettings::default());
        assert!(detector.is_stable(&resting_body()));
    }

    #[test]
    fn test_fast_coin_is_not_stable() {
        let detector = StabilityDetector::new(StabilitySettings::default());
        let mut body = resting_body();
        body.state.linear_velocity = Vec3::new(0.0, -0.02, 0.0);
        assert!(!detector.is_stable(&body));
    }

    #[test]
    fn test_spinning_coin_is_not_stable() {
        let detector = StabilityDetector::new(StabilitySettings::default());
        let mut body = resting_body();
        body.state.angular_velocity = Vec3::new(0.0, 0.2, 0.0);
        assert!(!detector.is_stable(&body));
    }

    #[test]
    fn test_slow_coin_at_apex_is_not_stable() {
        // Linear velocity nulls at the top of the flight; height must veto.
        let detector = StabilityDetector::new(StabilitySettings::default());
        let mut body = resting_body();
        body.state.position.y = 1.5;
        assert!(!detector.is_stable(&body));
    }

    #[test]
    fn test_slow_coin_hovering_in_band_is_not_stable() {
        // Inside the band but several millimeters off the plane: the
        // clearance clause keeps a low bounce apex from counting as rest.
        let detector = StabilityDetector::new(StabilitySettings::default());
        let mut body = resting_body();
        body.state.position.y = 0.005;
        assert!(!detector.is_stable(&body));
    }

    #[test]
    fn test_settlement_needs_consecutive_run() {
        let mut detector = StabilityDetector::new(StabilitySettings::default());
        let body = resting_body();
        for step in 1..10 {
            assert!(!detector.observe(&body), "settled too early at {step}");
        }
        assert!(detector.observe(&body));
    }

    #[test]
    fn test_unstable_step_resets_run() {
        let mut detector = StabilityDetector::new(StabilitySettings::default());
        let resting = resting_body();
        let mut moving = resting_body();
        moving.state.linear_velocity = Vec3::new(0.0, -1.0, 0.0);

        for _ in 0..9 {
            detector.observe(&resting);
        }
        assert!(!detector.observe(&moving));
        assert_eq!(detector.consecutive_stable_steps(), 0);
        for _ in 0..9 {
            assert!(!detector.observe(&resting));
        }
        assert!(detector.observe(&resting));
    }
}
