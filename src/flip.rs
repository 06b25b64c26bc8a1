//! The flip controller: entropy in, `Heads` or `Tails` out.
//!
//! Each attempt turns collaborator bytes into a seed, expands the seed into
//! a deterministic stream, samples a launch state, and steps the simulation
//! at a fixed 10 kHz until the coin settles. Edge landings retry with fresh
//! entropy; attempts that refuse to settle inside the wall-clock budget
//! fail rather than guess.

use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::body::{RigidBody, RigidBodyState};
use crate::collision::{detect_ground_contact, resolve_ground_contact};
use crate::config::{FlipOptions, LaunchParameters};
use crate::entropy::{expand, mix, EntropyProvider, EntropyReader, OsEntropySource};
use crate::error::FlipError;
use crate::face::{self, Face, Outcome};
use crate::integrator::integrate;
use crate::math::{Quaternion, Vec3};
use crate::sampler::sample_initial_state;
use crate::stability::{StabilityDetector, StabilitySettings};

/// Expanded entropy prepared per attempt; the sampler consumes 40 bytes.
const EXPANDED_BYTES: usize = 64;

/// Accounting for a completed flip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipStats {
    /// Simulated time of the settling attempt in milliseconds
    /// (steps × dt; the wall clock only bounds the loop).
    pub simulation_time_ms: f64,
    /// Raw bits reported by the collaborator, summed over all attempts.
    pub entropy_bits_used: u64,
    /// Steps of the settling attempt that carried a ground contact.
    pub bounce_count: u32,
    /// How many earlier attempts landed on the edge.
    pub retry_count: u32,
}

/// A completed flip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipResult {
    pub outcome: Outcome,
    pub stats: FlipStats,
}

/// Per-field overrides for the sampled launch state, debug only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InitialConditions {
    pub position: Option<Vec3>,
    pub orientation: Option<Quaternion>,
    pub linear_velocity: Option<Vec3>,
    pub angular_velocity: Option<Vec3>,
}

impl InitialConditions {
    fn apply(&self, state: &mut RigidBodyState) {
        if let Some(position) = self.position {
            state.position = position;
        }
        if let Some(orientation) = self.orientation {
            state.orientation = orientation.normalize();
        }
        if let Some(linear_velocity) = self.linear_velocity {
            state.linear_velocity = linear_velocity;
        }
        if let Some(angular_velocity) = self.angular_velocity {
            state.angular_velocity = angular_velocity;
        }
    }
}

/// Options for [`debug_flip_coin`].
#[derive(Debug, Clone, Default)]
pub struct DebugFlipOptions {
    pub options: FlipOptions,
    /// When present, bypasses the entropy collaborator and feeds these
    /// bytes straight into the mixer. Capturing the seed of one run and
    /// passing it back replays that run exactly.
    pub seed: Option<Vec<u8>>,
    pub initial_conditions: Option<InitialConditions>,
    /// Record a state snapshot at every integrator step.
    pub record_trajectory: bool,
}

/// Result of a debug flip, with everything needed to reproduce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugFlipResult {
    pub outcome: Outcome,
    pub stats: FlipStats,
    /// The bytes that were mixed into this run's seed.
    pub seed: Vec<u8>,
    /// Launch state after sampling and overrides.
    pub initial_conditions: RigidBodyState,
    pub final_state: RigidBodyState,
    pub trajectory: Option<Vec<RigidBodyState>>,
}

/// Flips a coin using the operating system's CSPRNG as the entropy
/// collaborator.
///
/// # Example
/// ```
/// use tumblecoin::{flip_coin, FlipOptions, Outcome};
///
/// let result = flip_coin(&FlipOptions::default()).unwrap();
/// assert!(matches!(result.outcome, Outcome::Heads | Outcome::Tails));
/// assert!(result.stats.entropy_bits_used >= 256);
/// ```
pub fn flip_coin(options: &FlipOptions) -> Result<FlipResult, FlipError> {
    flip_coin_with(&mut OsEntropySource, options)
}

/// Flips a coin with a caller-supplied entropy collaborator.
///
/// The provider is consulted once per attempt, so edge retries always run
/// on fresh entropy. This call is also the only point where control leaves
/// the kernel mid-flip; the inner simulation loop is pure computation.
pub fn flip_coin_with<P: EntropyProvider>(
    provider: &mut P,
    options: &FlipOptions,
) -> Result<FlipResult, FlipError> {
    let launch = LaunchParameters::from_profile(&options.toss);
    run_retry_loop(provider, options, |seed| {
        run_attempt(seed, None, options, &launch, false)
    })
}

/// The edge-retry loop around a per-attempt runner.
///
/// Collects fresh entropy for every attempt, mixes it into a seed, and hands
/// the seed to `attempt`. An edge landing consumes one unit of the retry
/// budget; anything else returns. The runner is a parameter so the loop's
/// retry and exhaustion behavior can be exercised against scripted landings.
fn run_retry_loop<P: EntropyProvider>(
    provider: &mut P,
    options: &FlipOptions,
    mut attempt: impl FnMut(&[u8]) -> Result<AttemptRecord, FlipError>,
) -> Result<FlipResult, FlipError> {
    let mut entropy_bits_used = 0u64;

    for attempt_index in 0..=options.max_edge_retries {
        let collection = provider.collect(options.entropy_level)?;
        entropy_bits_used += collection.stats.total_bits;
        let seed = mix(&[&collection.bytes]);

        let record = attempt(&seed)?;
        match record.face.to_outcome() {
            Some(outcome) => {
                debug!(
                    "settled {outcome:?} after {} bounces on attempt {attempt_index}",
                    record.bounce_count
                );
                return Ok(FlipResult {
                    outcome,
                    stats: FlipStats {
                        simulation_time_ms: record.simulation_time_ms,
                        entropy_bits_used,
                        bounce_count: record.bounce_count,
                        retry_count: attempt_index,
                    },
                });
            }
            None => {
                debug!("attempt {attempt_index} landed on edge, retrying with fresh entropy")
            }
        }
    }

    Err(FlipError::EdgeRetryExhausted {
        max_retries: options.max_edge_retries,
    })
}

/// Deterministic flip entry for testing and diagnostics.
///
/// Differences from [`flip_coin`]: an explicit seed bypasses the
/// collaborator, sampled initial conditions can be overridden field by
/// field, the full trajectory can be recorded, and an edge landing is an
/// error (`EdgeRetryExhausted { max_retries: 0 }`) instead of a retry.
pub fn debug_flip_coin(debug_options: &DebugFlipOptions) -> Result<DebugFlipResult, FlipError> {
    let options = &debug_options.options;
    let launch = LaunchParameters::from_profile(&options.toss);

    let (source_bytes, entropy_bits_used) = match &debug_options.seed {
        Some(seed) => (seed.clone(), seed.len() as u64 * 8),
        None => {
            let collection = OsEntropySource.collect(options.entropy_level)?;
            (collection.bytes, collection.stats.total_bits)
        }
    };
    let seed = mix(&[&source_bytes]);

    let record = run_attempt(
        &seed,
        debug_options.initial_conditions.as_ref(),
        options,
        &launch,
        debug_options.record_trajectory,
    )?;

    match record.face.to_outcome() {
        Some(outcome) => Ok(DebugFlipResult {
            outcome,
            stats: FlipStats {
                simulation_time_ms: record.simulation_time_ms,
                entropy_bits_used,
                bounce_count: record.bounce_count,
                retry_count: 0,
            },
            seed: source_bytes,
            initial_conditions: record.initial_conditions,
            final_state: record.final_state,
            trajectory: record.trajectory,
        }),
        None => Err(FlipError::EdgeRetryExhausted { max_retries: 0 }),
    }
}

struct AttemptRecord {
    face: Face,
    initial_conditions: RigidBodyState,
    final_state: RigidBodyState,
    simulation_time_ms: f64,
    bounce_count: u32,
    trajectory: Option<Vec<RigidBodyState>>,
}

/// Runs one attempt to settlement or wall-clock exhaustion.
fn run_attempt(
    seed: &[u8],
    overrides: Option<&InitialConditions>,
    options: &FlipOptions,
    launch: &LaunchParameters,
    record_trajectory: bool,
) -> Result<AttemptRecord, FlipError> {
    let mut reader = EntropyReader::new(expand(seed, EXPANDED_BYTES));
    let mut initial = sample_initial_state(&mut reader, launch);
    if let Some(overrides) = overrides {
        overrides.apply(&mut initial);
    }

    let mut body = RigidBody::new(initial, &options.coin)?;
    let mut detector = StabilityDetector::new(StabilitySettings::for_coin(options.coin.radius));
    let sim = &options.sim;

    let mut bounce_count = 0u32;
    let mut steps = 0u64;
    let mut trajectory = record_trajectory.then(Vec::new);
    let mut settled = false;
    let started = Instant::now();

    while (started.elapsed().as_millis() as u64) < options.timeout_ms {
        integrate(&mut body, sim.dt, &sim.forces);
        steps += 1;

        if let Some(contact) = detect_ground_contact(&body) {
            resolve_ground_contact(&mut body, &contact, &sim.material);
            bounce_count += 1;
            // Contact-coupled energy sink: while the coin is working along
            // the ground, bleed off velocity so settling time stays bounded
            // no matter how energetic the throw was.
            if body.state.position.y < options.coin.radius {
                body.state.linear_velocity =
                    body.state.linear_velocity * sim.near_ground_damping;
                body.state.angular_velocity =
                    body.state.angular_velocity * sim.near_ground_damping;
            }
        }

        if let Some(trajectory) = trajectory.as_mut() {
            trajectory.push(body.state);
        }

        if detector.observe(&body) {
            settled = true;
            break;
        }
    }

    if !settled {
        return Err(FlipError::SimulationTimeout {
            timeout_ms: options.timeout_ms,
            elapsed_ms: started.elapsed().as_millis() as u64,
        });
    }

    Ok(AttemptRecord {
        face: face::evaluate(body.state.orientation),
        initial_conditions: initial,
        final_state: body.state,
        simulation_time_ms: steps as f64 * sim.dt * 1000.0,
        bounce_count,
        trajectory,
    })
}
