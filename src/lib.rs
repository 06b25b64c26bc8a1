//! Physically-based coin flipping.
//!
//! Instead of reducing entropy to a single bit with arithmetic, this crate
//! spends it on the initial conditions of a deterministic 3D rigid-body
//! simulation: a disc is launched with an entropy-derived impulse and spin,
//! tumbles under gravity and drag through an RK4 integrator with full
//! gyroscopic dynamics, bounces on an infinite ground plane with restitution
//! and Coulomb friction, and is read out as heads or tails once it settles.
//!
//! The pipeline from source bytes to outcome is deterministic: the same seed
//! replays to the same trajectory, bounce count, and outcome within one
//! binary (no cross-machine float reproducibility is promised). Edge
//! landings are retried with fresh entropy and never surface from the public
//! entry point.
//!
//! # Example
//! ```
//! use tumblecoin::{flip_coin, FlipOptions, Outcome};
//!
//! let result = flip_coin(&FlipOptions::default()).unwrap();
//! match result.outcome {
//!     Outcome::Heads => println!("heads after {} bounces", result.stats.bounce_count),
//!     Outcome::Tails => println!("tails after {} bounces", result.stats.bounce_count),
//! }
//! ```
//!
//! Deterministic replay goes through [`debug_flip_coin`]:
//! ```
//! use tumblecoin::{debug_flip_coin, DebugFlipOptions};
//!
//! let first = debug_flip_coin(&DebugFlipOptions::default()).unwrap();
//! let replay = debug_flip_coin(&DebugFlipOptions {
//!     seed: Some(first.seed.clone()),
//!     ..DebugFlipOptions::default()
//! })
//! .unwrap();
//! assert_eq!(first.outcome, replay.outcome);
//! assert_eq!(first.stats.bounce_count, replay.stats.bounce_count);
//! ```

pub mod body;
pub mod collision;
pub mod config;
pub mod entropy;
pub mod error;
pub mod face;
pub mod flip;
pub mod forces;
pub mod integrator;
pub mod math;
pub mod sampler;
pub mod stability;

pub use body::{RigidBody, RigidBodyState};
pub use config::{CoinConfig, ContactMaterial, FlipOptions, SimConfig, TossProfile};
pub use entropy::{EntropyCollection, EntropyLevel, EntropyProvider, EntropyStats, OsEntropySource};
pub use error::FlipError;
pub use face::{Face, Outcome};
pub use flip::{
    debug_flip_coin, flip_coin, flip_coin_with, DebugFlipOptions, DebugFlipResult, FlipResult,
    FlipStats, InitialConditions,
};
pub use math::{Mat3, Quaternion, Vec3};
