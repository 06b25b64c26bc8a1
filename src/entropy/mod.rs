//! Deterministic entropy pipeline.
//!
//! Raw bytes from an entropy collaborator are mixed into a 32-byte seed,
//! stretched into a reproducible byte stream, and consumed as uniform floats
//! and gaussians by the initial-condition sampler. Given the same source
//! bytes the whole pipeline replays bit-for-bit.

mod mixer;
mod reader;
mod source;

pub use mixer::{expand, mix, uniform_float, uniform_in_range, MAX_EXPANDED_LEN};
pub use reader::EntropyReader;
pub use source::{EntropyCollection, EntropyLevel, EntropyProvider, EntropyStats, OsEntropySource};
