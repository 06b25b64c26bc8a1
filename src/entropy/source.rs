use std::time::Instant;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::FlipError;

/// How much raw entropy to gather before a flip.
///
/// Higher levels ask the collaborator for more source bytes; the mixer
/// condenses whatever arrives into a single seed either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EntropyLevel {
    Fast,
    #[default]
    Standard,
    High,
    Paranoid,
}

impl EntropyLevel {
    /// Byte budget requested from the collaborator at this level.
    pub fn target_bytes(self) -> usize {
        match self {
            EntropyLevel::Fast => 16,
            EntropyLevel::Standard => 32,
            EntropyLevel::High => 64,
            EntropyLevel::Paranoid => 128,
        }
    }
}

/// Bookkeeping returned by a collaborator alongside the raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntropyStats {
    pub total_bits: u64,
    pub collection_time_ms: u64,
    pub sources_used: Vec<String>,
    pub level: EntropyLevel,
}

/// Raw entropy handed to the kernel by a collaborator.
#[derive(Debug, Clone)]
pub struct EntropyCollection {
    pub bytes: Vec<u8>,
    pub stats: EntropyStats,
}

/// External entropy collaborator.
///
/// The kernel only reads `bytes` and records `total_bits`/`level` into its
/// own stats; it never inspects the collection mechanism, and it accepts
/// collections shorter than the level's target without complaint (the
/// reader's fallback covers the shortfall). This trait call is the only
/// point between simulation attempts where the caller regains control, so
/// implementations are free to block, poll hardware, or bridge to an async
/// runtime.
pub trait EntropyProvider {
    fn collect(&mut self, level: EntropyLevel) -> Result<EntropyCollection, FlipError>;
}

/// Default collaborator: the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropySource;

impl EntropyProvider for OsEntropySource {
    fn collect(&mut self, level: EntropyLevel) -> Result<EntropyCollection, FlipError> {
        let started = Instant::now();
        let mut bytes = vec![0u8; level.target_bytes()];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| FlipError::EntropyCollectionFailed(e.to_string()))?;
        let stats = EntropyStats {
            total_bits: bytes.len() as u64 * 8,
            collection_time_ms: started.elapsed().as_millis() as u64,
            sources_used: vec!["os-csprng".to_string()],
            level,
        };
        Ok(EntropyCollection { bytes, stats })
    }
}
