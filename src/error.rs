use thiserror::Error;

/// Everything that can go wrong during a flip.
///
/// All variants are recoverable at the API boundary; the library never
/// panics on bad physical parameters or non-settling simulations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlipError {
    /// The coin's inertia tensor could not be inverted. Comes from
    /// non-positive or non-finite mass/geometry.
    #[error(
        "coin inertia tensor is singular (mass {mass} kg, radius {radius} m, thickness {thickness} m)"
    )]
    SingularInertia {
        mass: f64,
        radius: f64,
        thickness: f64,
    },

    /// The simulation did not settle before the wall-clock budget ran out.
    /// No outcome is guessed.
    #[error("simulation did not settle within {timeout_ms} ms (ran for {elapsed_ms} ms)")]
    SimulationTimeout { timeout_ms: u64, elapsed_ms: u64 },

    /// Every attempt in the retry budget landed on the coin's edge.
    #[error("coin landed on its edge through {max_retries} retries")]
    EdgeRetryExhausted { max_retries: u32 },

    /// The entropy collaborator failed; the kernel never fabricates
    /// randomness in its place.
    #[error("entropy collection failed: {0}")]
    EntropyCollectionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_carries_numbers() {
        let err = FlipError::SimulationTimeout {
            timeout_ms: 10_000,
            elapsed_ms: 10_204,
        };
        let msg = err.to_string();
        assert!(msg.contains("10000"));
        assert!(msg.contains("10204"));
    }

    #[test]
    fn test_edge_retry_message() {
        let err = FlipError::EdgeRetryExhausted { max_retries: 5 };
        assert!(err.to_string().contains('5'));
    }
}
