use core::f64::consts::TAU;

use rand::Rng;

use super::mixer::uniform_float;

/// Floor for the first Box–Muller uniform; keeps `ln` finite when the raw
/// draw is exactly zero.
const LN_GUARD: f64 = 1e-10;

/// Streaming consumer of an expanded entropy buffer.
///
/// `next_uniform` eats 4 bytes per call and `next_gaussian` eats 8. When the
/// buffer runs out the reader degrades to a non-deterministic uniform source;
/// that path is logged and flagged on the reader, because it silently breaks
/// replayability of whatever consumed it.
#[derive(Debug)]
pub struct EntropyReader {
    bytes: Vec<u8>,
    cursor: usize,
    exhausted: bool,
}

impl EntropyReader {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            cursor: 0,
            exhausted: false,
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_uniform(&mut self) -> f64 {
        match uniform_float(&self.bytes, self.cursor) {
            Some(value) => {
                self.cursor += 4;
                value
            }
            None => {
                if !self.exhausted {
                    self.exhausted = true;
                    log::warn!(
                        "entropy buffer exhausted after {} bytes; falling back to thread RNG",
                        self.cursor
                    );
                }
                rand::thread_rng().gen::<u32>() as f64 / (u32::MAX as f64 + 1.0)
            }
        }
    }

    /// Normal draw via Box–Muller, consuming two uniforms.
    pub fn next_gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_uniform().max(LN_GUARD);
        let u2 = self.next_uniform();
        let z0 = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mean + std_dev * z0
    }

    /// Bytes consumed from the deterministic buffer so far.
    pub fn bytes_consumed(&self) -> usize {
        self.cursor
    }

    /// Whether the reader has fallen back to the non-deterministic source.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::mixer::{expand, mix};

    fn reader_from(label: &[u8], len: usize) -> EntropyReader {
        EntropyReader::new(expand(&mix(&[label]), len))
    }

    #[test]
    fn test_uniform_consumes_four_bytes() {
        let mut reader = reader_from(b"cursor", 16);
        reader.next_uniform();
        assert_eq!(reader.bytes_consumed(), 4);
        reader.next_uniform();
        assert_eq!(reader.bytes_consumed(), 8);
    }

    #[test]
    fn test_uniform_in_unit_interval() {
        let mut reader = reader_from(b"interval", 400);
        for _ in 0..100 {
            let u = reader.next_uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_same_bytes_same_stream() {
        let mut a = reader_from(b"replay", 64);
        let mut b = reader_from(b"replay", 64);
        for _ in 0..8 {
            assert_eq!(a.next_uniform().to_bits(), b.next_uniform().to_bits());
        }
    }

    #[test]
    fn test_gaussian_consumes_eight_bytes() {
        let mut reader = reader_from(b"gauss", 32);
        reader.next_gaussian(0.0, 1.0);
        assert_eq!(reader.bytes_consumed(), 8);
    }

    #[test]
    fn test_gaussian_location_and_spread() {
        let mut reader = reader_from(b"moments", 8000);
        let n = 1000;
        let (mut sum, mut sum_sq) = (0.0, 0.0);
        for _ in 0..n {
            let x = reader.next_gaussian(5.0, 0.5);
            sum += x;
            sum_sq += x * x;
        }
        let mean = sum / n as f64;
        let var = sum_sq / n as f64 - mean * mean;
        // Loose bounds; this is a sanity check, not a distribution test.
        assert!((mean - 5.0).abs() < 0.1, "mean {mean}");
        assert!((var.sqrt() - 0.5).abs() < 0.1, "std dev {}", var.sqrt());
    }

    #[test]
    fn test_gaussian_is_finite_for_zero_uniform() {
        // A zero first uniform would send ln to -inf without the guard.
        let mut reader = EntropyReader::new(vec![0u8; 8]);
        let x = reader.next_gaussian(0.0, 1.0);
        assert!(x.is_finite());
    }

    #[test]
    fn test_exhaustion_falls_back_and_flags() {
        let mut reader = EntropyReader::new(vec![7u8; 6]);
        let first = reader.next_uniform();
        assert!(!reader.is_exhausted());
        assert!((0.0..1.0).contains(&first));

        // Only 2 bytes left: fallback kicks in but still yields a uniform.
        let second = reader.next_uniform();
        assert!(reader.is_exhausted());
        assert!((0.0..1.0).contains(&second));
        // The deterministic cursor stops advancing once exhausted.
        assert_eq!(reader.bytes_consumed(), 4);
    }
}
