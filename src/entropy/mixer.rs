use sha2::{Digest, Sha256};

/// Longest byte stream [`expand`] can produce: the block counter is a single
/// byte, so 256 blocks of 32 bytes each.
pub const MAX_EXPANDED_LEN: usize = 8192;

/// Hashes an ordered list of byte buffers into a 32-byte seed.
///
/// The buffers are concatenated in order before hashing, so the result is
/// order-sensitive. An empty input list produces an empty output rather than
/// the hash of the empty string: no sources means no seed.
pub fn mix(inputs: &[&[u8]]) -> Vec<u8> {
    if inputs.is_empty() {
        return Vec::new();
    }
    let mut hasher = Sha256::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize().to_vec()
}

/// Stretches a seed into `len` bytes of uniformly distributed output.
///
/// Output is the truncated concatenation of `SHA-256(seed ‖ counter)` blocks
/// with a single-byte counter, so identical seeds always expand identically
/// and even heavily biased seeds produce uniform output.
///
/// # Panics
/// Panics if `len` exceeds [`MAX_EXPANDED_LEN`].
pub fn expand(seed: &[u8], len: usize) -> Vec<u8> {
    assert!(
        len <= MAX_EXPANDED_LEN,
        "expand length {len} exceeds maximum {MAX_EXPANDED_LEN}"
    );
    let mut out = Vec::with_capacity(len);
    let mut counter = 0u8;
    while out.len() < len {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update([counter]);
        let block = hasher.finalize();
        let take = (len - out.len()).min(block.len());
        out.extend_from_slice(&block[..take]);
        counter = counter.wrapping_add(1);
    }
    out
}

/// Reads 4 bytes at `offset` as a little-endian u32 and maps it to
/// `[0, 1 - 2^-32]`. Returns `None` when fewer than 4 bytes remain.
pub fn uniform_float(bytes: &[u8], offset: usize) -> Option<f64> {
    let chunk = bytes.get(offset..offset + 4)?;
    let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    Some(raw as f64 / (u32::MAX as f64 + 1.0))
}

/// Uniform value in `[min, max)` from the 4 bytes at `offset`.
pub fn uniform_in_range(bytes: &[u8], offset: usize, min: f64, max: f64) -> Option<f64> {
    uniform_float(bytes, offset).map(|u| min + (max - min) * u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_empty_list_is_empty() {
        assert!(mix(&[]).is_empty());
    }

    #[test]
    fn test_mix_is_deterministic() {
        let a = mix(&[b"hello", b"world"]);
        let b = mix(&[b"hello", b"world"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_mix_is_order_sensitive() {
        assert_ne!(mix(&[b"hello", b"world"]), mix(&[b"world", b"hello"]));
    }

    #[test]
    fn test_mix_single_empty_buffer_still_hashes() {
        // A list containing one empty buffer is not an empty list.
        let out = mix(&[b""]);
        assert_eq!(out.len(), 32);
    }

    #[test]
    fn test_mix_avalanche() {
        // Flipping one input bit changes at least 24 of the
        // 32 output bytes.
        let base = [0x42u8; 16];
        let mut flipped = base;
        flipped[7] ^= 0x01;

        let out_a = mix(&[&base]);
        let out_b = mix(&[&flipped]);
        let differing = out_a.iter().zip(&out_b).filter(|(a, b)| a != b).count();
        assert!(differing >= 24, "only {differing} bytes differ");
    }

    #[test]
    fn test_expand_is_deterministic() {
        let seed = mix(&[b"seed material"]);
        assert_eq!(expand(&seed, 512), expand(&seed, 512));
    }

    #[test]
    fn test_expand_prefix_stability() {
        let seed = mix(&[b"seed material"]);
        let long = expand(&seed, 256);
        let short = expand(&seed, 100);
        assert_eq!(&long[..100], &short[..]);
    }

    #[test]
    fn test_expand_biased_seed_is_uniform() {
        // An all-zero seed still expands to uniform bytes.
        let seed = [0u8; 32];
        let out = expand(&seed, 256);
        assert_eq!(out.len(), 256);

        let mut seen = [false; 256];
        for &b in &out {
            seen[b as usize] = true;
        }
        let distinct = seen.iter().filter(|&&s| s).count();
        assert!(distinct >= 100, "only {distinct} distinct byte values");

        let ones: u32 = out.iter().map(|b| b.count_ones()).sum();
        let fraction = ones as f64 / (out.len() as f64 * 8.0);
        assert!((0.4..=0.6).contains(&fraction), "one-bit fraction {fraction}");
    }

    #[test]
    fn test_expand_max_len() {
        let out = expand(&[1u8; 32], MAX_EXPANDED_LEN);
        assert_eq!(out.len(), MAX_EXPANDED_LEN);
    }

    #[test]
    #[should_panic]
    fn test_expand_over_max_panics() {
        expand(&[0u8; 32], MAX_EXPANDED_LEN + 1);
    }

    #[test]
    fn test_uniform_float_bounds() {
        // The result is in [0, 1 - 2^-32] for any input.
        assert_eq!(uniform_float(&[0, 0, 0, 0], 0), Some(0.0));
        let max = uniform_float(&[0xFF, 0xFF, 0xFF, 0xFF], 0).unwrap();
        assert!(max < 1.0);
        assert!((max - (1.0 - 2f64.powi(-32))).abs() < 1e-15);
    }

    #[test]
    fn test_uniform_float_little_endian() {
        // 0x00000001 little-endian is the byte sequence [1, 0, 0, 0].
        let v = uniform_float(&[1, 0, 0, 0], 0).unwrap();
        assert!((v - 1.0 / 2f64.powi(32)).abs() < 1e-18);
    }

    #[test]
    fn test_uniform_float_shortfall_is_none() {
        assert_eq!(uniform_float(&[1, 2, 3], 0), None);
        assert_eq!(uniform_float(&[1, 2, 3, 4, 5], 2), None);
    }

    #[test]
    fn test_uniform_in_range() {
        let lo = uniform_in_range(&[0, 0, 0, 0], 0, -2.0, 6.0).unwrap();
        assert_eq!(lo, -2.0);
        let hi = uniform_in_range(&[0xFF, 0xFF, 0xFF, 0xFF], 0, -2.0, 6.0).unwrap();
        assert!(hi < 6.0);
        assert!(hi > 5.999);
    }
}
