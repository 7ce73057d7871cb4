//! Deterministic 64-bit mixing.
//!
//! Used wherever the engine needs repeatable pseudo-randomness keyed by an
//! input value (time buckets, stable synthetic ids). Output is fixed across
//! builds and platforms.

/// SplitMix64 finalizer.
pub fn mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Map a key to `[0, 1)` using the top 53 bits of its mix.
pub fn unit_interval(key: u64) -> f64 {
    (mix64(key) >> 11) as f64 / (1u64 << 53) as f64
}

/// Combine a seed with an index into a new well-mixed value.
pub fn hash_pair(seed: u64, index: u64) -> u64 {
    mix64(seed ^ mix64(index))
}
