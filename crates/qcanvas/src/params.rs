//! Seeded rotation-angle sampling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

use crate::error::CanvasResult;
use crate::seed::derive_seed;

/// Draw `count` angles uniformly from `[0, 2π)`.
///
/// ChaCha8 is stable across platforms, so a seed always yields the same
/// sequence.
pub fn sample_parameters(seed: u32, count: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
    (0..count).map(|_| rng.gen_range(0.0..TAU)).collect()
}

/// Seed and angles for a name in one step.
pub fn derive_parameters(name: &str, count: usize) -> CanvasResult<(u32, Vec<f64>)> {
    let seed = derive_seed(name)?;
    Ok((seed, sample_parameters(seed, count)))
}
