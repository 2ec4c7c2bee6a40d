//! Deterministic RNG utilities for reproducible tests.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded `ChaCha8Rng`. Randomized tests draw from this so a failing seed
/// replays exactly.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draw `dof` random DH records as `[d, r, theta, alpha]`.
///
/// Lengths are in `[-0.3, 0.3)` and angles in `[-pi, pi)`, roughly the scale
/// of a walking robot's limb.
pub fn random_dh_values(rng: &mut impl Rng, dof: usize) -> Vec<[f64; 4]> {
    (0..dof)
        .map(|_| {
            [
                rng.gen_range(-0.3..0.3),
                rng.gen_range(-0.3..0.3),
                rng.gen_range(-PI..PI),
                rng.gen_range(-PI..PI),
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
