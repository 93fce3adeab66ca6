//! Deterministic per-traveller RNG wrapper.
//!
//! # Determinism strategy
//!
//! Each traveller gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (traveller_index * MIXING_CONSTANT)
//!
//! where `traveller_index` is the position in generation order.  The mixing
//! constant is the 64-bit fractional part of the golden ratio.  As a result
//! the itineraries of traveller *k* depend only on the seed and *k*, never on
//! how many travellers were generated before it or on which thread did the
//! work.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Draw a seed from OS entropy.  Used when a run is not given one.
pub fn fresh_seed() -> u64 {
    rand::random()
}

// ── TravellerRng ──────────────────────────────────────────────────────────────

/// Per-traveller deterministic RNG.
///
/// The type is `!Sync`; under the `parallel` feature each Rayon task builds
/// its own from the traveller index.
pub struct TravellerRng(SmallRng);

impl TravellerRng {
    /// Seed deterministically from the run's global seed and a traveller's
    /// global generation index.
    pub fn new(global_seed: u64, index: u64) -> Self {
        let seed = global_seed ^ index.wrapping_mul(MIXING_CONSTANT);
        TravellerRng(SmallRng::seed_from_u64(seed))
    }

    /// Sample `Normal(mean, std_dev)`.  A `std_dev` that is not finite and
    /// positive degenerates to the mean.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        if !(std_dev.is_finite() && std_dev > 0.0) {
            return mean;
        }
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.0),
            Err(_) => mean,
        }
    }

    /// Uniform real in `[low, high)`.  Returns `low` for an empty interval.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high > low {
            self.0.gen_range(low..high)
        } else {
            low
        }
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
