#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pseudorandom source abstraction and the distribution samplers built on it.
//!
//! Every stochastic draw in the engine flows through one [`UniformSource`]
//! owned by the run, so a seeded source replays the exact trajectory and the
//! call order fixed by the pipeline is the only thing that matters for
//! reproducibility.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Capability producing uniform values in the half-open interval `[0, 1)`.
pub trait UniformSource {
    /// Returns the next uniform value, advancing the internal state.
    fn next_unit(&mut self) -> f64;
}

/// Seed of the reference congruential generator.
pub const REFERENCE_SEED: u64 = 1_317;
/// Multiplier of the reference congruential generator.
pub const REFERENCE_MULTIPLIER: u64 = 5_631;
/// Modulus of the reference congruential generator.
pub const REFERENCE_MODULUS: u64 = 547;

/// Multiplicative congruential generator kept bit-compatible with the
/// original classroom generator.
///
/// The state advances as `state = multiplier * state mod modulus`; a zero
/// state reseeds to the initial seed. Returned units are rounded to three
/// decimals, the precision the original generator emitted, so golden values
/// carry over unchanged. Statistical quality is poor; use [`ChaChaSource`]
/// outside of regression tests.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
    seed: u64,
    multiplier: u64,
    modulus: u64,
}

impl Lcg {
    /// Creates a generator from explicit parameters.
    ///
    /// # Panics
    ///
    /// Panics when `modulus` is not greater than one or when the seed is
    /// congruent to zero, either of which would make every draw collapse.
    #[must_use]
    pub fn new(seed: u64, multiplier: u64, modulus: u64) -> Self {
        assert!(modulus > 1, "congruential modulus must exceed one");
        assert!(
            seed % modulus != 0,
            "congruential seed must not be a multiple of the modulus"
        );
        Self {
            state: seed % modulus,
            seed: seed % modulus,
            multiplier,
            modulus,
        }
    }

    /// Creates the generator with the reference parameters used by the
    /// golden regression tests.
    #[must_use]
    pub fn with_reference_parameters() -> Self {
        Self::new(REFERENCE_SEED, REFERENCE_MULTIPLIER, REFERENCE_MODULUS)
    }
}

impl UniformSource for Lcg {
    fn next_unit(&mut self) -> f64 {
        self.state = self.multiplier.wrapping_mul(self.state) % self.modulus;
        if self.state == 0 {
            self.state = self.seed;
        }
        let unit = self.state as f64 / self.modulus as f64;
        (unit * 1_000.0).round() / 1_000.0
    }
}

/// Production source backed by `ChaCha8`, seedable for reproducible runs.
#[derive(Clone, Debug)]
pub struct ChaChaSource {
    rng: ChaCha8Rng,
}

impl ChaChaSource {
    /// Creates a source replaying deterministically from the provided seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl UniformSource for ChaChaSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Reasons a sampler rejects its inputs.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SampleError {
    /// The uniform bounds were inverted.
    #[error("uniform bounds are inverted: {min} > {max}")]
    InvertedUniformRange {
        /// Lower bound that was requested.
        min: f64,
        /// Upper bound that was requested.
        max: f64,
    },
}

/// Distribution samplers composed over a single owned [`UniformSource`].
#[derive(Clone, Debug)]
pub struct Samplers<S> {
    source: S,
}

impl<S: UniformSource> Samplers<S> {
    /// Creates the sampler set over the provided source.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the next raw unit draw from the underlying source.
    pub fn unit(&mut self) -> f64 {
        self.source.next_unit()
    }

    /// Draws from `Uniform(min, max)`.
    ///
    /// `min == max` still consumes one draw and returns `min`, keeping the
    /// draw sequence identical across degenerate and regular ranges.
    pub fn uniform(&mut self, min: f64, max: f64) -> Result<f64, SampleError> {
        if min > max {
            return Err(SampleError::InvertedUniformRange { min, max });
        }
        Ok(min + (max - min) * self.unit())
    }

    /// Draws from `Normal(mean, deviation)` via the Irwin-Hall sum of
    /// twelve uniforms.
    ///
    /// A zero deviation returns the mean without consuming any draws. The
    /// approximation never strays beyond six deviations from the mean.
    pub fn normal(&mut self, mean: f64, deviation: f64) -> f64 {
        if deviation == 0.0 {
            return mean;
        }
        let mut sum = 0.0;
        for _ in 0..12 {
            sum += self.unit();
        }
        deviation * (sum - 6.0) + mean
    }

    /// Draws from `Poisson(lambda)` with Knuth's multiplicative algorithm.
    ///
    /// A non-positive lambda returns zero without consuming any draws; the
    /// general loop would never terminate there since `exp(0) = 1`.
    pub fn poisson(&mut self, lambda: f64) -> u64 {
        if lambda <= 0.0 {
            return 0;
        }
        let threshold = (-lambda).exp();
        let mut product = 1.0;
        let mut draws = 0u64;
        loop {
            draws += 1;
            product *= self.unit();
            if product <= threshold {
                break;
            }
        }
        draws - 1
    }

    /// Draws from an exponential distribution with the provided mean via
    /// the inverse CDF, clamping the unit draw away from zero so the
    /// logarithm stays finite.
    pub fn exponential(&mut self, mean: f64) -> f64 {
        let unit = self.unit().max(f64::MIN_POSITIVE);
        -mean * unit.ln()
    }
}
