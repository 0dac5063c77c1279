//! Randomness port used for reply selection and simulated latency.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws.
pub trait RandomSource: Send {
    /// Uniform index in `0..len`. Returns `0` when `len` is zero.
    fn index(&mut self, len: usize) -> usize;

    /// Uniform value in `low..=high`. Returns `low` when the range is empty.
    fn between_millis(&mut self, low: u64, high: u64) -> u64;
}

/// Adapter from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R> RngSource<R> {
    /// Wrap an existing generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Reproducible generator for tests and demos.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    fn between_millis(&mut self, low: u64, high: u64) -> u64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Replays a fixed script of draws.
///
/// Indices wrap modulo `len`; delays are clamped into the requested range.
/// Once a script runs dry it yields `0` and `low` respectively.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    indices: VecDeque<usize>,
    delays: VecDeque<u64>,
}

impl ScriptedRandom {
    /// Build a script from index and delay draws.
    #[must_use]
    pub fn new(
        indices: impl IntoIterator<Item = usize>,
        delays: impl IntoIterator<Item = u64>,
    ) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            delays: delays.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.indices.pop_front().map_or(0, |i| i % len)
    }

    fn between_millis(&mut self, low: u64, high: u64) -> u64 {
        self.delays
            .pop_front()
            .map_or(low, |d| d.clamp(low, high.max(low)))
    }
}
