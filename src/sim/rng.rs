//! Random number sources for the simulation
//!
//! Gameplay never touches a global RNG. Everything random (run lengths,
//! diamond spawns) goes through `RandomSource`, so tests can script the
//! exact draws.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Injectable source of random integers
pub trait RandomSource {
    /// Uniform integer in the inclusive range `lo..=hi`
    fn next_in_range(&mut self, lo: u32, hi: u32) -> u32;
}

/// Seeded PCG source used in real runs
#[derive(Debug, Clone)]
pub struct PcgSource {
    rng: Pcg32,
}

impl PcgSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for PcgSource {
    fn next_in_range(&mut self, lo: u32, hi: u32) -> u32 {
        if lo >= hi {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }
}

/// Replays a fixed sequence of draws, clamped into the requested range.
///
/// Once the script runs out every draw returns `fallback`, also clamped.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    draws: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0,
        }
    }

    /// Source that always answers `value`
    pub fn constant(value: u32) -> Self {
        Self {
            draws: VecDeque::new(),
            fallback: value,
        }
    }

    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_in_range(&mut self, lo: u32, hi: u32) -> u32 {
        let value = self.draws.pop_front().unwrap_or(self.fallback);
        value.clamp(lo, hi.max(lo))
    }
}
