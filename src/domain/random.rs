//! Injectable randomness for the weighted strategies.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Source of uniformly distributed floats.
pub trait RandomSource: Send + Sync {
    /// Returns a value in `[0, upper)`.
    fn uniform(&self, upper: f64) -> f64;
}

/// Thread-local OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&self, upper: f64) -> f64 {
        rand::rng().random::<f64>() * upper
    }
}

/// Deterministic generator for reproducible selection runs.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&self, upper: f64) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random::<f64>() * upper
    }
}

/// Always draws the same fraction of `upper`.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    fraction: f64,
}

impl FixedRandom {
    /// `fraction` is clamped into `[0, 1)`.
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0 - f64::EPSILON),
        }
    }
}

impl RandomSource for FixedRandom {
    fn uniform(&self, upper: f64) -> f64 {
        self.fraction * upper
    }
}
