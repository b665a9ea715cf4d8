//! Random number sources.
//!
//! Engines draw randomness through [`RandomPort`] so tests can script rolls
//! and sessions can be replayed from a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of random rolls used by the simulation.
pub trait RandomPort {
    /// Generate a random f64 in range [0.0, 1.0).
    fn random_f64(&mut self) -> f64;

    /// Generate a random i32 in range [min, max] (inclusive on both ends).
    fn random_range(&mut self, min: i32, max: i32) -> i32;

    /// Pick an index into a collection of `len` elements. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let upper = i32::try_from(len.saturating_sub(1)).unwrap_or(i32::MAX);
        self.random_range(0, upper).max(0) as usize
    }

    /// Roll a float uniformly in `[min, max]`.
    fn random_between(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.random_f64() as f32
    }
}

/// Thread-local OS-seeded randomness.
#[derive(Debug, Clone, Default)]
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl RandomPort for SystemRandom {
    fn random_f64(&mut self) -> f64 {
        rand::thread_rng().gen()
    }

    fn random_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Reproducible randomness from a fixed seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomPort for SeededRandom {
    fn random_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    fn random_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Scripted rolls for deterministic testing.
///
/// `random_range` returns the scripted values in order, clamped into the
/// requested range and cycling when exhausted. `random_f64` maps the same
/// script onto `[0, 1)` by dividing by 1000.
#[derive(Debug, Clone)]
pub struct FixedRandom {
    values: Vec<i32>,
    index: usize,
}

impl FixedRandom {
    pub fn new(values: Vec<i32>) -> Self {
        Self { values, index: 0 }
    }

    fn next_value(&mut self) -> i32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}

impl RandomPort for FixedRandom {
    fn random_f64(&mut self) -> f64 {
        (f64::from(self.next_value()) / 1000.0).clamp(0.0, 0.999_999)
    }

    fn random_range(&mut self, min: i32, max: i32) -> i32 {
        let value = self.next_value();
        if min >= max {
            return min;
        }
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_range_bounds() {
        let mut rng = SystemRandom::new();
        for _ in 0..100 {
            let value = rng.random_range(1, 20);
            assert!((1..=20).contains(&value), "Value {} out of range", value);
        }
    }

    #[test]
    fn test_random_f64_bounds() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..100 {
            let value = rng.random_f64();
            assert!((0.0..1.0).contains(&value), "Value {} out of range", value);
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        let rolls_a: Vec<i32> = (0..10).map(|_| a.random_range(0, 2000)).collect();
        let rolls_b: Vec<i32> = (0..10).map(|_| b.random_range(0, 2000)).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_fixed_cycles_and_clamps() {
        let mut rng = FixedRandom::new(vec![1, 5, 99]);
        assert_eq!(rng.random_range(0, 3), 1);
        assert_eq!(rng.random_range(0, 3), 3);
        assert_eq!(rng.random_range(0, 3), 3);
        assert_eq!(rng.random_range(0, 3), 1);
    }

    #[test]
    fn test_pick_stays_in_bounds() {
        let mut rng = SeededRandom::new(3);
        for _ in 0..50 {
            assert!(rng.pick(4) < 4);
        }
        assert_eq!(rng.pick(1), 0);
    }
}
