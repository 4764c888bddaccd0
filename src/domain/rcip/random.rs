//! Pluggable randomness for the variation engine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Debug;

/// Source of uniform choices.
pub trait RandomSource: Send + Sync + Debug {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Picks one element of `options`, or `None` when it is empty.
pub fn pick<'a, T>(random: &mut dyn RandomSource, options: &'a [T]) -> Option<&'a T> {
    if options.is_empty() {
        return None;
    }
    let index = random.pick_index(options.len()).min(options.len() - 1);
    options.get(index)
}

/// Thread-local entropy, for production use.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Reproducible sequence from a fixed seed.
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

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always returns the same index, clamped to the option count.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_from_empty_is_none() {
        let empty: [u8; 0] = [];
        assert_eq!(pick(&mut ThreadRandom, &empty), None);
    }

    #[test]
    fn thread_random_stays_in_range() {
        let mut random = ThreadRandom;
        for _ in 0..100 {
            assert!(random.pick_index(3) < 3);
        }
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        let first: Vec<usize> = (0..20).map(|_| a.pick_index(5)).collect();
        let second: Vec<usize> = (0..20).map(|_| b.pick_index(5)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn fixed_random_clamps() {
        let options = ["a", "b", "c"];
        assert_eq!(pick(&mut FixedRandom(1), &options), Some(&"b"));
        assert_eq!(pick(&mut FixedRandom(9), &options), Some(&"c"));
    }
}
