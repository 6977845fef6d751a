//! Random source used for drawing words from a hat.
//!
//! Drawing goes through [`RandomSource`] so tests and demos can pin the
//! sequence of picks. Every draw asks for a fresh index; nothing is cached
//! between calls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Trait that all random sources must implement
pub trait RandomSource: Send + Sync {
    /// Pick an index uniformly from `0..len`. Callers never pass `len == 0`.
    ///
    /// Out-of-range results trip a debug assertion in `draw_word`; release
    /// builds log a warning and wrap the index.
    fn pick_index(&self, len: usize) -> usize;
}

/// Thread-local OS-seeded generator (default for the server)
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Deterministic generator seeded from a fixed value
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
    fn pick_index(&self, len: usize) -> usize {
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(0..len)
    }
}
