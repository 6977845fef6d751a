mod play;
mod session;

use crate::random::{RandomSource, SeededRandom, ThreadRandom};
use crate::store::{HatStore, MemoryStore};
use std::sync::Arc;

/// Shared application state
///
/// Holds the store handle and the random source used for draws. Every game
/// action is a method on this type (see the `session` and `play` modules).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HatStore>,
    pub random: Arc<dyn RandomSource>,
}

impl AppState {
    /// Memory-only store with OS-seeded draws
    pub fn new() -> Self {
        Self::with_parts(Arc::new(MemoryStore::new()), Arc::new(ThreadRandom))
    }

    pub fn with_parts(store: Arc<dyn HatStore>, random: Arc<dyn RandomSource>) -> Self {
        Self { store, random }
    }

    /// Pick the random source from an optional fixed seed
    pub fn random_from_seed(seed: Option<u64>) -> Arc<dyn RandomSource> {
        match seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded random source");
                Arc::new(SeededRandom::new(seed))
            }
            None => Arc::new(ThreadRandom),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
