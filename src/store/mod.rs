mod memory;
pub mod snapshot;

use crate::types::*;
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use snapshot::StoreSnapshot;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing hats
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Hat {0} not found")]
    HatNotFound(HatId),

    #[error("Word {0} not found")]
    WordNotFound(WordId),

    #[error("Store file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid store snapshot: {0}")]
    Snapshot(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::HatNotFound(_) | StoreError::WordNotFound(_))
    }
}

/// A mutation applied to a stored hat while the store holds its write lock
pub type HatMutation<'a> = Box<dyn FnOnce(&mut Hat) + Send + 'a>;

/// Persistence seam for hats and their words
#[async_trait]
pub trait HatStore: Send + Sync {
    /// Allocate and persist a new, empty hat in the `init` stage
    async fn create_hat(&self) -> StoreResult<Hat>;

    async fn get_hat(&self, id: &str) -> StoreResult<Hat>;

    /// Write `hat` as a single atomic step. An existing record is merged
    /// forward (stage, guessed flags, words) and never moves backwards.
    async fn save_hat(&self, hat: &Hat) -> StoreResult<()>;

    async fn get_word(&self, id: &str) -> StoreResult<Word>;

    /// Read-modify-write a hat without letting concurrent writers interleave.
    ///
    /// Returns the hat as stored after the mutation.
    async fn update_hat(&self, id: &str, mutate: HatMutation<'_>) -> StoreResult<Hat>;

    async fn hat_count(&self) -> usize;
}
