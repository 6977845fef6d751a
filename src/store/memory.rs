use super::snapshot::StoreSnapshot;
use super::{HatMutation, HatStore, StoreError, StoreResult};
use crate::types::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    hats: HashMap<HatId, Hat>,
    /// word id -> owning hat id
    word_index: HashMap<WordId, HatId>,
}

impl Inner {
    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut inner = Self {
            hats: snapshot.hats,
            word_index: HashMap::new(),
        };
        for hat in inner.hats.values() {
            for word in &hat.words {
                inner.word_index.insert(word.id.clone(), hat.id.clone());
            }
        }
        inner
    }

    fn commit(&mut self, hat: Hat) {
        if let Some(previous) = self.hats.get(&hat.id) {
            for word in &previous.words {
                self.word_index.remove(&word.id);
            }
        }
        for word in &hat.words {
            self.word_index.insert(word.id.clone(), hat.id.clone());
        }
        self.hats.insert(hat.id.clone(), hat);
    }

    /// Snapshot of the store as it would look with `hat` committed
    fn snapshot_with(&self, hat: &Hat) -> StoreSnapshot {
        let mut hats = self.hats.clone();
        hats.insert(hat.id.clone(), hat.clone());
        StoreSnapshot::new(hats)
    }
}

/// Fold a full record into the stored one without moving anything backwards.
///
/// The stage only advances, `guessed` flags are OR-ed, and stored words are
/// never dropped. New words are taken only while the stored hat is in `init`
/// and only if their text is not already present.
fn merge_hat(stored: &Hat, incoming: &Hat) -> Hat {
    let mut merged = stored.clone();

    for word in &mut merged.words {
        if incoming.word(&word.id).is_some_and(|w| w.guessed) {
            word.guessed = true;
        }
    }

    if stored.stage == Stage::Init {
        for word in &incoming.words {
            if word.hat_id != stored.id || merged.word(&word.id).is_some() {
                continue;
            }
            if merged.contains_text(&word.text) {
                continue;
            }
            merged.words.push(word.clone());
        }
    }

    merged.stage = stored.stage.max(incoming.stage);
    merged
}

/// In-process hat store, optionally mirrored to a JSON file.
///
/// One lock covers all hats, so every write is serialized and a failed
/// file write leaves the in-memory state untouched.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    data_file: Option<PathBuf>,
}

impl MemoryStore {
    /// Memory-only store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by `path`. Loads the existing snapshot if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let inner = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: StoreSnapshot = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Snapshot(e.to_string()))?;
                snapshot.validate().map_err(StoreError::Snapshot)?;
                tracing::info!(
                    "Loaded {} hats from {} (exported at {})",
                    snapshot.hats.len(),
                    path.display(),
                    snapshot.exported_at
                );
                Inner::from_snapshot(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No store file at {}, starting empty", path.display());
                Inner::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            inner: RwLock::new(inner),
            data_file: Some(path),
        })
    }

    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    /// Write the snapshot next to the data file, then rename over it
    async fn persist(&self, snapshot: StoreSnapshot) -> StoreResult<()> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };

        let json =
            serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Snapshot(e.to_string()))?;

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Persist (if file-backed) then apply `hat` to memory. Caller holds the write lock.
    async fn write_through(&self, inner: &mut Inner, hat: Hat) -> StoreResult<()> {
        if self.data_file.is_some() {
            self.persist(inner.snapshot_with(&hat)).await?;
        }
        inner.commit(hat);
        Ok(())
    }
}

#[async_trait]
impl HatStore for MemoryStore {
    async fn create_hat(&self) -> StoreResult<Hat> {
        let hat = Hat::new();
        let mut inner = self.inner.write().await;
        self.write_through(&mut inner, hat.clone()).await?;
        Ok(hat)
    }

    async fn get_hat(&self, id: &str) -> StoreResult<Hat> {
        self.inner
            .read()
            .await
            .hats
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::HatNotFound(id.to_string()))
    }

    async fn save_hat(&self, hat: &Hat) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let merged = match inner.hats.get(&hat.id) {
            Some(stored) => {
                let merged = merge_hat(stored, hat);
                if merged != *hat {
                    tracing::debug!("Merged stale record for {}", hat);
                }
                if merged == *stored {
                    return Ok(());
                }
                merged
            }
            None => hat.clone(),
        };
        self.write_through(&mut inner, merged).await
    }

    async fn get_word(&self, id: &str) -> StoreResult<Word> {
        let inner = self.inner.read().await;
        inner
            .word_index
            .get(id)
            .and_then(|hat_id| inner.hats.get(hat_id))
            .and_then(|hat| hat.word(id))
            .cloned()
            .ok_or_else(|| StoreError::WordNotFound(id.to_string()))
    }

    async fn update_hat(&self, id: &str, mutate: HatMutation<'_>) -> StoreResult<Hat> {
        let mut inner = self.inner.write().await;
        let mut hat = inner
            .hats
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::HatNotFound(id.to_string()))?;

        mutate(&mut hat);

        if inner.hats.get(id) != Some(&hat) {
            self.write_through(&mut inner, hat.clone()).await?;
        }
        Ok(hat)
    }

    async fn hat_count(&self) -> usize {
        self.inner.read().await.hats.len()
    }
}
