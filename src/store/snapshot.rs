//! Store snapshots for keeping hats across restarts.
//!
//! A snapshot is a serializable image of every hat in the store. It is
//! written after each mutation when a data file is configured and read back
//! at startup.

use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Schema version for snapshot format compatibility
/// Version 1: hats keyed by id, words embedded in their hat
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    /// Export timestamp (ISO8601)
    pub exported_at: String,
    /// All hats (keyed by hat ID)
    #[serde(default)]
    pub hats: HashMap<HatId, Hat>,
}

impl StoreSnapshot {
    /// Create a new snapshot with current timestamp
    pub fn new(hats: HashMap<HatId, Hat>) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            exported_at: chrono::Utc::now().to_rfc3339(),
            hats,
        }
    }

    /// Validate the snapshot before loading
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(format!(
                "Snapshot schema version {} is newer than supported version {}. \
                 Please update the server.",
                self.schema_version, SNAPSHOT_SCHEMA_VERSION
            ));
        }

        let mut word_ids = HashSet::new();
        for (key, hat) in &self.hats {
            if *key != hat.id {
                return Err(format!("Hat keyed as '{}' has id '{}'", key, hat.id));
            }

            let mut texts = HashSet::new();
            for word in &hat.words {
                if word.hat_id != hat.id {
                    return Err(format!(
                        "Word '{}' references hat '{}' but is stored in hat '{}'",
                        word.id, word.hat_id, hat.id
                    ));
                }
                if !word_ids.insert(word.id.as_str()) {
                    return Err(format!("Word id '{}' appears more than once", word.id));
                }
                if !texts.insert(word.text.as_str()) {
                    return Err(format!(
                        "Hat '{}' contains duplicate word '{}'",
                        hat.id, word.text
                    ));
                }
            }
        }

        Ok(())
    }
}
