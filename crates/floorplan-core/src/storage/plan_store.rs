//! Persistence of walls and openings on top of a key-value [`Storage`].
//!
//! Walls and openings live under separate keys so that a corrupt section
//! degrades to an empty collection without taking the other one with it.

use super::{Storage, StorageError, StorageResult};
use crate::plan::{Opening, Wall};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Key of the wall section.
pub const WALLS_KEY: &str = "walls";

/// Key of the opening section.
pub const OPENINGS_KEY: &str = "openings";

/// Key older plans stored their openings under. Read when [`OPENINGS_KEY`] is absent.
pub const LEGACY_OPENINGS_KEY: &str = "elements";

/// Outcome of loading a stored plan.
#[derive(Debug, Clone, Default)]
pub struct LoadedPlan {
    pub walls: Vec<Wall>,
    pub openings: Vec<Opening>,
    /// Whether a section had to be discarded.
    pub recovered: bool,
}

/// Saves and restores the plan content.
pub struct PlanStore<S: Storage> {
    /// Storage backend.
    storage: Arc<S>,
    /// Whether the last save failed or a change has not been written yet.
    dirty: bool,
}

impl<S: Storage> PlanStore<S> {
    /// Create a plan store over the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            dirty: false,
        }
    }

    /// Mark the plan as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if the plan has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write both sections. The dirty flag is cleared only on success.
    pub fn save(&mut self, walls: &[Wall], openings: &[Opening]) -> StorageResult<()> {
        self.dirty = true;
        let walls_json = to_json(walls)?;
        let openings_json = to_json(openings)?;
        self.storage.put(WALLS_KEY, &walls_json)?;
        self.storage.put(OPENINGS_KEY, &openings_json)?;
        self.dirty = false;
        Ok(())
    }

    /// Read both sections. Never fails: missing or unreadable sections come back empty.
    ///
    /// Wall records are addressed by position, so one bad wall record discards
    /// the whole wall section. Opening records are independent and a bad one
    /// is skipped on its own.
    pub fn load(&mut self) -> LoadedPlan {
        let (walls, walls_ok) = self.load_section::<Wall>(&[WALLS_KEY]);
        let (openings, openings_ok) = self.load_openings();
        self.dirty = false;
        LoadedPlan {
            walls,
            openings,
            recovered: !(walls_ok && openings_ok),
        }
    }

    fn load_openings(&self) -> (Vec<Opening>, bool) {
        let (records, mut complete) =
            self.load_section::<Value>(&[OPENINGS_KEY, LEGACY_OPENINGS_KEY]);
        let openings: Vec<Opening> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(opening) => Some(opening),
                Err(e) => {
                    log::warn!("Skipping unreadable opening record {}: {}", index, e);
                    complete = false;
                    None
                }
            })
            .collect();
        (openings, complete)
    }

    /// Parse the first present key as a JSON array.
    fn load_section<T: DeserializeOwned>(&self, keys: &[&str]) -> (Vec<T>, bool) {
        for key in keys {
            match self.storage.get(key) {
                Ok(Some(json)) => {
                    return match serde_json::from_str(&json) {
                        Ok(items) => (items, true),
                        Err(e) => {
                            log::warn!("Discarding unreadable '{}' section: {}", key, e);
                            (Vec::new(), false)
                        }
                    };
                }
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("Failed to read '{}' section: {}", key, e);
                    return (Vec::new(), false);
                }
            }
        }
        (Vec::new(), true)
    }
}

fn to_json<T: Serialize>(items: &[T]) -> StorageResult<String> {
    serde_json::to_string(items).map_err(|e| StorageError::Serialization(e.to_string()))
}
