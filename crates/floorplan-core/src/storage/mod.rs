//! Storage abstraction for persistence.

mod memory;
mod plan_store;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;
pub use plan_store::{LEGACY_OPENINGS_KEY, LoadedPlan, OPENINGS_KEY, PlanStore, WALLS_KEY};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A synchronous string key-value store.
///
/// Implementations can keep entries in memory, on the filesystem, or in a
/// platform preference store.
pub trait Storage: Send + Sync {
    /// Read an entry. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write an entry, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete an entry. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
