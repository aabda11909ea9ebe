//! Key-value persistence for JSON blobs
//!
//! Features:
//! - One small trait over string-keyed JSON documents
//! - In-memory, file (tmp → rename) and LocalStorage backends
//! - The progress endpoint (GET/PUT of a single JSON record)
//! - Local cache + remote sync with remote-wins merge

pub mod endpoint;
pub mod sync;

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

use std::collections::HashMap;

pub use endpoint::{Method, ProgressEndpoint, StoreRequest, StoreResponse};
pub use sync::{ProgressRemote, ProgressSync, SyncStatus};

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Storage key for practice progress
pub const PROGRESS_KEY: &str = "playroom_progress";

/// A store operation failed
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("progress record must be a JSON object, got {0}")]
    InvalidRecord(&'static str),
}

/// String values under string keys
pub trait KeyValueStore {
    /// `Ok(None)` if nothing is stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Overwrite the value under `key`
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store (tests, and the fallback when nothing else is available)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        // Keys are our own constants, but keep them from escaping the directory
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write to a temp file first so a crash never leaves half a record
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
