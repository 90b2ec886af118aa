//! Key-value persistence
//!
//! The simulation only ever stores small JSON blobs under fixed keys
//! (high scores, config). Backends:
//! - `MemoryStore`: in-process map (tests, headless runs without a data dir)
//! - `FileStore`: one file per key in a directory (native)
//! - `LocalStore`: browser LocalStorage (wasm32)

use std::collections::HashMap;

use crate::error::StorageError;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Minimal string key-value store
pub trait KeyValueStore {
    /// Read the value under `key`, `None` if never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Overwrite the value under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store that fails every call, for exercising degraded paths
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("store disabled".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("store disabled".to_string()))
    }
}
