//! # Key-Value Store Abstraction
//!
//! The engine talks to persistence only through [`KeyValueStore`]. Values
//! are opaque strings; callers own their encoding.
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────────┐
//! │  ModuleStateStore    │──────► │  dyn KeyValueStore           │
//! └──────────────────────┘        │   ├── Store (SQLite)         │
//!                                 │   └── MemoryStore (tests)    │
//!                                 └──────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};

/// Persisted string values addressed by key.
///
/// `set` replaces any previous value wholesale. Implementations must be
/// usable from several tasks at once.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Returns the value under `key`, or `None` if nothing was ever written.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// Process-local store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemoryStore {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::internal("memory store lock poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
