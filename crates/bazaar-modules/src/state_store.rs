//! # Module State Store
//!
//! Reads and writes the whole state collection as one JSON array under a
//! single store key.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kv_store                                                               │
//! │  ┌────────────────────┬──────────────────────────────────────────────┐ │
//! │  │ key                │ value                                        │ │
//! │  ├────────────────────┼──────────────────────────────────────────────┤ │
//! │  │ installed_modules  │ [{"id":"inventory","status":"enabled",...},  │ │
//! │  │                    │  {"id":"customers","status":"disabled",...}] │ │
//! │  └────────────────────┴──────────────────────────────────────────────┘ │
//! │                                                                         │
//! │  Every mutation rewrites the full value. Nothing is incremental.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::{ModuleState, INSTALLED_MODULES_KEY};
use bazaar_store::KeyValueStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};

/// Typed access to the persisted state collection.
#[derive(Debug, Clone)]
pub struct ModuleStateStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ModuleStateStore {
    /// Uses the default `installed_modules` key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, INSTALLED_MODULES_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        ModuleStateStore {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the collection.
    ///
    /// A missing or blank value is an empty collection. Records that do not
    /// decode are skipped with a warning; the rest still load.
    ///
    /// When the same id appears more than once, one record is kept at the
    /// position of the first occurrence: an installed record beats one that
    /// is not, then the most recently updated wins.
    ///
    /// ## Errors
    /// - `StorageCorrupt` if the value is not a JSON array
    /// - `Storage` if the read itself failed
    pub async fn load(&self) -> EngineResult<Vec<ModuleState>> {
        let Some(raw) = self.store.get(&self.key).await? else {
            debug!(key = %self.key, "No stored module state");
            return Ok(Vec::new());
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| EngineError::StorageCorrupt(e.to_string()))?;

        let mut states: Vec<ModuleState> = Vec::with_capacity(entries.len());
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let record: ModuleState = match serde_json::from_value(entry) {
                Ok(record) => record,
                Err(err) => {
                    warn!(key = %self.key, index, error = %err, "Skipping unreadable state record");
                    continue;
                }
            };

            match positions.get(&record.id) {
                None => {
                    positions.insert(record.id.clone(), states.len());
                    states.push(record);
                }
                Some(&position) => {
                    warn!(module_id = %record.id, "Collapsing duplicate stored state record");
                    if supersedes(&record, &states[position]) {
                        states[position] = record;
                    }
                }
            }
        }

        debug!(key = %self.key, count = states.len(), "Loaded module state");
        Ok(states)
    }

    /// Overwrites the collection.
    pub async fn save(&self, states: &[ModuleState]) -> EngineResult<()> {
        let payload =
            serde_json::to_string(states).map_err(|e| EngineError::StorageCorrupt(e.to_string()))?;

        self.store.set(&self.key, &payload).await?;

        debug!(key = %self.key, count = states.len(), "Saved module state");
        Ok(())
    }
}

/// Whether `candidate` should replace `kept` for the same id.
fn supersedes(candidate: &ModuleState, kept: &ModuleState) -> bool {
    match (candidate.status.is_installed(), kept.status.is_installed()) {
        (true, false) => true,
        (false, true) => false,
        _ => candidate.updated_at > kept.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::ModuleStatus;
    use bazaar_store::{MemoryStore, Store, StoreConfig};
    use chrono::Utc;

    fn memory_store(raw: Option<&str>) -> ModuleStateStore {
        let store = match raw {
            Some(raw) => MemoryStore::with_entry(INSTALLED_MODULES_KEY, raw),
            None => MemoryStore::new(),
        };
        ModuleStateStore::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_missing_and_blank_are_empty() {
        assert!(memory_store(None).load().await.unwrap().is_empty());
        assert!(memory_store(Some("  ")).load().await.unwrap().is_empty());
        assert!(memory_store(Some("[]")).load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_values() {
        for raw in ["{not json", r#"{"id":"a"}"#, r#""installed""#] {
            let err = memory_store(Some(raw)).load().await.unwrap_err();
            assert!(matches!(err, EngineError::StorageCorrupt(_)), "{raw}");
        }
    }

    #[tokio::test]
    async fn test_bad_record_does_not_hide_the_rest() {
        let raw = r#"[
            {"id":"inventory","status":"enabled","installed_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-01T00:00:00Z"},
            {"id":"customers","status":"paused","installed_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-01T00:00:00Z"},
            {"id":"qr-generator"},
            42,
            {"id":"quick-keys","status":"disabled","installed_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-03T00:00:00Z"}
        ]"#;

        let states = memory_store(Some(raw)).load().await.unwrap();
        let ids: Vec<&str> = states.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["inventory", "quick-keys"]);
        assert_eq!(states[0].status, ModuleStatus::Enabled);
        assert_eq!(states[1].status, ModuleStatus::Disabled);
    }

    #[tokio::test]
    async fn test_duplicate_prefers_installed_record() {
        let raw = r#"[
            {"id":"a","status":"available","installed_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-05T00:00:00Z"},
            {"id":"b","status":"installed","installed_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-01T00:00:00Z"},
            {"id":"a","status":"enabled","installed_at":"2026-01-02T00:00:00Z","updated_at":"2026-01-02T00:00:00Z"},
            {"id":"b","status":"available","installed_at":"2026-01-03T00:00:00Z","updated_at":"2026-01-03T00:00:00Z"}
        ]"#;

        let states = memory_store(Some(raw)).load().await.unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].id, "a");
        assert_eq!(states[0].status, ModuleStatus::Enabled);
        assert_eq!(states[1].id, "b");
        assert_eq!(states[1].status, ModuleStatus::Installed);
    }

    #[tokio::test]
    async fn test_duplicate_prefers_latest_update() {
        let raw = r#"[
            {"id":"a","status":"disabled","installed_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-04T00:00:00Z"},
            {"id":"a","status":"enabled","installed_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-02T00:00:00Z"},
            {"id":"a","status":"installed","installed_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-06T00:00:00Z"}
        ]"#;

        let states = memory_store(Some(raw)).load().await.unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].status, ModuleStatus::Installed);
    }

    #[tokio::test]
    async fn test_roundtrip_through_sqlite() {
        let sqlite = Store::new(StoreConfig::in_memory()).await.unwrap();
        let store = ModuleStateStore::new(Arc::new(sqlite.clone()));

        let now = Utc::now();
        let states = vec![
            ModuleState::installed("inventory", now).with_status(ModuleStatus::Enabled, now),
            ModuleState::installed("customers", now),
        ];

        store.save(&states).await.unwrap();
        assert_eq!(store.load().await.unwrap(), states);

        let raw = sqlite.get(INSTALLED_MODULES_KEY).await.unwrap().unwrap();
        assert!(raw.contains(r#""status":"enabled""#));

        store.save(&[]).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_key() {
        let memory = Arc::new(MemoryStore::new());
        let store = ModuleStateStore::with_key(memory.clone(), "modules_v2");

        store.save(&[]).await.unwrap();
        assert_eq!(store.key(), "modules_v2");
        assert_eq!(memory.get("modules_v2").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(memory.get(INSTALLED_MODULES_KEY).await.unwrap(), None);
    }
}
