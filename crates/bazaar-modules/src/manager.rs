//! # Module Manager
//!
//! The single source of truth reconciling manifests with persisted state.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  manager.enable("inventory")                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write lock ───────────────────────────────────────────────┐           │
//! │       │                                                     │           │
//! │       ▼                                                     │           │
//! │  lifecycle::transition(current, id, Enable)                 │ held for  │
//! │       │   └── Err(NotInstalled) → return, nothing changed   │ the whole │
//! │       ▼                                                     │ mutation  │
//! │  build new collection (copy + change)                       │           │
//! │       │                                                     │           │
//! │       ▼                                                     │           │
//! │  ModuleStateStore::save(new)                                │           │
//! │       │   └── Err(Storage) → return, memory untouched       │           │
//! │       ▼                                                     │           │
//! │  commit new collection to memory ──────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Listings
//! - `available_modules()`: registered, globally enabled, not installed
//! - `installed_modules()`: registered, globally enabled, status `enabled`
//!
//! Both follow registration order. State records without a manifest
//! (orphans) appear in neither.

use bazaar_core::lifecycle::transition;
use bazaar_core::{
    CoreError, InstalledModule, LifecycleAction, ModuleManifest, ModuleState, ModuleStatus,
};
use chrono::Utc;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::EngineResult;
use crate::registry::ManifestRegistry;
use crate::state_store::ModuleStateStore;

#[derive(Debug)]
struct Inner {
    registry: ManifestRegistry,
    states: Vec<ModuleState>,
}

impl Inner {
    fn position(&self, id: &str) -> Option<usize> {
        self.states.iter().position(|s| s.id == id)
    }

    /// Status of an installed module. `Available` records count as absent.
    fn status_of(&self, id: &str) -> Option<ModuleStatus> {
        self.states
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.status)
            .filter(ModuleStatus::is_installed)
    }
}

/// Registry of manifests plus the persisted state of each installed module.
///
/// Shared as `Arc<ModuleManager>`; every method takes `&self`.
#[derive(Debug)]
pub struct ModuleManager {
    inner: RwLock<Inner>,
    store: ModuleStateStore,
}

impl ModuleManager {
    /// Builds a manager from an already-populated registry and the loaded
    /// state collection.
    pub fn new(registry: ManifestRegistry, states: Vec<ModuleState>, store: ModuleStateStore) -> Self {
        ModuleManager {
            inner: RwLock::new(Inner { registry, states }),
            store,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Manifests that can be installed, in registration order.
    ///
    /// Globally disabled manifests are hidden.
    pub async fn available_modules(&self) -> Vec<ModuleManifest> {
        let inner = self.inner.read().await;
        inner
            .registry
            .iter()
            .filter(|m| m.enabled && inner.status_of(&m.id).is_none())
            .cloned()
            .collect()
    }

    /// Active modules paired with their state, in registration order.
    pub async fn installed_modules(&self) -> Vec<InstalledModule> {
        let inner = self.inner.read().await;
        inner
            .registry
            .iter()
            .filter(|m| m.enabled)
            .filter_map(|m| {
                inner
                    .states
                    .iter()
                    .find(|s| s.id == m.id && s.status.is_active())
                    .map(|s| InstalledModule {
                        manifest: m.clone(),
                        state: s.clone(),
                    })
            })
            .collect()
    }

    /// Returns the manifest for `id`.
    ///
    /// Globally disabled manifests are still returned; callers check
    /// `enabled` themselves.
    pub async fn get_by_id(&self, id: &str) -> EngineResult<ModuleManifest> {
        let inner = self.inner.read().await;
        inner
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(id.to_string()).into())
    }

    /// Every registered manifest, in registration order.
    pub async fn manifests(&self) -> Vec<ModuleManifest> {
        self.inner.read().await.registry.iter().cloned().collect()
    }

    /// Status of `id`, or `None` when it is not installed.
    pub async fn status_of(&self, id: &str) -> Option<ModuleStatus> {
        self.inner.read().await.status_of(id)
    }

    /// Stored record for `id`, whatever its status.
    pub async fn state_of(&self, id: &str) -> Option<ModuleState> {
        let inner = self.inner.read().await;
        inner.states.iter().find(|s| s.id == id).cloned()
    }

    /// The whole in-memory state collection, in stored order.
    pub async fn states(&self) -> Vec<ModuleState> {
        self.inner.read().await.states.clone()
    }

    /// State records whose manifest is not registered.
    pub async fn orphans(&self) -> Vec<ModuleState> {
        let inner = self.inner.read().await;
        inner
            .states
            .iter()
            .filter(|s| !inner.registry.contains(&s.id))
            .cloned()
            .collect()
    }

    /// Key the state collection is persisted under.
    pub fn store_key(&self) -> &str {
        self.store.key()
    }

    // =========================================================================
    // Lifecycle Mutations
    // =========================================================================

    /// Installs a registered module with status `installed`.
    ///
    /// ## Errors
    /// - `UnknownModule` if no manifest is registered under `id`
    /// - `AlreadyInstalled` if the module is installed in any status
    /// - `Storage` if persisting failed (nothing changes)
    pub async fn install(&self, id: &str) -> EngineResult<ModuleState> {
        let mut inner = self.inner.write().await;

        if !inner.registry.contains(id) {
            return Err(CoreError::UnknownModule(id.to_string()).into());
        }

        let position = inner.position(id);
        let status = transition(inner.status_of(id), id, LifecycleAction::Install)?
            .unwrap_or(ModuleStatus::Installed);

        let now = Utc::now();
        let state = ModuleState::installed(id, now).with_status(status, now);

        // A leftover `available` record is replaced in place
        let mut updated = inner.states.clone();
        match position {
            Some(i) => updated[i] = state.clone(),
            None => updated.push(state.clone()),
        }

        self.store.save(&updated).await?;
        inner.states = updated;

        info!(module_id = %id, status = %state.status, "Module installed");
        Ok(state)
    }

    /// Switches an installed module on.
    ///
    /// ## Errors
    /// - `NotInstalled` if there is no installed record for `id`
    /// - `Storage` if persisting failed (nothing changes)
    pub async fn enable(&self, id: &str) -> EngineResult<ModuleState> {
        self.change_status(id, LifecycleAction::Enable).await
    }

    /// Switches an installed module off.
    ///
    /// ## Errors
    /// - `NotInstalled` if there is no installed record for `id`
    /// - `Storage` if persisting failed (nothing changes)
    pub async fn disable(&self, id: &str) -> EngineResult<ModuleState> {
        self.change_status(id, LifecycleAction::Disable).await
    }

    async fn change_status(&self, id: &str, action: LifecycleAction) -> EngineResult<ModuleState> {
        let mut inner = self.inner.write().await;

        let next = transition(inner.status_of(id), id, action)?;
        let (Some(position), Some(status)) = (inner.position(id), next) else {
            return Err(CoreError::NotInstalled(id.to_string()).into());
        };

        let previous = inner.states[position].status;
        let state = inner.states[position].with_status(status, Utc::now());

        let mut updated = inner.states.clone();
        updated[position] = state.clone();

        self.store.save(&updated).await?;
        inner.states = updated;

        if !inner.registry.contains(id) {
            warn!(module_id = %id, "Changed status of a module with no registered manifest");
        }

        info!(module_id = %id, from = %previous, to = %status, "Module status changed");
        Ok(state)
    }

    /// Removes the record for `id`.
    ///
    /// Returns `false` without touching the store when there was nothing
    /// installed. A leftover `available` record is dropped as well.
    pub async fn uninstall(&self, id: &str) -> EngineResult<bool> {
        let mut inner = self.inner.write().await;

        let Some(position) = inner.position(id) else {
            return Ok(false);
        };
        let was_installed = inner.states[position].status.is_installed();

        let mut updated = inner.states.clone();
        updated.remove(position);

        self.store.save(&updated).await?;
        inner.states = updated;

        if was_installed {
            info!(module_id = %id, "Module uninstalled");
        }
        Ok(was_installed)
    }

    /// Deletes every orphaned state record.
    ///
    /// Returns the purged ids. Orphans are otherwise kept, only reported.
    pub async fn purge_orphans(&self) -> EngineResult<Vec<String>> {
        let mut inner = self.inner.write().await;

        let purged: Vec<String> = inner
            .states
            .iter()
            .filter(|s| !inner.registry.contains(&s.id))
            .map(|s| s.id.clone())
            .collect();

        if purged.is_empty() {
            return Ok(purged);
        }

        let doomed: HashSet<&str> = purged.iter().map(String::as_str).collect();
        let updated: Vec<ModuleState> = inner
            .states
            .iter()
            .filter(|s| !doomed.contains(s.id.as_str()))
            .cloned()
            .collect();

        self.store.save(&updated).await?;
        inner.states = updated;

        info!(count = purged.len(), ids = ?purged, "Purged orphaned module state");
        Ok(purged)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a manifest after bootstrap.
    ///
    /// ## Errors
    /// - `DuplicateModule` if the id is taken
    /// - `Validation` if the manifest is malformed
    pub async fn register_manifest(&self, manifest: ModuleManifest) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        let id = manifest.id.clone();
        inner.registry.register(manifest)?;
        info!(module_id = %id, "Manifest registered");
        Ok(())
    }

    /// Removes a manifest. Its state record, if any, becomes an orphan.
    pub async fn unregister_manifest(&self, id: &str) -> Option<ModuleManifest> {
        let mut inner = self.inner.write().await;
        let removed = inner.registry.unregister(id)?;

        if inner.position(id).is_some() {
            warn!(module_id = %id, "Unregistered manifest leaves an orphaned state record");
        }
        info!(module_id = %id, "Manifest unregistered");
        Some(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use async_trait::async_trait;
    use bazaar_core::INSTALLED_MODULES_KEY;
    use bazaar_store::{KeyValueStore, MemoryStore, StoreError, StoreResult};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Memory store whose writes can be switched to fail.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::QueryFailed("disk I/O error".into()));
            }
            self.inner.set(key, value).await
        }
    }

    fn registry(ids: &[&str]) -> ManifestRegistry {
        let mut registry = ManifestRegistry::new();
        for id in ids {
            registry
                .register(ModuleManifest::new(*id, id.to_uppercase()))
                .unwrap();
        }
        registry
    }

    fn manager_with(ids: &[&str], store: Arc<dyn KeyValueStore>) -> ModuleManager {
        ModuleManager::new(registry(ids), Vec::new(), ModuleStateStore::new(store))
    }

    fn manager(ids: &[&str]) -> (ModuleManager, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (manager_with(ids, store.clone()), store)
    }

    fn ids(manifests: &[ModuleManifest]) -> Vec<&str> {
        manifests.iter().map(|m| m.id.as_str()).collect()
    }

    async fn persisted(store: &MemoryStore) -> Vec<ModuleState> {
        let raw = store.get(INSTALLED_MODULES_KEY).await.unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_install_enable_walkthrough() {
        let (manager, store) = manager(&["a", "b"]);

        assert_eq!(ids(&manager.available_modules().await), vec!["a", "b"]);
        assert!(manager.installed_modules().await.is_empty());

        manager.install("a").await.unwrap();
        let states = manager.states().await;
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].id, "a");
        assert_eq!(states[0].status, ModuleStatus::Installed);
        assert_eq!(persisted(&store).await, states);
        assert_eq!(ids(&manager.available_modules().await), vec!["b"]);
        assert!(manager.installed_modules().await.is_empty());

        manager.enable("a").await.unwrap();
        let installed = manager.installed_modules().await;
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].manifest.id, "a");
        assert_eq!(installed[0].state.status, ModuleStatus::Enabled);

        let before = manager.states().await;
        let err = manager.install("a").await.unwrap_err();
        assert!(matches!(err, EngineError::Module(CoreError::AlreadyInstalled(ref id)) if id == "a"));
        assert_eq!(manager.states().await, before);
        assert_eq!(persisted(&store).await, before);
    }

    #[tokio::test]
    async fn test_install_unknown_module() {
        let (manager, store) = manager(&["a"]);

        let err = manager.install("zzz").await.unwrap_err();
        assert!(matches!(err, EngineError::Module(CoreError::UnknownModule(_))));
        assert!(manager.states().await.is_empty());
        assert_eq!(store.get(INSTALLED_MODULES_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_enable_disable_require_install() {
        let (manager, store) = manager(&["a"]);

        for result in [manager.enable("a").await, manager.disable("a").await] {
            let err = result.unwrap_err();
            assert!(matches!(err, EngineError::Module(CoreError::NotInstalled(_))));
        }
        assert!(manager.states().await.is_empty());
        assert_eq!(store.get(INSTALLED_MODULES_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_enable_disable_cycle() {
        let (manager, store) = manager(&["a"]);
        manager.install("a").await.unwrap();

        // installed → disabled is accepted
        assert_eq!(manager.disable("a").await.unwrap().status, ModuleStatus::Disabled);
        assert_eq!(manager.enable("a").await.unwrap().status, ModuleStatus::Enabled);
        assert_eq!(manager.enable("a").await.unwrap().status, ModuleStatus::Enabled);
        assert_eq!(manager.disable("a").await.unwrap().status, ModuleStatus::Disabled);

        assert!(manager.installed_modules().await.is_empty());
        assert!(manager.available_modules().await.is_empty());
        assert_eq!(manager.status_of("a").await, Some(ModuleStatus::Disabled));
        assert_eq!(persisted(&store).await[0].status, ModuleStatus::Disabled);
    }

    #[tokio::test]
    async fn test_status_change_keeps_installed_at() {
        let (manager, _) = manager(&["a"]);
        let installed = manager.install("a").await.unwrap();
        let enabled = manager.enable("a").await.unwrap();

        assert_eq!(enabled.installed_at, installed.installed_at);
        assert!(enabled.updated_at >= installed.updated_at);
    }

    #[tokio::test]
    async fn test_uninstall_is_idempotent() {
        let (manager, store) = manager(&["a", "b"]);

        assert!(!manager.uninstall("a").await.unwrap());
        assert_eq!(store.get(INSTALLED_MODULES_KEY).await.unwrap(), None);

        manager.install("a").await.unwrap();
        manager.install("b").await.unwrap();
        manager.enable("a").await.unwrap();

        assert!(manager.uninstall("a").await.unwrap());
        assert!(!manager.uninstall("a").await.unwrap());

        assert_eq!(manager.status_of("a").await, None);
        assert_eq!(ids(&manager.available_modules().await), vec!["a"]);
        let stored = persisted(&store).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, "b");

        // Reinstall starts over
        let again = manager.install("a").await.unwrap();
        assert_eq!(again.status, ModuleStatus::Installed);
    }

    #[tokio::test]
    async fn test_available_record_counts_as_absent() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let mut stale = ModuleState::installed("a", now);
        stale.status = ModuleStatus::Available;

        let manager = ModuleManager::new(
            registry(&["a"]),
            vec![stale],
            ModuleStateStore::new(store.clone()),
        );

        assert_eq!(ids(&manager.available_modules().await), vec!["a"]);
        assert_eq!(manager.status_of("a").await, None);
        assert!(manager.state_of("a").await.is_some());
        assert!(matches!(
            manager.enable("a").await.unwrap_err(),
            EngineError::Module(CoreError::NotInstalled(_))
        ));

        manager.install("a").await.unwrap();
        let stored = persisted(&store).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, ModuleStatus::Installed);
    }

    #[tokio::test]
    async fn test_killed_manifest_hidden_from_listings() {
        let store = Arc::new(MemoryStore::new());
        let mut registry = registry(&["a"]);
        registry
            .register(ModuleManifest::new("b", "B").with_enabled(false))
            .unwrap();
        let manager = ModuleManager::new(registry, Vec::new(), ModuleStateStore::new(store));

        assert_eq!(ids(&manager.available_modules().await), vec!["a"]);

        manager.install("b").await.unwrap();
        manager.enable("b").await.unwrap();
        assert!(manager.installed_modules().await.is_empty());
        assert!(!manager.get_by_id("b").await.unwrap().enabled);
    }

    #[tokio::test]
    async fn test_listings_follow_registration_order() {
        let (manager, _) = manager(&["c", "a", "b"]);
        for id in ["b", "c", "a"] {
            manager.install(id).await.unwrap();
            manager.enable(id).await.unwrap();
        }

        let installed: Vec<String> = manager
            .installed_modules()
            .await
            .into_iter()
            .map(|m| m.manifest.id)
            .collect();
        assert_eq!(installed, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (manager, _) = manager(&["a"]);

        assert_eq!(manager.get_by_id("a").await.unwrap().name, "A");
        assert!(matches!(
            manager.get_by_id("zzz").await.unwrap_err(),
            EngineError::Module(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let store = Arc::new(FlakyStore::default());
        let manager = manager_with(&["a", "b"], store.clone());
        manager.install("a").await.unwrap();

        store.fail_writes.store(true, Ordering::SeqCst);
        let before = manager.states().await;

        assert!(matches!(manager.install("b").await, Err(EngineError::Storage(_))));
        assert!(matches!(manager.enable("a").await, Err(EngineError::Storage(_))));
        assert!(matches!(manager.uninstall("a").await, Err(EngineError::Storage(_))));

        assert_eq!(manager.states().await, before);
        assert_eq!(manager.status_of("a").await, Some(ModuleStatus::Installed));

        store.fail_writes.store(false, Ordering::SeqCst);
        manager.enable("a").await.unwrap();
        assert_eq!(manager.status_of("a").await, Some(ModuleStatus::Enabled));
    }

    #[tokio::test]
    async fn test_orphans_reported_excluded_and_purged_explicitly() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let states = vec![
            ModuleState::installed("a", now).with_status(ModuleStatus::Enabled, now),
            ModuleState::installed("ghost", now).with_status(ModuleStatus::Enabled, now),
        ];
        let manager =
            ModuleManager::new(registry(&["a"]), states, ModuleStateStore::new(store.clone()));

        let orphans = manager.orphans().await;
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, "ghost");

        let installed = manager.installed_modules().await;
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].manifest.id, "a");

        // Unrelated mutations keep the orphan in the stored collection
        manager.disable("a").await.unwrap();
        assert!(persisted(&store).await.iter().any(|s| s.id == "ghost"));

        assert_eq!(manager.purge_orphans().await.unwrap(), vec!["ghost".to_string()]);
        assert!(manager.orphans().await.is_empty());
        assert!(!persisted(&store).await.iter().any(|s| s.id == "ghost"));

        assert!(manager.purge_orphans().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_and_unregister_manifest() {
        let (manager, _) = manager(&["a"]);

        manager
            .register_manifest(ModuleManifest::new("gift-cards", "Gift Cards"))
            .await
            .unwrap();
        assert_eq!(ids(&manager.available_modules().await), vec!["a", "gift-cards"]);

        let err = manager
            .register_manifest(ModuleManifest::new("a", "Again"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Module(CoreError::DuplicateModule(_))));

        manager.install("gift-cards").await.unwrap();
        assert!(manager.unregister_manifest("gift-cards").await.is_some());
        assert!(manager.unregister_manifest("gift-cards").await.is_none());

        let orphans = manager.orphans().await;
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, "gift-cards");
    }

    #[tokio::test]
    async fn test_concurrent_installs_serialize() {
        let ids_all = ["a", "b", "c", "d", "e", "f"];
        let (manager, store) = manager(&ids_all);
        let manager = Arc::new(manager);

        let handles: Vec<_> = ids_all
            .iter()
            .map(|id| {
                let manager = manager.clone();
                let id = id.to_string();
                tokio::spawn(async move { manager.install(&id).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = persisted(&store).await;
        assert_eq!(stored.len(), ids_all.len());
        assert_eq!(manager.states().await, stored);
    }
}
