//! # Initializer
//!
//! Builds the module manager exactly once per session.
//!
//! ## Bootstrap Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  initializer.initialize().await   (first call)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Register built-in manifests (catalog order)                        │
//! │  2. Register runtime manifests (file order)                            │
//! │       └── invalid / duplicate → warn, skip                             │
//! │  3. Load the state collection                                          │
//! │       ├── bad record → warn, skip that record                          │
//! │       └── not an array or unreadable → error log, empty collection     │
//! │  4. Report orphans (warn, keep)                                        │
//! │  5. Wrap in Arc<ModuleManager>                                         │
//! │                                                                         │
//! │  every later call ─────────────► same Arc<ModuleManager>               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent first calls wait on the same in-flight bootstrap.

use bazaar_core::catalog::builtin_manifests;
use bazaar_core::{CoreError, ModuleManifest, INSTALLED_MODULES_KEY};
use bazaar_store::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::manager::ModuleManager;
use crate::registry::ManifestRegistry;
use crate::state_store::ModuleStateStore;

/// Summary of one bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootReport {
    /// Identifies this session in logs.
    pub session_id: Uuid,
    pub booted_at: DateTime<Utc>,
    /// Manifests registered.
    pub manifests: usize,
    /// State records loaded, orphans included.
    pub states: usize,
    /// Ids of state records with no manifest.
    pub orphans: Vec<String>,
    /// Runtime manifests that were rejected.
    pub rejected: Vec<String>,
    /// True when stored state was unreadable and an empty collection was used.
    pub recovered: bool,
}

#[derive(Debug)]
struct Booted {
    manager: Arc<ModuleManager>,
    report: BootReport,
}

/// One-shot bootstrap of the module engine.
#[derive(Debug)]
pub struct Initializer {
    store: Arc<dyn KeyValueStore>,
    store_key: String,
    builtins: Vec<ModuleManifest>,
    runtime: Vec<ModuleManifest>,
    booted: OnceCell<Booted>,
}

impl Initializer {
    /// Uses the built-in catalog and the default store key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Initializer {
            store,
            store_key: INSTALLED_MODULES_KEY.to_string(),
            builtins: builtin_manifests(),
            runtime: Vec::new(),
            booted: OnceCell::new(),
        }
    }

    pub fn with_store_key(mut self, key: impl Into<String>) -> Self {
        self.store_key = key.into();
        self
    }

    /// Replaces the built-in catalog.
    pub fn with_builtins(mut self, manifests: Vec<ModuleManifest>) -> Self {
        self.builtins = manifests;
        self
    }

    /// Adds manifests registered after the built-ins.
    pub fn with_manifests(mut self, manifests: Vec<ModuleManifest>) -> Self {
        self.runtime.extend(manifests);
        self
    }

    /// Returns the session's manager, bootstrapping on first call.
    pub async fn initialize(&self) -> Arc<ModuleManager> {
        self.booted
            .get_or_init(|| self.boot())
            .await
            .manager
            .clone()
    }

    /// Report of the bootstrap, once it has happened.
    pub fn report(&self) -> Option<&BootReport> {
        self.booted.get().map(|b| &b.report)
    }

    pub fn is_initialized(&self) -> bool {
        self.booted.initialized()
    }

    async fn boot(&self) -> Booted {
        let session_id = Uuid::new_v4();
        info!(session_id = %session_id, "Bootstrapping module engine");

        let mut registry = ManifestRegistry::new();
        let mut rejected = Vec::new();

        for manifest in self.builtins.iter().chain(self.runtime.iter()) {
            let id = manifest.id.clone();
            if let Err(err) = registry.register(manifest.clone()) {
                match err {
                    CoreError::DuplicateModule(_) => {
                        warn!(module_id = %id, "Duplicate manifest skipped")
                    }
                    other => warn!(module_id = %id, error = %other, "Invalid manifest skipped"),
                }
                rejected.push(id);
            }
        }

        let state_store = ModuleStateStore::with_key(self.store.clone(), self.store_key.clone());
        let (states, recovered) = match state_store.load().await {
            Ok(states) => (states, false),
            Err(err) => {
                error!(
                    key = %state_store.key(),
                    error = %err,
                    "Stored module state unusable, starting empty"
                );
                (Vec::new(), true)
            }
        };

        let orphans: Vec<String> = states
            .iter()
            .filter(|s| !registry.contains(&s.id))
            .map(|s| s.id.clone())
            .collect();
        for id in &orphans {
            warn!(
                module_id = %id,
                error = %CoreError::OrphanState(id.clone()),
                "State record has no manifest"
            );
        }

        let report = BootReport {
            session_id,
            booted_at: Utc::now(),
            manifests: registry.len(),
            states: states.len(),
            orphans,
            rejected,
            recovered,
        };

        info!(
            session_id = %session_id,
            manifests = report.manifests,
            states = report.states,
            orphans = report.orphans.len(),
            recovered = report.recovered,
            "Module engine ready"
        );

        Booted {
            manager: Arc::new(ModuleManager::new(registry, states, state_store)),
            report,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
