//! # Modules State
//!
//! The opened store and the booted module engine for one console run.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ModulesState::open(&config)                                           │
//! │       │                                                                 │
//! │       ├── ensure the database directory exists                         │
//! │       ├── Store::new(config.store_config())  (migrations run here)     │
//! │       ├── ManifestFile::load(modules.manifests)                        │
//! │       │       └── unreadable → error log, built-ins only               │
//! │       ├── Initializer::initialize()                                    │
//! │       └── ModuleLoader::new(manager, builtin_components())             │
//! │               └── modules.deny non-empty → DenyModules policy          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::ModuleManifest;
use bazaar_modules::{
    builtin_components, BootReport, DenyModules, Initializer, ManifestFile, ModuleLoader,
    ModuleManager,
};
use bazaar_store::Store;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::ApiError;
use crate::state::ConfigState;

/// Store, engine and loader shared by every command.
#[derive(Debug)]
pub struct ModulesState {
    store: Store,
    initializer: Initializer,
    loader: ModuleLoader,
}

impl ModulesState {
    /// Opens the store and boots the engine.
    pub async fn open(config: &ConfigState) -> Result<Self, ApiError> {
        if let Some(path) = config.database_path() {
            ensure_parent_dir(&path)?;
            info!(?path, "Opening module store");
        } else {
            info!("Opening in-memory module store");
        }

        let store = Store::new(config.engine.store_config()).await?;

        let runtime = match config.engine.manifests_path() {
            Some(path) => load_runtime_manifests(path),
            None => Vec::new(),
        };

        let initializer = Initializer::new(Arc::new(store.clone()))
            .with_store_key(config.engine.store_key())
            .with_manifests(runtime);
        let manager = initializer.initialize().await;
        let mut loader = ModuleLoader::new(manager, builtin_components());

        let denied = config.engine.denied_modules();
        if !denied.is_empty() {
            info!(deny = ?denied, "Restricting module access");
            loader = loader.with_policy(Arc::new(DenyModules::new(denied.iter().cloned())));
        }

        Ok(ModulesState {
            store,
            initializer,
            loader,
        })
    }

    pub fn manager(&self) -> &Arc<ModuleManager> {
        self.loader.manager()
    }

    pub fn loader(&self) -> &ModuleLoader {
        &self.loader
    }

    /// Summary of this run's bootstrap.
    pub fn report(&self) -> Option<&BootReport> {
        self.initializer.report()
    }

    /// Closes the store's connections.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), ApiError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                ApiError::storage(format!(
                    "Could not create database directory {}: {}",
                    parent.display(),
                    e
                ))
            }),
        _ => Ok(()),
    }
}

fn load_runtime_manifests(path: &Path) -> Vec<ModuleManifest> {
    match ManifestFile::load(path) {
        Ok(file) => file.into_manifests(),
        Err(err) => {
            error!(?path, error = %err, "Runtime manifests unusable, using built-ins only");
            Vec::new()
        }
    }
}
