//! # Module Loader
//!
//! Decides what to show when a module is opened.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  loader.open("inventory")                                              │
//! │       │                                                                 │
//! │       ├── no manifest ───────────────────────────► NotFound            │
//! │       ├── manifest.enabled == false ─────────────► NotFound            │
//! │       ├── policy.can_access == false ────────────► AccessDenied        │
//! │       ▼                                                                 │
//! │  component table lookup (manifest.component_key())                     │
//! │       ├── no entry ──────────────────────────────► Error               │
//! │       ▼                                                                 │
//! │  loader().await                                                        │
//! │       ├── Err(ComponentError) ───────────────────► Error               │
//! │       ├── panic ─────────────────────────────────► Error               │
//! │       ▼                                                                 │
//! │  component.render() ─────────────────────────────► Rendered            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Install status is not consulted here. Whoever calls the loader decides
//! whether an uninstalled module may be previewed.

use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

use bazaar_core::ModuleManifest;

use crate::access::{AccessPolicy, AllowAll};
use crate::component::{ComponentTable, View};
use crate::error::{EngineError, EngineResult};
use crate::manager::ModuleManager;

/// Outcome of opening a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleView {
    Rendered { module_id: String, view: View },
    NotFound { module_id: String },
    AccessDenied { module_id: String },
    Error { module_id: String, message: String },
}

impl ModuleView {
    pub fn module_id(&self) -> &str {
        match self {
            ModuleView::Rendered { module_id, .. }
            | ModuleView::NotFound { module_id }
            | ModuleView::AccessDenied { module_id }
            | ModuleView::Error { module_id, .. } => module_id,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, ModuleView::Rendered { .. })
    }
}

/// Resolves module ids to views.
#[derive(Debug, Clone)]
pub struct ModuleLoader {
    manager: Arc<ModuleManager>,
    components: ComponentTable,
    policy: Arc<dyn AccessPolicy>,
}

impl ModuleLoader {
    /// Creates a loader that permits every module.
    pub fn new(manager: Arc<ModuleManager>, components: ComponentTable) -> Self {
        ModuleLoader {
            manager,
            components,
            policy: Arc::new(AllowAll),
        }
    }

    /// Replaces the access policy.
    pub fn with_policy(mut self, policy: Arc<dyn AccessPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn manager(&self) -> &Arc<ModuleManager> {
        &self.manager
    }

    /// Opens `id`. Never fails and never panics; problems become views.
    pub async fn open(&self, id: &str) -> ModuleView {
        let module_id = id.to_string();

        let manifest = match self.manager.get_by_id(id).await {
            Ok(manifest) if manifest.enabled => manifest,
            Ok(_) => {
                debug!(module_id = %id, "Module is switched off");
                return ModuleView::NotFound { module_id };
            }
            Err(_) => {
                debug!(module_id = %id, "No manifest for module");
                return ModuleView::NotFound { module_id };
            }
        };

        if !self.policy.can_access(&manifest) {
            debug!(module_id = %id, "Access denied");
            return ModuleView::AccessDenied { module_id };
        }

        match self.render(&manifest).await {
            Ok(view) => ModuleView::Rendered { module_id, view },
            Err(err) => {
                error!(module_id = %id, error = %err, "Component failed to load");
                ModuleView::Error {
                    module_id,
                    message: err.to_string(),
                }
            }
        }
    }

    async fn render(&self, manifest: &ModuleManifest) -> EngineResult<View> {
        let id = manifest.id.as_str();
        let key = manifest.component_key();

        let loader = self.components.loader(key).ok_or_else(|| {
            EngineError::component_load_failed(id, format!("no component registered as '{key}'"))
        })?;

        let pending = catch_unwind(AssertUnwindSafe(|| loader()))
            .map_err(|payload| EngineError::component_load_failed(id, panic_message(payload)))?;

        let component = AssertUnwindSafe(pending)
            .catch_unwind()
            .await
            .map_err(|payload| EngineError::component_load_failed(id, panic_message(payload)))?
            .map_err(|err| EngineError::component_load_failed(id, err.to_string()))?;

        catch_unwind(AssertUnwindSafe(|| component.render()))
            .map_err(|payload| EngineError::component_load_failed(id, panic_message(payload)))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("panicked: {detail}")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::DenyModules;
    use crate::catalog::builtin_components;
    use crate::component::{Component, ComponentError};
    use crate::registry::ManifestRegistry;
    use crate::state_store::ModuleStateStore;
    use bazaar_core::catalog::builtin_manifests;
    use bazaar_store::MemoryStore;

    struct Exploding;

    impl Component for Exploding {
        fn render(&self) -> View {
            panic!("render exploded")
        }
    }

    async fn load_failing() -> Result<Box<dyn Component>, ComponentError> {
        Err(ComponentError::InitFailed("printer driver missing".into()))
    }

    async fn load_panicking() -> Result<Box<dyn Component>, ComponentError> {
        panic!("loader exploded")
    }

    async fn load_exploding() -> Result<Box<dyn Component>, ComponentError> {
        Ok(Box::new(Exploding))
    }

    fn manager() -> Arc<ModuleManager> {
        let mut registry = ManifestRegistry::new();
        for manifest in builtin_manifests() {
            registry.register(manifest).unwrap();
        }
        for (id, name) in [
            ("failing", "Failing"),
            ("panicking", "Panicking"),
            ("exploding", "Exploding"),
            ("unbundled", "Unbundled"),
        ] {
            registry.register(ModuleManifest::new(id, name)).unwrap();
        }
        registry
            .register(ModuleManifest::new("killed", "Killed").with_enabled(false))
            .unwrap();

        Arc::new(ModuleManager::new(
            registry,
            Vec::new(),
            ModuleStateStore::new(Arc::new(MemoryStore::new())),
        ))
    }

    fn loader() -> ModuleLoader {
        let components = builtin_components()
            .with("failing", load_failing)
            .with("panicking", load_panicking)
            .with("exploding", load_exploding)
            .with("killed", load_failing);
        ModuleLoader::new(manager(), components)
    }

    #[tokio::test]
    async fn test_renders_builtin() {
        let view = loader().open("inventory").await;
        match view {
            ModuleView::Rendered { module_id, view } => {
                assert_eq!(module_id, "inventory");
                assert_eq!(view.title, "Inventory");
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_install_status_not_consulted() {
        let loader = loader();
        assert_eq!(loader.manager().status_of("customers").await, None);
        assert!(loader.open("customers").await.is_rendered());
    }

    #[tokio::test]
    async fn test_unknown_and_killed_are_not_found() {
        let loader = loader();

        assert_eq!(
            loader.open("nope").await,
            ModuleView::NotFound {
                module_id: "nope".into()
            }
        );

        // Kill switch wins over install status
        loader.manager().install("killed").await.unwrap();
        loader.manager().enable("killed").await.unwrap();
        assert_eq!(
            loader.open("killed").await,
            ModuleView::NotFound {
                module_id: "killed".into()
            }
        );
    }

    #[tokio::test]
    async fn test_access_denied() {
        let loader = loader().with_policy(Arc::new(DenyModules::new(["customers"])));

        assert_eq!(
            loader.open("customers").await,
            ModuleView::AccessDenied {
                module_id: "customers".into()
            }
        );
        assert!(loader.open("inventory").await.is_rendered());
    }

    #[tokio::test]
    async fn test_load_failures_become_error_views() {
        let loader = loader();

        for id in ["failing", "panicking", "exploding", "unbundled"] {
            match loader.open(id).await {
                ModuleView::Error { module_id, message } => {
                    assert_eq!(module_id, id);
                    assert!(!message.is_empty());
                }
                other => panic!("{id}: unexpected view {other:?}"),
            }
        }

        // The loader is still usable afterwards
        assert!(loader.open("tax-calculator").await.is_rendered());
    }

    #[tokio::test]
    async fn test_error_messages() {
        let loader = loader();

        let ModuleView::Error { message, .. } = loader.open("panicking").await else {
            panic!("expected error view");
        };
        assert!(message.contains("loader exploded"));

        let ModuleView::Error { message, .. } = loader.open("unbundled").await else {
            panic!("expected error view");
        };
        assert!(message.contains("no component registered"));
    }

    #[test]
    fn test_view_serialization() {
        let json = serde_json::to_value(ModuleView::AccessDenied {
            module_id: "customers".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "access_denied");
        assert_eq!(json["module_id"], "customers");
    }
}
