//! # Module Commands
//!
//! Console commands for browsing, installing and opening modules.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   (no record) ── install ──► installed ── enable ──► enabled            │
//! │        ▲                        │   ▲                  │  ▲             │
//! │        │                        │   └──── enable ──────┼──┘             │
//! │        │                        ▼                      ▼                │
//! │        └────── uninstall ─── disabled ◄──── disable ───┘                │
//! │                                                                         │
//! │   uninstall works from every installed status                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::{InstalledModule, ModuleCategory, ModuleManifest, ModuleState, ModuleStatus};
use bazaar_modules::ModuleView;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::ModulesState;

// =============================================================================
// DTOs
// =============================================================================

/// Module catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ModuleCategory,
    /// Global switch from the manifest, independent of install status.
    pub enabled: bool,
}

impl From<ModuleManifest> for ModuleDto {
    fn from(m: ModuleManifest) -> Self {
        ModuleDto {
            id: m.id,
            name: m.name,
            description: m.description,
            category: m.category,
            enabled: m.enabled,
        }
    }
}

/// A module's install record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleStateDto {
    pub id: String,
    pub status: ModuleStatus,
    pub installed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ModuleState> for ModuleStateDto {
    fn from(s: ModuleState) -> Self {
        ModuleStateDto {
            id: s.id,
            status: s.status,
            installed_at: s.installed_at,
            updated_at: s.updated_at,
        }
    }
}

/// An active module as shown in the toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledModuleDto {
    pub id: String,
    pub name: String,
    pub category: ModuleCategory,
    pub status: ModuleStatus,
    pub installed_at: DateTime<Utc>,
}

impl From<InstalledModule> for InstalledModuleDto {
    fn from(m: InstalledModule) -> Self {
        InstalledModuleDto {
            id: m.manifest.id,
            name: m.manifest.name,
            category: m.manifest.category,
            status: m.state.status,
            installed_at: m.state.installed_at,
        }
    }
}

/// Manifest plus install record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDetailDto {
    pub module: ModuleDto,
    pub component: String,
    pub state: Option<ModuleStateDto>,
}

/// Result of an uninstall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallDto {
    pub id: String,
    /// False when there was nothing to remove.
    pub removed: bool,
}

/// What `open` produced, with a hint when the module is not active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDto {
    pub view: ModuleView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

// =============================================================================
// Queries
// =============================================================================

/// Modules that can be installed, in catalog order.
pub async fn list_available(modules: &ModulesState) -> Vec<ModuleDto> {
    debug!("list_available command");
    modules
        .manager()
        .available_modules()
        .await
        .into_iter()
        .map(ModuleDto::from)
        .collect()
}

/// Enabled modules, in catalog order.
pub async fn list_installed(modules: &ModulesState) -> Vec<InstalledModuleDto> {
    debug!("list_installed command");
    modules
        .manager()
        .installed_modules()
        .await
        .into_iter()
        .map(InstalledModuleDto::from)
        .collect()
}

/// One module's manifest and install record.
///
/// ## Errors
/// `NOT_FOUND` when no manifest has this id.
pub async fn show_module(modules: &ModulesState, id: &str) -> Result<ModuleDetailDto, ApiError> {
    debug!(module_id = %id, "show_module command");
    let manager = modules.manager();

    let manifest = manager.get_by_id(id).await?;
    let component = manifest.component_key().to_string();
    let state = manager.state_of(id).await.map(ModuleStateDto::from);

    Ok(ModuleDetailDto {
        module: manifest.into(),
        component,
        state,
    })
}

/// State records with no registered manifest.
pub async fn list_orphans(modules: &ModulesState) -> Vec<ModuleStateDto> {
    debug!("list_orphans command");
    modules
        .manager()
        .orphans()
        .await
        .into_iter()
        .map(ModuleStateDto::from)
        .collect()
}

// =============================================================================
// Mutations
// =============================================================================

/// Installs a module.
///
/// ## Errors
/// - `UNKNOWN_MODULE`: no manifest has this id
/// - `ALREADY_INSTALLED`: the module has a state record
/// - `STORAGE_ERROR`: the change could not be saved; nothing changed
pub async fn install_module(modules: &ModulesState, id: &str) -> Result<ModuleStateDto, ApiError> {
    debug!(module_id = %id, "install_module command");
    let state = modules.manager().install(id).await?;
    Ok(state.into())
}

/// Switches an installed module on.
pub async fn enable_module(modules: &ModulesState, id: &str) -> Result<ModuleStateDto, ApiError> {
    debug!(module_id = %id, "enable_module command");
    let state = modules.manager().enable(id).await?;
    Ok(state.into())
}

/// Switches an installed module off.
pub async fn disable_module(modules: &ModulesState, id: &str) -> Result<ModuleStateDto, ApiError> {
    debug!(module_id = %id, "disable_module command");
    let state = modules.manager().disable(id).await?;
    Ok(state.into())
}

/// Removes a module's state record. Not an error when there is none.
pub async fn uninstall_module(modules: &ModulesState, id: &str) -> Result<UninstallDto, ApiError> {
    debug!(module_id = %id, "uninstall_module command");
    let removed = modules.manager().uninstall(id).await?;
    Ok(UninstallDto {
        id: id.to_string(),
        removed,
    })
}

/// Deletes every orphaned state record, returning the removed ids.
pub async fn purge_orphans(modules: &ModulesState) -> Result<Vec<String>, ApiError> {
    debug!("purge_orphans command");
    modules.manager().purge_orphans().await.map_err(ApiError::from)
}

// =============================================================================
// Open
// =============================================================================

/// Renders a module.
///
/// The loader renders any registered module; when the module is not
/// enabled the response carries a hint for getting it onto the toolbar.
pub async fn open_module(modules: &ModulesState, id: &str) -> OpenDto {
    debug!(module_id = %id, "open_module command");
    let view = modules.loader().open(id).await;

    let hint = if view.is_rendered() {
        match modules.manager().status_of(id).await {
            Some(ModuleStatus::Enabled) => None,
            Some(ModuleStatus::Installed) | Some(ModuleStatus::Disabled) => Some(format!(
                "This module is installed but not enabled. Run `bazaar enable {}` to add it to the toolbar.",
                id
            )),
            Some(ModuleStatus::Available) | None => Some(format!(
                "Preview only. Run `bazaar install {}` to add this module.",
                id
            )),
        }
    } else {
        None
    };

    OpenDto { view, hint }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::ConfigState;
    use bazaar_core::catalog::BUILTIN_MODULE_IDS;

    async fn modules() -> ModulesState {
        ModulesState::open(&ConfigState::ephemeral()).await.unwrap()
    }

    #[tokio::test]
    async fn test_install_enable_walkthrough() {
        let modules = modules().await;

        let state = install_module(&modules, "tax-calculator").await.unwrap();
        assert_eq!(state.status, ModuleStatus::Installed);
        assert!(list_installed(&modules).await.is_empty());

        let state = enable_module(&modules, "tax-calculator").await.unwrap();
        assert_eq!(state.status, ModuleStatus::Enabled);

        let installed = list_installed(&modules).await;
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].name, "Tax Calculator");

        let available = list_available(&modules).await;
        assert_eq!(available.len(), BUILTIN_MODULE_IDS.len() - 1);
        assert!(available.iter().all(|m| m.id != "tax-calculator"));
    }

    #[tokio::test]
    async fn test_lifecycle_errors() {
        let modules = modules().await;

        let err = install_module(&modules, "ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownModule);

        let err = enable_module(&modules, "inventory").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotInstalled);

        install_module(&modules, "inventory").await.unwrap();
        let err = install_module(&modules, "inventory").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyInstalled);
    }

    #[tokio::test]
    async fn test_uninstall_reports_whether_anything_was_removed() {
        let modules = modules().await;

        let result = uninstall_module(&modules, "qr-generator").await.unwrap();
        assert!(!result.removed);

        install_module(&modules, "qr-generator").await.unwrap();
        disable_module(&modules, "qr-generator").await.unwrap();
        let result = uninstall_module(&modules, "qr-generator").await.unwrap();
        assert!(result.removed);
        assert!(show_module(&modules, "qr-generator")
            .await
            .unwrap()
            .state
            .is_none());
    }

    #[tokio::test]
    async fn test_show_module() {
        let modules = modules().await;

        let detail = show_module(&modules, "inventory").await.unwrap();
        assert_eq!(detail.module.name, "Inventory");
        assert_eq!(detail.component, "inventory");
        assert!(detail.state.is_none());

        let err = show_module(&modules, "ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_open_hints_until_enabled() {
        let modules = modules().await;

        let opened = open_module(&modules, "currency-formatter").await;
        assert!(opened.view.is_rendered());
        assert!(opened.hint.as_deref().unwrap().contains("bazaar install"));

        install_module(&modules, "currency-formatter").await.unwrap();
        let opened = open_module(&modules, "currency-formatter").await;
        assert!(opened.hint.as_deref().unwrap().contains("bazaar enable"));

        enable_module(&modules, "currency-formatter").await.unwrap();
        let opened = open_module(&modules, "currency-formatter").await;
        assert!(opened.view.is_rendered());
        assert!(opened.hint.is_none());
    }

    #[tokio::test]
    async fn test_open_unknown_module() {
        let modules = modules().await;

        let opened = open_module(&modules, "ghost").await;
        assert_eq!(
            opened.view,
            ModuleView::NotFound {
                module_id: "ghost".into()
            }
        );
        assert!(opened.hint.is_none());
    }

    #[tokio::test]
    async fn test_no_orphans_on_fresh_store() {
        let modules = modules().await;
        assert!(list_orphans(&modules).await.is_empty());
        assert!(purge_orphans(&modules).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dto_serialization() {
        let modules = modules().await;
        let state = install_module(&modules, "quick-keys").await.unwrap();

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["id"], "quick-keys");
        assert_eq!(json["status"], "installed");
        assert!(json["installedAt"].is_string());
    }
}
