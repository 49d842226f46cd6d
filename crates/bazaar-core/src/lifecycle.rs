//! # Module Lifecycle
//!
//! The status transition table shared by the manager and its tests.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Module Lifecycle                                    │
//! │                                                                         │
//! │   (absent)  ──install──►  Installed  ──enable──►  Enabled               │
//! │      ▲                        │                    │  ▲                 │
//! │      │                     disable              disable enable          │
//! │      │                        ▼                    ▼  │                 │
//! │      │                     Disabled ◄───────────────  │                 │
//! │      │                        └──────────enable───────┘                 │
//! │      │                                                                  │
//! │      └──────────── uninstall (from any state) ─────────────             │
//! │                                                                         │
//! │  enable / disable on (absent)  → NotInstalled                           │
//! │  install on Installed/Enabled/Disabled → AlreadyInstalled               │
//! │  uninstall on (absent) → no-op                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A stored record with status `Available` is treated exactly like an absent
//! record.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::ModuleStatus;

/// A requested lifecycle change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Install,
    Enable,
    Disable,
    Uninstall,
}

impl std::fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleAction::Install => write!(f, "install"),
            LifecycleAction::Enable => write!(f, "enable"),
            LifecycleAction::Disable => write!(f, "disable"),
            LifecycleAction::Uninstall => write!(f, "uninstall"),
        }
    }
}

/// Computes the status after `action`, starting from `current`.
///
/// `None` means no record (uninstalled). The result is `Ok(None)` when the
/// record must be deleted or stay absent.
///
/// ## Example
/// ```rust
/// use bazaar_core::lifecycle::{transition, LifecycleAction};
/// use bazaar_core::{CoreError, ModuleStatus};
///
/// let next = transition(None, "inventory", LifecycleAction::Install).unwrap();
/// assert_eq!(next, Some(ModuleStatus::Installed));
///
/// let err = transition(None, "inventory", LifecycleAction::Enable).unwrap_err();
/// assert_eq!(err, CoreError::NotInstalled("inventory".to_string()));
/// ```
pub fn transition(
    current: Option<ModuleStatus>,
    id: &str,
    action: LifecycleAction,
) -> CoreResult<Option<ModuleStatus>> {
    let current = current.filter(ModuleStatus::is_installed);

    match (current, action) {
        (_, LifecycleAction::Uninstall) => Ok(None),
        (None, LifecycleAction::Install) => Ok(Some(ModuleStatus::Installed)),
        (Some(_), LifecycleAction::Install) => Err(CoreError::AlreadyInstalled(id.to_string())),
        (None, LifecycleAction::Enable | LifecycleAction::Disable) => {
            Err(CoreError::NotInstalled(id.to_string()))
        }
        (Some(_), LifecycleAction::Enable) => Ok(Some(ModuleStatus::Enabled)),
        (Some(_), LifecycleAction::Disable) => Ok(Some(ModuleStatus::Disabled)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
