//! # Domain Types
//!
//! Core module types used throughout Bazaar.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │ ModuleManifest  │◄───────│   ModuleState   │   weak back-reference  │
//! │  │  ─────────────  │  id    │  ─────────────  │   (lookup only)        │
//! │  │  id (unique)    │        │  id             │                        │
//! │  │  name           │        │  status         │                        │
//! │  │  description    │        │  installed_at   │                        │
//! │  │  category       │        │  updated_at     │                        │
//! │  │  enabled        │        └─────────────────┘                        │
//! │  │  component      │                                                   │
//! │  └─────────────────┘        ┌─────────────────┐                        │
//! │                             │  ModuleStatus   │                        │
//! │                             │  Available      │                        │
//! │                             │  Installed      │                        │
//! │                             │  Enabled        │                        │
//! │                             │  Disabled       │                        │
//! │                             └─────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A manifest is static: it is registered once per session and never edited
//! in place. A state is the mutable per-installation record; at most one
//! exists per module id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Module Category
// =============================================================================

/// Display grouping for modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleCategory {
    /// Checkout and pricing helpers.
    Sales,
    /// Stock and product tools.
    Inventory,
    /// Customer records.
    Customers,
    /// General-purpose utilities.
    #[default]
    Tools,
    /// Look and feel.
    Appearance,
}

impl std::fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleCategory::Sales => write!(f, "sales"),
            ModuleCategory::Inventory => write!(f, "inventory"),
            ModuleCategory::Customers => write!(f, "customers"),
            ModuleCategory::Tools => write!(f, "tools"),
            ModuleCategory::Appearance => write!(f, "appearance"),
        }
    }
}

// =============================================================================
// Module Manifest
// =============================================================================

/// Identity and static description of a pluggable module.
///
/// ## Manifest File Format
/// Runtime manifests use the same shape (`component` defaults to the id):
/// ```toml
/// [[module]]
/// id = "gift-cards"
/// name = "Gift Cards"
/// description = "Issue and redeem store gift cards"
/// category = "sales"
/// enabled = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Unique identifier, stable across sessions.
    pub id: String,

    /// Display name.
    pub name: String,

    /// One-line description shown in module listings.
    #[serde(default)]
    pub description: String,

    /// Display grouping.
    #[serde(default)]
    pub category: ModuleCategory,

    /// Global kill switch. A disabled manifest is invisible regardless of
    /// install state.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Key of the renderable unit in the component table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl ModuleManifest {
    /// Creates an enabled manifest whose component key equals its id.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        ModuleManifest {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: ModuleCategory::default(),
            enabled: true,
            component: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: ModuleCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the global enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Points the manifest at a component key other than its id.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Returns the key used to resolve the component.
    pub fn component_key(&self) -> &str {
        self.component.as_deref().unwrap_or(&self.id)
    }
}

// =============================================================================
// Module Status
// =============================================================================

/// Installation status of a module.
///
/// `Available` exists for compatibility with stored collections: a record
/// with this status counts as not installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Known but not installed.
    #[default]
    Available,
    /// Installed, not yet switched on.
    Installed,
    /// Installed and active.
    Enabled,
    /// Installed and switched off.
    Disabled,
}

impl ModuleStatus {
    /// Returns true if a record with this status blocks a new install.
    #[inline]
    pub const fn is_installed(&self) -> bool {
        !matches!(self, ModuleStatus::Available)
    }

    /// Returns true if the module shows up as active.
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, ModuleStatus::Enabled)
    }
}

impl std::fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleStatus::Available => write!(f, "available"),
            ModuleStatus::Installed => write!(f, "installed"),
            ModuleStatus::Enabled => write!(f, "enabled"),
            ModuleStatus::Disabled => write!(f, "disabled"),
        }
    }
}

// =============================================================================
// Module State
// =============================================================================

/// Per-installation record of a module.
///
/// ## Serialization
/// One element of the JSON array stored under `installed_modules`:
/// ```json
/// {
///   "id": "tax-calculator",
///   "status": "enabled",
///   "installed_at": "2026-10-17T09:30:00Z",
///   "updated_at": "2026-10-17T09:31:12Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleState {
    /// Id of the manifest this record belongs to.
    pub id: String,

    /// Current lifecycle status.
    pub status: ModuleStatus,

    /// When the module was installed.
    pub installed_at: DateTime<Utc>,

    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}

impl ModuleState {
    /// Creates a freshly installed record stamped with `now`.
    pub fn installed(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        ModuleState {
            id: id.into(),
            status: ModuleStatus::Installed,
            installed_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy with a new status and `updated_at`.
    pub fn with_status(&self, status: ModuleStatus, now: DateTime<Utc>) -> Self {
        ModuleState {
            id: self.id.clone(),
            status,
            installed_at: self.installed_at,
            updated_at: now,
        }
    }
}

// =============================================================================
// Installed Module View
// =============================================================================

/// A manifest paired with its state, as returned by installed listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledModule {
    pub manifest: ModuleManifest,
    pub state: ModuleState,
}

// =============================================================================
// Unit Tests
// =============================================================================
