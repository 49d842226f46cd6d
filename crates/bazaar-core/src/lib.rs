//! # bazaar-core: Pure Module Model for Bazaar
//!
//! This crate is the vocabulary of the module engine. It contains the
//! manifest and state types, the lifecycle state machine and input
//! validation, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/console (commands)                      │   │
//! │  │     list ──► install ──► enable ──► open                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            bazaar-modules (Manager, Initializer, Loader)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ lifecycle │  │  catalog  │  │ validation│  │   │
//! │  │   │ Manifest  │  │  Action   │  │ built-in  │  │  id/name  │  │   │
//! │  │   │  State    │  │ Status →  │  │ manifests │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO RENDERING • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `ModuleManifest`, `ModuleState`, `ModuleStatus`
//! - [`lifecycle`] - Lifecycle actions and the status transition table
//! - [`catalog`] - Manifests of the modules that ship with the app
//! - [`error`] - Domain error types
//! - [`validation`] - Manifest field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::lifecycle::{transition, LifecycleAction};
//! use bazaar_core::ModuleStatus;
//!
//! let next = transition(
//!     Some(ModuleStatus::Installed),
//!     "tax-calculator",
//!     LifecycleAction::Enable,
//! )
//! .unwrap();
//! assert_eq!(next, Some(ModuleStatus::Enabled));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use lifecycle::LifecycleAction;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key under which the whole state collection is persisted.
///
/// The collection is written as one JSON array (read-modify-write of the
/// entire value, never incremental).
pub const INSTALLED_MODULES_KEY: &str = "installed_modules";

/// Maximum length of a module id.
pub const MAX_MODULE_ID_LEN: usize = 64;

/// Maximum length of a module display name.
pub const MAX_MODULE_NAME_LEN: usize = 100;
