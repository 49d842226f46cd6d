//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazaar-core errors (this file)                                        │
//! │  ├── CoreError        - Module lifecycle / registry rule violations    │
//! │  └── ValidationError  - Manifest field validation failures             │
//! │                                                                         │
//! │  bazaar-store errors (separate crate)                                  │
//! │  └── StoreError       - Keyed store failures                           │
//! │                                                                         │
//! │  bazaar-modules errors                                                 │
//! │  └── EngineError      - Core + store + corrupt data + load failures    │
//! │                                                                         │
//! │  Console API errors (in app)                                           │
//! │  └── ApiError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → ApiError → User     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Module lifecycle and registry errors.
///
/// Every variant carries the module id it concerns. None of them are fatal:
/// callers surface them as messages and keep running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No manifest is registered under this id, so it cannot be installed.
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// The module already has a live state record.
    ///
    /// ## When This Occurs
    /// - `install` on a module whose status is installed, enabled or disabled
    #[error("Module {0} is already installed")]
    AlreadyInstalled(String),

    /// The module has no state record, so it cannot change status.
    ///
    /// ## When This Occurs
    /// - `enable` / `disable` before `install`
    /// - `enable` / `disable` after `uninstall`
    #[error("Module {0} is not installed")]
    NotInstalled(String),

    /// Lookup of a manifest by id failed.
    #[error("Module not found: {0}")]
    NotFound(String),

    /// A manifest with this id is already registered in this session.
    #[error("Module {0} is already registered")]
    DuplicateModule(String),

    /// A persisted state references a manifest that is not registered.
    ///
    /// Warning level: the state is kept in storage and hidden from
    /// installed listings until reconciled.
    #[error("State for module {0} has no registered manifest")]
    OrphanState(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the module id the error refers to, when there is one.
    pub fn module_id(&self) -> Option<&str> {
        match self {
            CoreError::UnknownModule(id)
            | CoreError::AlreadyInstalled(id)
            | CoreError::NotInstalled(id)
            | CoreError::NotFound(id)
            | CoreError::DuplicateModule(id)
            | CoreError::OrphanState(id) => Some(id),
            CoreError::Validation(_) => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Manifest validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., uppercase letters in a module id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
