//! # Engine Error Types
//!
//! Error types for module engine operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Lifecycle    │  │    Storage      │  │     Rendering           │ │
//! │  │  (CoreError)    │  │                 │  │                         │ │
//! │  │  UnknownModule  │  │  Storage        │  │  ComponentLoadFailed    │ │
//! │  │  AlreadyInst.   │  │  StorageCorrupt │  │                         │ │
//! │  │  NotInstalled   │  │                 │  │                         │ │
//! │  │  NotFound       │  │                 │  │                         │ │
//! │  │  DuplicateModule│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Configuration  │  │ Manifest files  │                              │
//! │  │  InvalidConfig  │  │ ManifestFile-   │                              │
//! │  │  ConfigLoad/Save│  │ Invalid         │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::{CoreError, ValidationError};
use bazaar_store::StoreError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type covering every module engine failure.
#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Lifecycle Errors
    // =========================================================================
    /// Domain error from the lifecycle rules or registry.
    #[error(transparent)]
    Module(#[from] CoreError),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// The persisted state collection could not be parsed or encoded.
    ///
    /// ## When This Occurs
    /// - The stored value is not JSON
    /// - The JSON is not an array of state records
    /// - A record carries an unknown status
    ///
    /// The initializer recovers from this with an empty collection.
    #[error("Stored module state is corrupt: {0}")]
    StorageCorrupt(String),

    /// The store itself failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    // =========================================================================
    // Rendering Errors
    // =========================================================================
    /// A module's component could not be produced.
    #[error("Component for module {id} failed to load: {reason}")]
    ComponentLoadFailed { id: String, reason: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid engine configuration.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// A runtime manifest file could not be read or parsed.
    #[error("Invalid manifest file {path}: {reason}")]
    ManifestFileInvalid { path: String, reason: String },
}

impl EngineError {
    /// Creates a ComponentLoadFailed error.
    pub fn component_load_failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::ComponentLoadFailed {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Returns the module id the error refers to, if any.
    pub fn module_id(&self) -> Option<&str> {
        match self {
            EngineError::Module(err) => err.module_id(),
            EngineError::ComponentLoadFailed { id, .. } => Some(id),
            _ => None,
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Module(CoreError::Validation(err))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id_passthrough() {
        let err = EngineError::from(CoreError::AlreadyInstalled("inventory".into()));
        assert_eq!(err.module_id(), Some("inventory"));
        assert_eq!(err.to_string(), "Module inventory is already installed");

        let err = EngineError::component_load_failed("qr-generator", "boom");
        assert_eq!(err.module_id(), Some("qr-generator"));

        let err = EngineError::StorageCorrupt("expected array".into());
        assert_eq!(err.module_id(), None);
    }

    #[test]
    fn test_validation_converts_through_core() {
        let err = EngineError::from(ValidationError::Required {
            field: "id".into(),
        });
        assert!(matches!(err, EngineError::Module(CoreError::Validation(_))));
    }
}
