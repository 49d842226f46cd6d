//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Bazaar console                     │
//! │                                                                         │
//! │  bazaar install inventory                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ─── StoreError::QueryFailed("...") ─┐             │  │
//! │  │         │                                         │             │  │
//! │  │         ▼                                         ▼             │  │
//! │  │  Lifecycle Error? ─── CoreError::NotInstalled ── ApiError ─────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: error: Module inventory is not installed                       │
//! │  --json: {"code": "NOT_INSTALLED", "message": "..."}                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::CoreError;
use bazaar_modules::EngineError;
use bazaar_store::StoreError;
use serde::Serialize;

/// API error returned from console commands.
///
/// ## Serialization
/// This is what `--json` prints when a command fails:
/// ```json
/// {
///   "code": "UNKNOWN_MODULE",
///   "message": "Unknown module: ghost"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for scripting
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Module id has no manifest
    UnknownModule,

    /// Resource not found
    NotFound,

    /// Install requested for an installed module
    AlreadyInstalled,

    /// Enable/disable requested for a module with no state
    NotInstalled,

    /// Input validation failed
    ValidationError,

    /// Persisting or reading state failed
    StorageError,

    /// Configuration or manifest file unusable
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConnectionFailed(e) => {
                tracing::error!("Store connection failed: {}", e);
                ApiError::storage("Could not open the module store")
            }
            StoreError::MigrationFailed(e) => {
                tracing::error!("Store migration failed: {}", e);
                ApiError::storage("Module store migration failed")
            }
            StoreError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Store query failed: {}", e);
                ApiError::storage("Module store operation failed")
            }
            StoreError::PoolExhausted => ApiError::storage("Module store is busy"),
            StoreError::Internal(e) => {
                tracing::error!("Internal store error: {}", e);
                ApiError::storage("Module store operation failed")
            }
        }
    }
}

/// Converts lifecycle errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::UnknownModule(_) => ApiError::new(ErrorCode::UnknownModule, message),
            CoreError::NotFound(id) => ApiError::not_found("Module", &id),
            CoreError::AlreadyInstalled(_) => ApiError::new(ErrorCode::AlreadyInstalled, message),
            CoreError::NotInstalled(_) => ApiError::new(ErrorCode::NotInstalled, message),
            CoreError::DuplicateModule(_) | CoreError::OrphanState(_) => {
                ApiError::new(ErrorCode::ValidationError, message)
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts engine errors to API errors.
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Module(e) => e.into(),
            EngineError::Storage(e) => e.into(),
            EngineError::StorageCorrupt(e) => {
                tracing::error!("Stored module state is corrupt: {}", e);
                ApiError::storage("Stored module state is corrupt")
            }
            EngineError::ComponentLoadFailed { .. } => ApiError::internal(err.to_string()),
            EngineError::InvalidConfig(_)
            | EngineError::ConfigLoadFailed(_)
            | EngineError::ConfigSaveFailed(_)
            | EngineError::ManifestFileInvalid { .. } => {
                ApiError::new(ErrorCode::ConfigError, err.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
