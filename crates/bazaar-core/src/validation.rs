//! # Validation Module
//!
//! Manifest validation for runtime registrations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Manifest file (TOML)                                         │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── id format and length                                              │
//! │  └── name presence and length                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Registry                                                     │
//! │  └── id uniqueness (DuplicateModule)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::validation::validate_module_id;
//!
//! assert!(validate_module_id("tax-calculator").is_ok());
//! assert!(validate_module_id("Tax Calculator").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::ModuleManifest;
use crate::{MAX_MODULE_ID_LEN, MAX_MODULE_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a module id.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Lowercase ASCII letters, digits, hyphens and underscores only
pub fn validate_module_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > MAX_MODULE_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_MODULE_ID_LEN,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must contain only lowercase letters, digits, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a module display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_module_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_MODULE_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_MODULE_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates every checked field of a manifest.
///
/// The component key, when given, follows the id rules.
pub fn validate_manifest(manifest: &ModuleManifest) -> ValidationResult<()> {
    validate_module_id(&manifest.id)?;
    validate_module_name(&manifest.name)?;

    if let Some(component) = &manifest.component {
        validate_module_id(component).map_err(|e| match e {
            ValidationError::Required { .. } => ValidationError::Required {
                field: "component".to_string(),
            },
            ValidationError::TooLong { max, .. } => ValidationError::TooLong {
                field: "component".to_string(),
                max,
            },
            ValidationError::InvalidFormat { reason, .. } => ValidationError::InvalidFormat {
                field: "component".to_string(),
                reason,
            },
            other => other,
        })?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_module_id() {
        assert!(validate_module_id("tax-calculator").is_ok());
        assert!(validate_module_id("qr_generator2").is_ok());

        assert!(validate_module_id("").is_err());
        assert!(validate_module_id("   ").is_err());
        assert!(validate_module_id("Tax").is_err());
        assert!(validate_module_id("has space").is_err());
        assert!(validate_module_id(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_module_name() {
        assert!(validate_module_name("Tax Calculator").is_ok());
        assert!(validate_module_name("").is_err());
        assert!(validate_module_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_manifest_component_field() {
        let manifest = ModuleManifest::new("themes", "Themes").with_component("Bad Key");
        let err = validate_manifest(&manifest).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFormat { ref field, .. } if field == "component"
        ));
    }
}
