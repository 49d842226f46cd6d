//! # Runtime Manifest Files
//!
//! Manifests registered at runtime, on top of the built-in catalog.
//!
//! ## Format
//! ```toml
//! [[module]]
//! id = "gift-cards"
//! name = "Gift Cards"
//! description = "Issue and redeem store gift cards"
//! category = "sales"
//!
//! [[module]]
//! id = "legacy-loyalty"
//! name = "Loyalty (old)"
//! enabled = false
//! ```
//!
//! Parsing only checks the shape. Ids and names are validated when the
//! manifests are registered.

use bazaar_core::ModuleManifest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{EngineError, EngineResult};

/// Contents of a runtime manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleManifest>,
}

impl ManifestFile {
    /// Parses manifest file contents. `origin` only labels errors.
    pub fn parse(contents: &str, origin: &str) -> EngineResult<Self> {
        toml::from_str(contents).map_err(|e| EngineError::ManifestFileInvalid {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// Reads and parses the manifest file at `path`.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let origin = path.display().to_string();

        let contents =
            std::fs::read_to_string(path).map_err(|e| EngineError::ManifestFileInvalid {
                path: origin.clone(),
                reason: e.to_string(),
            })?;

        let file = Self::parse(&contents, &origin)?;
        info!(path = %origin, count = file.modules.len(), "Loaded runtime manifests");
        Ok(file)
    }

    /// Consumes the file, yielding manifests in file order.
    pub fn into_manifests(self) -> Vec<ModuleManifest> {
        self.modules
    }
}
