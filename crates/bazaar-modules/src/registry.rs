//! # Manifest Registry
//!
//! The set of modules known to this session, in registration order.
//!
//! ```text
//! manifests: [tax-calculator, qr-generator, inventory, ...]   ← listing order
//! index:     { "inventory" → 2, "qr-generator" → 1, ... }      ← O(1) lookup
//! ```

use bazaar_core::validation::validate_manifest;
use bazaar_core::{CoreError, CoreResult, ModuleManifest};
use std::collections::HashMap;

/// Ordered, id-unique collection of manifests.
///
/// A manifest never changes once registered; replacing one means
/// [`unregister`](Self::unregister) followed by [`register`](Self::register).
#[derive(Debug, Clone, Default)]
pub struct ManifestRegistry {
    manifests: Vec<ModuleManifest>,
    index: HashMap<String, usize>,
}

impl ManifestRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a manifest at the end of the order.
    ///
    /// ## Errors
    /// - `Validation` if the id, name or component key is malformed
    /// - `DuplicateModule` if the id is already registered
    pub fn register(&mut self, manifest: ModuleManifest) -> CoreResult<()> {
        validate_manifest(&manifest)?;

        if self.index.contains_key(&manifest.id) {
            return Err(CoreError::DuplicateModule(manifest.id));
        }

        self.index.insert(manifest.id.clone(), self.manifests.len());
        self.manifests.push(manifest);
        Ok(())
    }

    /// Removes a manifest, keeping the order of the rest.
    pub fn unregister(&mut self, id: &str) -> Option<ModuleManifest> {
        let position = self.index.remove(id)?;
        let removed = self.manifests.remove(position);

        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }

        Some(removed)
    }

    /// Looks up a manifest by id.
    pub fn get(&self, id: &str) -> Option<&ModuleManifest> {
        self.index.get(id).map(|&i| &self.manifests[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleManifest> {
        self.manifests.iter()
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}
