//! # Access Policy
//!
//! Decides whether the current user may open a module. The app ships with
//! [`AllowAll`]; real permission checks are not wired up yet.

use bazaar_core::ModuleManifest;
use std::collections::HashSet;

/// Permission check consulted by the loader before rendering.
pub trait AccessPolicy: Send + Sync + std::fmt::Debug {
    /// Returns true if the module may be rendered.
    fn can_access(&self, manifest: &ModuleManifest) -> bool;
}

/// Permits everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn can_access(&self, _manifest: &ModuleManifest) -> bool {
        true
    }
}

/// Denies a fixed set of module ids.
#[derive(Debug, Clone, Default)]
pub struct DenyModules {
    denied: HashSet<String>,
}

impl DenyModules {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DenyModules {
            denied: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl AccessPolicy for DenyModules {
    fn can_access(&self, manifest: &ModuleManifest) -> bool {
        !self.denied.contains(&manifest.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies() {
        let inventory = ModuleManifest::new("inventory", "Inventory");
        let customers = ModuleManifest::new("customers", "Customers");

        assert!(AllowAll.can_access(&inventory));

        let policy = DenyModules::new(["customers"]);
        assert!(policy.can_access(&inventory));
        assert!(!policy.can_access(&customers));
    }
}
