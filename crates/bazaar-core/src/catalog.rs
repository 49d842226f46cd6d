//! # Built-in Catalog
//!
//! Manifests of the modules that ship with the app. The initializer
//! registers them, in this order, before any runtime manifests.

use crate::types::{ModuleCategory, ModuleManifest};

/// Ids of the built-in modules, in registration order.
pub const BUILTIN_MODULE_IDS: [&str; 7] = [
    "tax-calculator",
    "qr-generator",
    "inventory",
    "customers",
    "currency-formatter",
    "quick-keys",
    "theme-switcher",
];

/// Returns the built-in manifests in registration order.
pub fn builtin_manifests() -> Vec<ModuleManifest> {
    vec![
        ModuleManifest::new("tax-calculator", "Tax Calculator")
            .with_description("Work out sales tax for a basket or a single price")
            .with_category(ModuleCategory::Sales),
        ModuleManifest::new("qr-generator", "QR Generator")
            .with_description("Print QR codes for products, links and payment handles")
            .with_category(ModuleCategory::Tools),
        ModuleManifest::new("inventory", "Inventory")
            .with_description("Track stock levels and low-stock alerts")
            .with_category(ModuleCategory::Inventory),
        ModuleManifest::new("customers", "Customer Management")
            .with_description("Keep customer contacts and purchase notes")
            .with_category(ModuleCategory::Customers),
        ModuleManifest::new("currency-formatter", "Currency Formatter")
            .with_description("Preview prices in the store currency format")
            .with_category(ModuleCategory::Tools),
        ModuleManifest::new("quick-keys", "POS Quick Keys")
            .with_description("One-tap buttons for best-selling items")
            .with_category(ModuleCategory::Sales),
        ModuleManifest::new("theme-switcher", "Theme Switcher")
            .with_description("Switch between light and dark register themes")
            .with_category(ModuleCategory::Appearance),
    ]
}
