//! # Built-in Components
//!
//! Entry points of the modules that ship with the app. Each one renders a
//! short landing view; the business screens behind them live elsewhere.

use bazaar_core::catalog::BUILTIN_MODULE_IDS;

use crate::component::{Component, ComponentError, ComponentTable, View};

struct TaxCalculator;

impl Component for TaxCalculator {
    fn render(&self) -> View {
        View::new("Tax Calculator")
            .line("Enter a price or scan a basket to see the tax due.")
            .line("Rates come from the store tax profile.")
    }
}

struct QrGenerator;

impl Component for QrGenerator {
    fn render(&self) -> View {
        View::new("QR Generator").line("Pick a product, link or payment handle to encode.")
    }
}

struct Inventory;

impl Component for Inventory {
    fn render(&self) -> View {
        View::new("Inventory")
            .line("Stock levels by product.")
            .line("Items under their reorder point are flagged.")
    }
}

struct Customers;

impl Component for Customers {
    fn render(&self) -> View {
        View::new("Customer Management").line("Search customers by name, phone or email.")
    }
}

struct CurrencyFormatter;

impl Component for CurrencyFormatter {
    fn render(&self) -> View {
        View::new("Currency Formatter").line("Preview: 1234.5 → $1,234.50")
    }
}

struct QuickKeys;

impl Component for QuickKeys {
    fn render(&self) -> View {
        View::new("POS Quick Keys").line("Drag best sellers onto the key grid.")
    }
}

struct ThemeSwitcher;

impl Component for ThemeSwitcher {
    fn render(&self) -> View {
        View::new("Theme Switcher").line("Light | Dark")
    }
}

async fn load_tax_calculator() -> Result<Box<dyn Component>, ComponentError> {
    Ok(Box::new(TaxCalculator))
}

async fn load_qr_generator() -> Result<Box<dyn Component>, ComponentError> {
    Ok(Box::new(QrGenerator))
}

async fn load_inventory() -> Result<Box<dyn Component>, ComponentError> {
    Ok(Box::new(Inventory))
}

async fn load_customers() -> Result<Box<dyn Component>, ComponentError> {
    Ok(Box::new(Customers))
}

async fn load_currency_formatter() -> Result<Box<dyn Component>, ComponentError> {
    Ok(Box::new(CurrencyFormatter))
}

async fn load_quick_keys() -> Result<Box<dyn Component>, ComponentError> {
    Ok(Box::new(QuickKeys))
}

async fn load_theme_switcher() -> Result<Box<dyn Component>, ComponentError> {
    Ok(Box::new(ThemeSwitcher))
}

/// Component table with a loader for every built-in module.
pub fn builtin_components() -> ComponentTable {
    let table = ComponentTable::new()
        .with("tax-calculator", load_tax_calculator)
        .with("qr-generator", load_qr_generator)
        .with("inventory", load_inventory)
        .with("customers", load_customers)
        .with("currency-formatter", load_currency_formatter)
        .with("quick-keys", load_quick_keys)
        .with("theme-switcher", load_theme_switcher);

    debug_assert!(BUILTIN_MODULE_IDS.iter().all(|id| table.contains(id)));
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::catalog::builtin_manifests;

    #[tokio::test]
    async fn test_every_builtin_has_a_renderable_component() {
        let table = builtin_components();
        assert_eq!(table.len(), BUILTIN_MODULE_IDS.len());

        for manifest in builtin_manifests() {
            let loader = table
                .loader(manifest.component_key())
                .unwrap_or_else(|| panic!("no component for {}", manifest.id));
            let view = loader().await.unwrap().render();
            assert_eq!(view.title, manifest.name);
            assert!(!view.body.is_empty());
        }
    }
}
