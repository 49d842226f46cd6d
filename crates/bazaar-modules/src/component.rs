//! # Components
//!
//! The renderable side of a module, resolved lazily by key.
//!
//! ## Component Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ComponentTable                                                         │
//! │                                                                         │
//! │  "tax-calculator" ──► || async { Ok(Box::new(TaxCalculator)) }         │
//! │  "qr-generator"   ──► || async { Ok(Box::new(QrGenerator)) }           │
//! │  ...                                                                    │
//! │                                                                         │
//! │  Nothing is constructed until a loader is called. A loader may fail    │
//! │  with ComponentError; the caller decides what to show instead.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// What a component renders: a title and lines of body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub title: String,
    pub body: Vec<String>,
}

impl View {
    pub fn new(title: impl Into<String>) -> Self {
        View {
            title: title.into(),
            body: Vec::new(),
        }
    }

    /// Appends a body line.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }
}

/// A module's entry point.
pub trait Component: Send + Sync {
    fn render(&self) -> View;
}

/// Why a component could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    #[error("component unavailable: {0}")]
    Unavailable(String),

    #[error("component failed to initialize: {0}")]
    InitFailed(String),
}

/// Future produced by a component loader.
pub type ComponentFuture = BoxFuture<'static, Result<Box<dyn Component>, ComponentError>>;

/// A stored component loader.
pub type ComponentLoader = Arc<dyn Fn() -> ComponentFuture + Send + Sync>;

/// Component key → lazy loader.
#[derive(Clone, Default)]
pub struct ComponentTable {
    loaders: HashMap<String, ComponentLoader>,
}

impl ComponentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a loader under `key`, replacing any previous one.
    pub fn register<F, Fut>(&mut self, key: impl Into<String>, loader: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Box<dyn Component>, ComponentError>> + Send + 'static,
    {
        let loader: ComponentLoader = Arc::new(move || loader().boxed());
        self.loaders.insert(key.into(), loader);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F, Fut>(mut self, key: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Box<dyn Component>, ComponentError>> + Send + 'static,
    {
        self.register(key, loader);
        self
    }

    /// Returns the loader for `key`.
    pub fn loader(&self, key: &str) -> Option<ComponentLoader> {
        self.loaders.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.loaders.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl std::fmt::Debug for ComponentTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentTable")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Hello;

    impl Component for Hello {
        fn render(&self) -> View {
            View::new("Hello").line("world")
        }
    }

    async fn load_hello() -> Result<Box<dyn Component>, ComponentError> {
        Ok(Box::new(Hello))
    }

    async fn load_broken() -> Result<Box<dyn Component>, ComponentError> {
        Err(ComponentError::Unavailable("not bundled".into()))
    }

    #[tokio::test]
    async fn test_loader_is_lazy_and_resolves() {
        let table = ComponentTable::new()
            .with("hello", load_hello)
            .with("broken", load_broken);

        assert_eq!(table.keys(), vec!["broken", "hello"]);
        assert!(table.loader("missing").is_none());

        let loader = table.loader("hello").unwrap();
        let component = loader().await.unwrap();
        assert_eq!(component.render(), View::new("Hello").line("world"));

        let loader = table.loader("broken").unwrap();
        assert!(loader().await.is_err());
    }

    #[test]
    fn test_debug_lists_keys() {
        let table = ComponentTable::new().with("a", load_broken);
        assert!(format!("{table:?}").contains("\"a\""));
        assert_eq!(table.len(), 1);
        assert!(table.contains("a"));
    }
}
