//! # bazaar-modules: Module Engine for Bazaar
//!
//! This crate keeps track of which business-tool modules exist, which are
//! installed, and what to render when one is opened.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Module Engine                                    │
//! │                                                                         │
//! │  App start                                                             │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  ┌──────────────────┐  builtins + runtime manifests                    │
//! │  │   Initializer    │──────────────────────────┐                       │
//! │  │  (once/session)  │  ModuleStateStore::load  │                       │
//! │  └────────┬─────────┘                          ▼                       │
//! │           │                        ┌───────────────────────┐           │
//! │           └──────────────────────► │    ModuleManager      │           │
//! │              Arc<ModuleManager>    │                       │           │
//! │                                    │  ManifestRegistry     │           │
//! │                                    │  Vec<ModuleState>     │──► store  │
//! │                                    └───────────┬───────────┘           │
//! │                                                │ get_by_id             │
//! │                                                ▼                       │
//! │                                    ┌───────────────────────┐           │
//! │                                    │    ModuleLoader       │           │
//! │                                    │  AccessPolicy         │           │
//! │                                    │  ComponentTable       │──► View   │
//! │                                    └───────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use bazaar_modules::{builtin_components, Initializer, ModuleLoader};
//! use bazaar_store::MemoryStore;
//!
//! let initializer = Initializer::new(Arc::new(MemoryStore::new()));
//! let manager = initializer.initialize().await;
//!
//! manager.install("inventory").await?;
//! manager.enable("inventory").await?;
//!
//! let loader = ModuleLoader::new(manager, builtin_components());
//! let view = loader.open("inventory").await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod catalog;
pub mod component;
pub mod config;
pub mod error;
pub mod initializer;
pub mod loader;
pub mod manager;
pub mod manifests;
pub mod registry;
pub mod state_store;

// =============================================================================
// Re-exports
// =============================================================================

pub use access::{AccessPolicy, AllowAll, DenyModules};
pub use catalog::builtin_components;
pub use component::{Component, ComponentError, ComponentTable, View};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use initializer::{BootReport, Initializer};
pub use loader::{ModuleLoader, ModuleView};
pub use manager::ModuleManager;
pub use manifests::ManifestFile;
pub use registry::ManifestRegistry;
pub use state_store::ModuleStateStore;
