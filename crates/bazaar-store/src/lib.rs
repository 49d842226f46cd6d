//! # bazaar-store: Keyed Local Store for Bazaar
//!
//! This crate provides the persisted key-value store behind the module
//! engine. The engine only ever reads and overwrites whole values; there is
//! no querying beyond lookup by key.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Data Flow                                 │
//! │                                                                         │
//! │  ModuleStateStore (bazaar-modules)                                     │
//! │       │  get / set "installed_modules"                                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   bazaar-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ KeyValueStore │    │  KvRepository │    │  Migrations  │  │   │
//! │  │   │  (kv.rs)      │    │ (kv_store     │    │  (embedded)  │  │   │
//! │  │   │               │    │  table)       │    │              │  │   │
//! │  │   │ Store ────────┼───►│               │    │ 001_kv.sql   │  │   │
//! │  │   │ MemoryStore   │    └───────────────┘    └──────────────┘  │   │
//! │  │   └───────────────┘                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (bazaar.db) or process memory                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - SQLite pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`kv`] - The `KeyValueStore` trait and the in-memory store
//! - [`error`] - Store error types
//! - [`repository`] - SQL for the `kv_store` table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bazaar_store::{KeyValueStore, Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("path/to/bazaar.db")).await?;
//! store.set("installed_modules", "[]").await?;
//! let raw = store.get("installed_modules").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryStore};
pub use pool::{Store, StoreConfig};
pub use repository::kv::KvRepository;
