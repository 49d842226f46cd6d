//! # Repository Module
//!
//! SQL lives here and nowhere else.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Store (KeyValueStore impl)                                            │
//! │       │                                                                 │
//! │       │  store.kv().upsert("installed_modules", json)                   │
//! │       ▼                                                                 │
//! │  KvRepository                                                          │
//! │  ├── get(&self, key)                                                   │
//! │  └── upsert(&self, key, value)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kv_store table                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`kv::KvRepository`] - Reads and writes of the `kv_store` table

pub mod kv;
