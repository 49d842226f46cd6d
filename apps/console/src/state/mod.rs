//! # State Module
//!
//! State shared by console commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────────┐    │
//! │  │      ConfigState         │ ───► │       ModulesState           │    │
//! │  │                          │      │                              │    │
//! │  │  config_file             │      │  Store (SQLite pool)         │    │
//! │  │  EngineConfig            │      │  Initializer (boots once)    │    │
//! │  │  (read-only)             │      │  ModuleLoader                │    │
//! │  └──────────────────────────┘      └──────────────────────────────┘    │
//! │                                                                         │
//! │  Commands take only the state they need.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod modules;

pub use config::ConfigState;
pub use modules::ModulesState;
