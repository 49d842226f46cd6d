//! # Configuration State
//!
//! Engine configuration resolved at startup, plus where it came from.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults
//! 2. Config file (`bazaar.toml`, or `--config`)
//! 3. Environment variables (`BAZAAR_*`)
//! 4. Command-line flags (`--db`, `--manifests`, `--ephemeral`)
//!
//! Read-only after startup, so no lock.

use bazaar_modules::{EngineConfig, EngineResult};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Resolved configuration for one console run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Config file that was consulted, if any.
    pub config_file: Option<PathBuf>,

    /// Effective engine configuration.
    pub engine: EngineConfig,
}

impl ConfigState {
    /// Loads file and environment configuration.
    pub fn load(config_file: Option<PathBuf>) -> EngineResult<Self> {
        let config_file = config_file.or_else(EngineConfig::default_config_path);
        let engine = EngineConfig::load(config_file.clone())?;
        Ok(ConfigState {
            config_file,
            engine,
        })
    }

    /// In-memory configuration, used by tests and `--ephemeral` runs.
    pub fn ephemeral() -> Self {
        let mut config = ConfigState::default();
        config.engine.store.ephemeral = true;
        config
    }

    /// Applies command-line overrides and re-validates.
    pub fn with_overrides(
        mut self,
        db: Option<PathBuf>,
        manifests: Option<PathBuf>,
        ephemeral: bool,
    ) -> EngineResult<Self> {
        if let Some(path) = db {
            debug!(?path, "Overriding store path from command line");
            self.engine.store.path = Some(path);
        }
        if let Some(path) = manifests {
            debug!(?path, "Overriding manifest file from command line");
            self.engine.modules.manifests = Some(path);
        }
        if ephemeral {
            self.engine.store.ephemeral = true;
        }

        self.engine.validate()?;
        Ok(self)
    }

    /// SQLite file in use, or `None` for an in-memory store.
    pub fn database_path(&self) -> Option<PathBuf> {
        (!self.engine.store.ephemeral).then(|| self.engine.database_path())
    }
}
