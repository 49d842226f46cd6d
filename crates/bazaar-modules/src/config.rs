//! # Engine Configuration
//!
//! Where the engine keeps its state and where runtime manifests come from.
//!
//! ## Configuration Sources (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (this file)                                               │
//! │  2. Config file: <config dir>/bazaar.toml                              │
//! │  3. Environment:                                                       │
//! │       BAZAAR_DB_PATH     → store.path                                  │
//! │       BAZAAR_STORE_KEY   → store.key                                   │
//! │       BAZAAR_EPHEMERAL   → store.ephemeral                             │
//! │       BAZAAR_MANIFESTS   → modules.manifests                           │
//! │       BAZAAR_DENY        → modules.deny  (comma separated)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example `bazaar.toml`
//! ```toml
//! [store]
//! path = "/var/lib/bazaar/bazaar.db"
//! key = "installed_modules"
//! ephemeral = false
//!
//! [modules]
//! manifests = "/etc/bazaar/modules.toml"
//! deny = ["customers"]
//! ```

use bazaar_core::INSTALLED_MODULES_KEY;
use bazaar_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};

const CONFIG_FILE_NAME: &str = "bazaar.toml";
const DATABASE_FILE_NAME: &str = "bazaar.db";

// =============================================================================
// Store Settings
// =============================================================================

/// Where module state is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Key holding the state collection.
    #[serde(default = "default_store_key")]
    pub key: String,

    /// Keep everything in memory; nothing survives the process.
    #[serde(default)]
    pub ephemeral: bool,
}

fn default_store_key() -> String {
    INSTALLED_MODULES_KEY.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            path: None,
            key: default_store_key(),
            ephemeral: false,
        }
    }
}

// =============================================================================
// Module Settings
// =============================================================================

/// Where runtime manifests come from and which modules may be opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSettings {
    /// TOML file with `[[module]]` tables, registered after the built-ins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifests: Option<PathBuf>,

    /// Module ids the loader refuses to render.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny: Vec<String>,
}

// =============================================================================
// Engine Config
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub modules: ModuleSettings,
}

impl EngineConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (bazaar.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        let key = self.store.key.trim();
        if key.is_empty() {
            return Err(EngineError::InvalidConfig("store.key must not be empty".into()));
        }
        if key.len() != self.store.key.len() {
            return Err(EngineError::InvalidConfig(
                "store.key must not have surrounding whitespace".into(),
            ));
        }

        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                return Err(EngineError::InvalidConfig("store.path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("BAZAAR_DB_PATH") {
            debug!(path = %path, "Overriding store path from environment");
            self.store.path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("BAZAAR_STORE_KEY") {
            debug!(key = %key, "Overriding store key from environment");
            self.store.key = key;
        }

        if let Some(flag) = lookup("BAZAAR_EPHEMERAL") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.store.ephemeral = true,
                "0" | "false" | "no" | "off" => self.store.ephemeral = false,
                _ => warn!(value = %flag, "Unknown BAZAAR_EPHEMERAL value in environment"),
            }
        }

        if let Some(path) = lookup("BAZAAR_MANIFESTS") {
            debug!(path = %path, "Overriding manifest file from environment");
            self.modules.manifests = Some(PathBuf::from(path));
        }

        if let Some(list) = lookup("BAZAAR_DENY") {
            debug!(deny = %list, "Overriding denied modules from environment");
            self.modules.deny = list
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "bazaar", "bazaar")
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the SQLite file the store should open.
    ///
    /// Falls back to `./bazaar.db` when no platform data directory exists.
    pub fn database_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
        })
    }

    /// Builds the store configuration.
    pub fn store_config(&self) -> StoreConfig {
        if self.store.ephemeral {
            StoreConfig::in_memory()
        } else {
            StoreConfig::new(self.database_path())
        }
    }

    /// Returns the key holding the state collection.
    pub fn store_key(&self) -> &str {
        &self.store.key
    }

    /// Returns the runtime manifest file, if any.
    pub fn manifests_path(&self) -> Option<&PathBuf> {
        self.modules.manifests.as_ref()
    }

    /// Returns the module ids that must not be opened.
    pub fn denied_modules(&self) -> &[String] {
        &self.modules.deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.store_key(), "installed_modules");
        assert!(!config.store.ephemeral);
        assert!(config.manifests_path().is_none());
        assert!(config.denied_modules().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        config.store.key = String::new();
        assert!(config.validate().is_err());

        config.store.key = " installed_modules".to_string();
        assert!(config.validate().is_err());

        config.store.key = "modules_v2".to_string();
        assert!(config.validate().is_ok());

        config.store.path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BAZAAR_DB_PATH", "/tmp/bazaar-test.db"),
            ("BAZAAR_STORE_KEY", "modules_v2"),
            ("BAZAAR_EPHEMERAL", "TRUE"),
            ("BAZAAR_MANIFESTS", "/etc/bazaar/modules.toml"),
            ("BAZAAR_DENY", "customers, inventory,,"),
        ]
        .into_iter()
        .collect();

        let mut config = EngineConfig::default();
        config.apply_overrides_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.database_path(), PathBuf::from("/tmp/bazaar-test.db"));
        assert_eq!(config.store_key(), "modules_v2");
        assert!(config.store.ephemeral);
        assert!(config.store_config().is_in_memory());
        assert_eq!(
            config.manifests_path(),
            Some(&PathBuf::from("/etc/bazaar/modules.toml"))
        );
        assert_eq!(config.denied_modules(), ["customers", "inventory"]);
    }

    #[test]
    fn test_unknown_ephemeral_value_is_ignored() {
        let mut config = EngineConfig::default();
        config.apply_overrides_from(|name| {
            (name == "BAZAAR_EPHEMERAL").then(|| "sometimes".to_string())
        });
        assert!(!config.store.ephemeral);
    }

    #[test]
    fn test_toml_parsing_and_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [store]
            path = "/data/bazaar.db"

            [modules]
            manifests = "modules.toml"
            deny = ["customers"]
            "#,
        )
        .unwrap();

        assert_eq!(config.store_key(), "installed_modules");
        assert_eq!(config.store.path, Some(PathBuf::from("/data/bazaar.db")));
        assert!(!config.store_config().is_in_memory());
        assert_eq!(config.denied_modules(), ["customers"]);

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[modules]"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "bazaar-config-test-{}/bazaar.toml",
            uuid::Uuid::new_v4()
        ));

        let mut config = EngineConfig::default();
        config.store.key = "custom_key".to_string();
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: EngineConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.store_key(), "custom_key");

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
