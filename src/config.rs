use crate::error::{MinervaError, MinervaResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level application configuration, loaded from `~/.modelplane/config.json`
/// with every field defaulted so a missing or partial file never fails startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Registry-wide policy knobs that are not part of the core's fixed contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Whether `unload`/`unloadVersion` should wait for in-flight `predict`
    /// calls against the outgoing model to drain before returning. The core
    /// spec leaves this open (see DESIGN.md); default is `false`, matching
    /// the upstream behavior of not blocking administrative unloads.
    #[serde(default)]
    pub drain_on_unload: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            drain_on_unload: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.modelplane/config.json`.
    pub fn load() -> MinervaResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config or fall back to defaults if the file is absent or invalid.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Save configuration to `~/.modelplane/config.json`.
    pub fn save(&self) -> MinervaResult<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> MinervaResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(MinervaError::IoError)?;
            serde_json::from_str(&content).map_err(MinervaError::JsonError)
        } else {
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &Path) -> MinervaResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(MinervaError::IoError)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(MinervaError::JsonError)?;
        fs::write(path, content).map_err(MinervaError::IoError)?;

        Ok(())
    }

    fn config_path() -> MinervaResult<PathBuf> {
        let home_dir = home::home_dir().ok_or_else(|| {
            MinervaError::ServerError("could not determine home directory".to_string())
        })?;

        Ok(home_dir.join(".modelplane").join("config.json"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_server_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.registry.drain_on_unload);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).expect("serialize");
        let deserialized: AppConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(deserialized.server.port, config.server.port);
    }

    #[test]
    fn load_or_default_never_panics_without_a_config_file() {
        let config = AppConfig::load_or_default();
        assert!(config.server.port > 0);
    }

    #[test]
    fn load_from_missing_path_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");

        let config = AppConfig::load_from(&path).expect("load_from");
        assert_eq!(config.server.port, AppConfig::default().server.port);
    }

    #[test]
    fn save_then_load_from_round_trips_a_customized_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.server.port = 9999;
        config.registry.drain_on_unload = true;
        config.save_to(&path).expect("save_to");

        let loaded = AppConfig::load_from(&path).expect("load_from");
        assert_eq!(loaded.server.port, 9999);
        assert!(loaded.registry.drain_on_unload);
    }
}
