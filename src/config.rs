use crate::common::error::{DirectoryError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub stores: StoresConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Libsql,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoresConfig {
    pub backend: StoreBackend,
    pub uploads_dir: PathBuf,
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            uploads_dir: PathBuf::from("uploads"),
        }
    }
}

impl Config {
    /// Loads `config.toml` when present, falling back to defaults.
    /// `PORT` in the environment overrides the configured port; store
    /// credentials never live in the config file (see the libsql store).
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let mut config = if Path::new(config_path).exists() {
            let config_content = fs::read_to_string(config_path).map_err(|e| {
                DirectoryError::Config(format!("Failed to read config file '{config_path}': {e}"))
            })?;
            toml::from_str(&config_content).map_err(|e| {
                DirectoryError::Config(format!("Invalid config file '{config_path}': {e}"))
            })?
        } else {
            Config::default()
        };

        if let Ok(port) = env::var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| DirectoryError::Config(format!("Invalid PORT value '{port}'")))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.stores.backend, StoreBackend::Memory);
    }

    #[test]
    fn backend_labels_are_lowercase() {
        let config: Config = toml::from_str("[stores]\nbackend = \"libsql\"\n").unwrap();
        assert_eq!(config.stores.backend, StoreBackend::Libsql);
    }
}
