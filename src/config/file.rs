// src/config/file.rs
// File-based configuration from ~/.hydrorisk/config.toml

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::trainer::{ArtifactPaths, TrainingConfig};

/// Top-level config structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct HydroriskConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

/// HTTP server section
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Artifact locations section
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ArtifactConfig {
    pub model_path: Option<PathBuf>,
    pub advice_path: Option<PathBuf>,
}

impl ArtifactConfig {
    pub fn paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::default();
        ArtifactPaths {
            model: self.model_path.clone().unwrap_or(defaults.model),
            advice: self.advice_path.clone().unwrap_or(defaults.advice),
        }
    }
}

impl HydroriskConfig {
    /// Load config from the default location, falling back to defaults on any problem
    pub fn load() -> Self {
        let path = Self::config_path();

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from an explicitly requested file; errors are not swallowed
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        debug!(path = %path.display(), "Loaded config from file");
        Ok(config)
    }

    /// Get the config file path (HYDRORISK_CONFIG or ~/.hydrorisk/config.toml)
    fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os("HYDRORISK_CONFIG").filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hydrorisk")
            .join("config.toml")
    }
}
