// src/config/env.rs
// Environment-based overrides - single source of truth for all env vars

use std::path::PathBuf;

use tracing::warn;

use super::file::HydroriskConfig;

/// Values read from HYDRORISK_* environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    /// HYDRORISK_HOST
    pub host: Option<String>,
    /// HYDRORISK_PORT
    pub port: Option<u16>,
    /// HYDRORISK_MODEL_PATH
    pub model_path: Option<PathBuf>,
    /// HYDRORISK_ADVICE_PATH
    pub advice_path: Option<PathBuf>,
    /// HYDRORISK_SEED
    pub seed: Option<u64>,
}

impl EnvOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through an arbitrary lookup, filtering empty values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            host: read("HYDRORISK_HOST"),
            port: read("HYDRORISK_PORT").and_then(|v| parse_env("HYDRORISK_PORT", &v)),
            model_path: read("HYDRORISK_MODEL_PATH").map(PathBuf::from),
            advice_path: read("HYDRORISK_ADVICE_PATH").map(PathBuf::from),
            seed: read("HYDRORISK_SEED").and_then(|v| parse_env("HYDRORISK_SEED", &v)),
        }
    }

    /// Apply the overrides on top of file configuration
    pub fn apply(&self, config: &mut HydroriskConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.model_path {
            config.artifacts.model_path = Some(path.clone());
        }
        if let Some(path) = &self.advice_path {
            config.artifacts.advice_path = Some(path.clone());
        }
        if let Some(seed) = self.seed {
            config.training.seed = seed;
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var = name, value, "Ignoring unparseable environment value");
            None
        }
    }
}
