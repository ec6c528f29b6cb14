// src/config/mod.rs
// Configuration: defaults -> config file -> environment (CLI flags applied by the caller)

pub mod env;
pub mod file;

use std::path::Path;

use crate::error::Result;

pub use env::EnvOverrides;
pub use file::{ArtifactConfig, HydroriskConfig, ServerConfig};

/// Resolve configuration from the file layer and the environment.
///
/// An explicit `path` must exist and parse; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<HydroriskConfig> {
    let mut config = match path {
        Some(path) => HydroriskConfig::load_from(path)?,
        None => HydroriskConfig::load(),
    };
    EnvOverrides::from_env().apply(&mut config);
    Ok(config)
}
