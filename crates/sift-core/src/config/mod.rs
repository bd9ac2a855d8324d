//! Configuration management for Sift

mod env_loader;
mod file_loader;
mod logging_config;
pub mod model;
pub mod timeouts;

pub use env_loader::{apply_env_overrides, apply_env_overrides_with};
pub use file_loader::{default_config_path, load_from_file};
pub use logging_config::LoggingConfig;
pub use model::{CacheConfig, EngineConfig, RankingWeights, SearchDefaults, SiftConfig};

use crate::error::SiftResult;
use std::path::Path;

/// Load configuration: file (explicit or default location), then environment, then validate
pub fn load_config(path: Option<&Path>) -> SiftResult<SiftConfig> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => match default_config_path() {
            Some(path) => load_from_file(&path)?,
            None => SiftConfig::default(),
        },
    };
    apply_env_overrides(&mut config)?;
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
