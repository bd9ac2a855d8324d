//! File-based configuration loading

use crate::config::model::SiftConfig;
use crate::error::{SearchError, SiftResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file location (`<config dir>/sift/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sift").join("config.toml"))
}

/// Load configuration from a file
///
/// Supports JSON, TOML, and YAML formats based on file extension.
/// Returns default config if file doesn't exist.
pub fn load_from_file(path: &Path) -> SiftResult<SiftConfig> {
    if !path.exists() {
        return Ok(SiftConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        SearchError::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let config: SiftConfig = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            SearchError::Config(format!(
                "Failed to parse TOML config '{}': {}",
                path.display(),
                e
            ))
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            SearchError::Config(format!(
                "Failed to parse YAML config '{}': {}",
                path.display(),
                e
            ))
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            SearchError::Config(format!(
                "Failed to parse JSON config '{}': {}",
                path.display(),
                e
            ))
        })?,
    };

    Ok(config)
}
