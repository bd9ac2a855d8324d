//! Logging configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to log to file
    pub log_to_file: bool,
    /// Log file path
    pub log_file: Option<PathBuf>,
    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            log_to_file: false,
            log_file: None,
            format: "compact".to_string(),
        }
    }
}

impl LoggingConfig {
    pub const LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];
    pub const FORMATS: [&'static str; 3] = ["json", "pretty", "compact"];

    /// Filter directive for `EnvFilter`, scoped to the sift crates
    pub fn filter_directive(&self) -> String {
        let level = self.level.to_lowercase();
        format!("sift={level},sift_core={level},sift_search={level},sift_cli={level}")
    }
}
