//! Configuration model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::logging_config::LoggingConfig;
use super::timeouts;
use crate::error::{SearchError, SiftResult};
use crate::types::{DEFAULT_CONTEXT_LINES, DEFAULT_MAX_RESULTS};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    pub engine: EngineConfig,
    pub cache: CacheConfig,
    pub search: SearchDefaults,
    pub ranking: RankingWeights,
    pub logging: LoggingConfig,
}

/// Matching engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path or name of the ripgrep binary
    pub binary: PathBuf,
    /// Wall-clock budget for one invocation
    #[serde(with = "humantime_serde")]
    pub search_timeout: Duration,
    /// Globs excluded in addition to the built-in set
    pub extra_excludes: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("rg"),
            search_timeout: timeouts::search::execute_timeout(),
            extra_excludes: Vec::new(),
        }
    }
}

/// Repository cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory under which working copies are cloned
    pub workspace_dir: PathBuf,
    /// Path or name of the git binary
    pub git_binary: PathBuf,
    #[serde(with = "humantime_serde")]
    pub clone_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub lock_wait_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            workspace_dir: default_workspace_dir(),
            git_binary: PathBuf::from("git"),
            clone_timeout: timeouts::cache::clone_timeout(),
            lock_wait_timeout: timeouts::cache::lock_wait_timeout(),
        }
    }
}

fn default_workspace_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("sift")
        .join("repos")
}

/// Defaults applied to requests that leave a field unset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub context_lines: usize,
    pub max_results: usize,
    /// Engine cap as a multiple of the requested result cap
    pub over_fetch_factor: usize,
    /// Per-language symbol searches running at once
    pub symbol_concurrency: usize,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            max_results: DEFAULT_MAX_RESULTS,
            over_fetch_factor: 3,
            symbol_concurrency: 4,
        }
    }
}

/// Relevance signal weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub exact: f64,
    pub prefix: f64,
    pub substring: f64,
    pub case_insensitive: f64,
    pub definition: f64,
    pub usage: f64,
    pub symbol_bonus: f64,
    pub source: f64,
    pub test: f64,
    pub documentation: f64,
    pub configuration: f64,
    pub other: f64,
    pub position: f64,
    /// Bytes over which the position signal decays to zero
    pub position_window: usize,
    /// Lines longer than this many characters are penalised
    pub long_line_threshold: usize,
    pub long_line_penalty: f64,
    /// Additional penalty reached at `very_long_line`
    pub long_line_extra_penalty: f64,
    pub very_long_line: usize,
    pub path_depth: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            exact: 10.0,
            prefix: 7.0,
            substring: 6.0,
            case_insensitive: 3.0,
            definition: 4.0,
            usage: 1.0,
            symbol_bonus: 2.0,
            source: 3.0,
            test: 2.0,
            documentation: 1.0,
            configuration: 1.0,
            other: 0.0,
            position: 2.0,
            position_window: 80,
            long_line_threshold: 200,
            long_line_penalty: 1.0,
            long_line_extra_penalty: 2.0,
            very_long_line: 2000,
            path_depth: 1.0,
        }
    }
}

impl SiftConfig {
    /// Reject values that would make every request fail or hang
    pub fn validate(&self) -> SiftResult<()> {
        if self.engine.binary.as_os_str().is_empty() {
            return Err(SearchError::Config("engine.binary cannot be empty".into()));
        }
        if self.engine.search_timeout.is_zero() {
            return Err(SearchError::Config(
                "engine.search_timeout must be greater than zero".into(),
            ));
        }
        if self.cache.clone_timeout.is_zero() {
            return Err(SearchError::Config(
                "cache.clone_timeout must be greater than zero".into(),
            ));
        }
        if self.cache.lock_wait_timeout.is_zero() {
            return Err(SearchError::Config(
                "cache.lock_wait_timeout must be greater than zero".into(),
            ));
        }
        if self.cache.lock_wait_timeout < self.cache.clone_timeout {
            return Err(SearchError::Config(
                "cache.lock_wait_timeout must be at least cache.clone_timeout".into(),
            ));
        }
        if self.search.max_results == 0 {
            return Err(SearchError::Config(
                "search.max_results must be greater than zero".into(),
            ));
        }
        if self.search.over_fetch_factor == 0 {
            return Err(SearchError::Config(
                "search.over_fetch_factor must be greater than zero".into(),
            ));
        }
        if self.search.symbol_concurrency == 0 {
            return Err(SearchError::Config(
                "search.symbol_concurrency must be greater than zero".into(),
            ));
        }
        if self.ranking.very_long_line <= self.ranking.long_line_threshold {
            return Err(SearchError::Config(
                "ranking.very_long_line must exceed ranking.long_line_threshold".into(),
            ));
        }
        let level = self.logging.level.to_lowercase();
        if !LoggingConfig::LEVELS.contains(&level.as_str()) {
            return Err(SearchError::Config(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }
        if !LoggingConfig::FORMATS.contains(&self.logging.format.as_str()) {
            return Err(SearchError::Config(format!(
                "Invalid log format: {}",
                self.logging.format
            )));
        }
        Ok(())
    }
}
