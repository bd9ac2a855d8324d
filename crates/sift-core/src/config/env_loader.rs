//! Environment variable overrides
//!
//! Variables use the `SIFT_` prefix. Durations accept plain seconds (`45`)
//! or humantime strings (`90s`, `2m`).

use crate::config::model::SiftConfig;
use crate::error::{SearchError, SiftResult};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut SiftConfig) -> SiftResult<()> {
    apply_env_overrides_with(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`
pub fn apply_env_overrides_with<F>(config: &mut SiftConfig, lookup: F) -> SiftResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(path) = get("SIFT_RG_PATH") {
        config.engine.binary = PathBuf::from(path);
    }
    if let Some(value) = get("SIFT_SEARCH_TIMEOUT") {
        config.engine.search_timeout = parse_duration("SIFT_SEARCH_TIMEOUT", &value)?;
    }

    if let Some(path) = get("SIFT_GIT_PATH") {
        config.cache.git_binary = PathBuf::from(path);
    }
    if let Some(dir) = get("SIFT_WORKSPACE_DIR") {
        config.cache.workspace_dir = PathBuf::from(dir);
    }
    if let Some(value) = get("SIFT_CLONE_TIMEOUT") {
        config.cache.clone_timeout = parse_duration("SIFT_CLONE_TIMEOUT", &value)?;
    }
    if let Some(value) = get("SIFT_LOCK_TIMEOUT") {
        config.cache.lock_wait_timeout = parse_duration("SIFT_LOCK_TIMEOUT", &value)?;
    }

    if let Some(value) = get("SIFT_MAX_RESULTS") {
        config.search.max_results = parse_number("SIFT_MAX_RESULTS", &value)?;
    }
    if let Some(value) = get("SIFT_CONTEXT_LINES") {
        config.search.context_lines = parse_number("SIFT_CONTEXT_LINES", &value)?;
    }
    if let Some(value) = get("SIFT_OVER_FETCH") {
        config.search.over_fetch_factor = parse_number("SIFT_OVER_FETCH", &value)?;
    }

    if let Some(level) = get("SIFT_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = get("SIFT_LOG_FORMAT") {
        config.logging.format = format;
    }

    Ok(())
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> SiftResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SearchError::Config(format!("Invalid {} value: {}", key, value)))
}

#[derive(Deserialize)]
struct HumanDuration(#[serde(with = "humantime_serde")] Duration);

fn parse_duration(key: &str, value: &str) -> SiftResult<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    serde_json::from_value::<HumanDuration>(serde_json::Value::String(value.to_string()))
        .map(|d| d.0)
        .map_err(|_| SearchError::Config(format!("Invalid {} value: {}", key, value)))
}
