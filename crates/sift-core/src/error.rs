//! Error types for search operations
//!
//! Every failure the engine can report is a distinct variant. An empty result
//! set is never an error.

use std::time::Duration;

/// Result type alias for Sift operations
pub type SiftResult<T> = Result<T, SearchError>;

/// Where the install instructions for ripgrep live
pub const RIPGREP_INSTALL_URL: &str = "https://github.com/BurntSushi/ripgrep#installation";

/// Broad classification of an error, used to decide how to react to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Host is misconfigured; retrying will not help
    ConfigurationFatal,
    /// External system failed; the caller may retry
    TransientExternal,
    /// Only the current request is affected
    PerRequest,
}

/// Main error type for search operations
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Cloning or refreshing a working copy failed
    #[error("Repository '{repo_id}' unavailable from {remote_url}: {reason}")]
    RepositoryUnavailable {
        repo_id: String,
        remote_url: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The external matching engine cannot be located or started
    #[error("Search engine '{binary}' is unavailable: {detail}. {guidance}")]
    EngineUnavailable {
        binary: String,
        detail: String,
        guidance: String,
    },

    /// The matching engine exceeded its wall-clock budget
    #[error("Search for pattern '{pattern}' timed out after {}s", .timeout.as_secs_f64())]
    SearchTimeout { pattern: String, timeout: Duration },

    /// The matching engine rejected the pattern
    #[error("Invalid pattern '{pattern}': {diagnostic}")]
    InvalidPattern { pattern: String, diagnostic: String },

    /// The request itself violates an invariant (empty query, zero cap, ...)
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The caller cancelled the request
    #[error("Search cancelled")]
    Cancelled,

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Build an `EngineUnavailable` error with ripgrep installation guidance
    pub fn engine_unavailable(binary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::EngineUnavailable {
            binary: binary.into(),
            detail: detail.into(),
            guidance: format!(
                "Install ripgrep (e.g. `brew install ripgrep`, `apt install ripgrep` or `cargo install ripgrep`) \
                 and make sure `rg` is on PATH, or point engine.binary / SIFT_RG_PATH at it. See {}",
                RIPGREP_INSTALL_URL
            ),
        }
    }

    /// Build a `RepositoryUnavailable` error wrapping the underlying transport failure
    pub fn repository_unavailable<E>(
        repo_id: impl Into<String>,
        remote_url: impl Into<String>,
        source: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::RepositoryUnavailable {
            repo_id: repo_id.into(),
            remote_url: remote_url.into(),
            reason: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Build a `RepositoryUnavailable` error from a plain reason
    pub fn repository_reason(
        repo_id: impl Into<String>,
        remote_url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::RepositoryUnavailable {
            repo_id: repo_id.into(),
            remote_url: remote_url.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SearchError::RepositoryUnavailable { .. } => "REPOSITORY_UNAVAILABLE",
            SearchError::EngineUnavailable { .. } => "ENGINE_UNAVAILABLE",
            SearchError::SearchTimeout { .. } => "SEARCH_TIMEOUT",
            SearchError::InvalidPattern { .. } => "INVALID_PATTERN",
            SearchError::InvalidQuery(_) => "INVALID_QUERY",
            SearchError::Cancelled => "CANCELLED",
            SearchError::Config(_) => "CONFIG_ERROR",
            SearchError::Io(_) => "IO_ERROR",
        }
    }

    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::EngineUnavailable { .. } | SearchError::Config(_) => {
                ErrorCategory::ConfigurationFatal
            }
            SearchError::RepositoryUnavailable { .. } | SearchError::Io(_) => {
                ErrorCategory::TransientExternal
            }
            SearchError::SearchTimeout { .. }
            | SearchError::InvalidPattern { .. }
            | SearchError::InvalidQuery(_)
            | SearchError::Cancelled => ErrorCategory::PerRequest,
        }
    }

    /// Whether a caller could reasonably retry the same request
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::TransientExternal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_unavailable_includes_guidance() {
        let err = SearchError::engine_unavailable("rg", "No such file or directory");
        let msg = err.to_string();
        assert!(msg.contains("rg"));
        assert!(msg.contains(RIPGREP_INSTALL_URL));
        assert_eq!(err.category(), ErrorCategory::ConfigurationFatal);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_timeout_message_carries_pattern_and_budget() {
        let err = SearchError::SearchTimeout {
            pattern: "TODO".to_string(),
            timeout: Duration::from_secs(30),
        };
        let msg = err.to_string();
        assert!(msg.contains("TODO"));
        assert!(msg.contains("30"));
        assert_eq!(err.error_code(), "SEARCH_TIMEOUT");
        assert_eq!(err.category(), ErrorCategory::PerRequest);
    }

    #[test]
    fn test_repository_unavailable_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = SearchError::repository_unavailable("acme/app", "https://example.com/acme/app.git", io);
        assert!(err.is_retryable());
        assert!(std::error::Error::source(&err).is_some());
        let msg = err.to_string();
        assert!(msg.contains("acme/app"));
        assert!(msg.contains("https://example.com/acme/app.git"));
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            SearchError::repository_reason("r", "u", "x"),
            SearchError::engine_unavailable("rg", "missing"),
            SearchError::SearchTimeout {
                pattern: "p".into(),
                timeout: Duration::from_secs(1),
            },
            SearchError::InvalidPattern {
                pattern: "(".into(),
                diagnostic: "unclosed group".into(),
            },
            SearchError::InvalidQuery("empty".into()),
            SearchError::Cancelled,
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.error_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
