//! External matching engine boundary

mod options;
mod parser;
mod ripgrep;

pub use options::{DEFAULT_EXCLUDES, EngineOptions};
pub use parser::JsonStreamParser;
pub use ripgrep::RipgrepEngine;

use async_trait::async_trait;
use sift_core::{RawMatch, SiftResult};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// A process that finds regex matches under a directory tree
///
/// Implementations return matches in emission order, capped at
/// `options.max_matches`. No matches is an empty vector, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Run `pattern` as a regular expression under `root`
    async fn execute(
        &self,
        root: &Path,
        pattern: &str,
        options: &EngineOptions,
        cancel: &CancellationToken,
    ) -> SiftResult<Vec<RawMatch>>;
}

/// Escape `text` so the engine matches it literally
pub fn literal_pattern(text: &str) -> String {
    regex::escape(text)
}
