//! Cached working copy record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A local shallow working copy of a remote repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub repo_id: String,
    pub remote_url: String,
    /// Root of the working copy; searches run here
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub last_refreshed_at: DateTime<Utc>,
    /// Clone depth, always 1
    pub depth: u32,
}

impl CacheEntry {
    pub(crate) fn new(repo_id: &str, remote_url: &str, path: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            repo_id: repo_id.to_string(),
            remote_url: remote_url.to_string(),
            path,
            created_at: now,
            last_refreshed_at: now,
            depth: 1,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.last_refreshed_at = Utc::now();
    }
}
