//! Repository cache manager
//!
//! One slot per repository identifier. The slot map is guarded by a short
//! synchronous lock; each slot holds an async mutex that serialises clone and
//! refresh for that identifier only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use sift_core::config::CacheConfig;
use sift_core::{SearchError, SiftResult};
use tracing::{debug, info, instrument, warn};

use super::entry::CacheEntry;
use super::git::{GitCli, GitTransport};

type Slot = Arc<tokio::sync::Mutex<Option<CacheEntry>>>;

/// Maps repository identifiers to local shallow working copies
pub struct RepositoryCache {
    workspace: PathBuf,
    transport: Arc<dyn GitTransport>,
    lock_wait: Duration,
    /// Process-start stamp used in working copy directory names
    instance: String,
    slots: Mutex<HashMap<String, Slot>>,
}

impl RepositoryCache {
    /// Cache backed by the `git` binary
    pub fn new(config: &CacheConfig) -> Self {
        let transport = Arc::new(GitCli::new(&config.git_binary, config.clone_timeout));
        Self::with_transport(&config.workspace_dir, transport, config.lock_wait_timeout)
    }

    pub fn with_transport(
        workspace: impl Into<PathBuf>,
        transport: Arc<dyn GitTransport>,
        lock_wait: Duration,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            transport,
            lock_wait,
            instance: Utc::now().format("%Y%m%d%H%M%S%3f").to_string(),
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Return a ready working copy, cloning on first use
    ///
    /// With `refresh` set, an existing copy is updated to the remote head
    /// first. A failed refresh leaves the previous entry in place.
    #[instrument(skip(self), fields(repo = %repo_id))]
    pub async fn ensure(
        &self,
        repo_id: &str,
        remote_url: &str,
        refresh: bool,
    ) -> SiftResult<CacheEntry> {
        if repo_id.trim().is_empty() {
            return Err(SearchError::InvalidQuery(
                "repository identifier must not be empty".to_string(),
            ));
        }
        if remote_url.trim().is_empty() {
            return Err(SearchError::InvalidQuery(
                "remote url must not be empty".to_string(),
            ));
        }

        let slot = self.slot(repo_id);
        let mut guard = tokio::time::timeout(self.lock_wait, slot.lock())
            .await
            .map_err(|_| {
                SearchError::repository_reason(
                    repo_id,
                    remote_url,
                    format!(
                        "timed out after {:.1}s waiting for another clone or refresh",
                        self.lock_wait.as_secs_f64()
                    ),
                )
            })?;

        if let Some(entry) = guard.as_mut() {
            if entry.path.is_dir() {
                if entry.remote_url != remote_url {
                    warn!(
                        cached = %entry.remote_url,
                        requested = %remote_url,
                        "repository identifier already bound to a different remote"
                    );
                }
                if refresh {
                    self.transport
                        .fetch_latest(&entry.path)
                        .await
                        .map_err(|e| {
                            SearchError::repository_unavailable(repo_id, &entry.remote_url, e)
                        })?;
                    entry.touch();
                    info!(path = %entry.path.display(), "repository refreshed");
                }
                return Ok(entry.clone());
            }
            warn!(path = %entry.path.display(), "working copy disappeared, cloning again");
            *guard = None;
        }

        let entry = self.clone_into_workspace(repo_id, remote_url).await?;
        *guard = Some(entry.clone());
        Ok(entry)
    }

    /// The ready entry for `repo_id`, if one exists and no clone or refresh is in flight
    pub fn get(&self, repo_id: &str) -> Option<CacheEntry> {
        let slot = self.slots.lock().get(repo_id).cloned()?;
        let guard = slot.try_lock().ok()?;
        guard.clone()
    }

    /// All ready entries, ordered by identifier
    pub fn entries(&self) -> Vec<CacheEntry> {
        let slots: Vec<Slot> = self.slots.lock().values().cloned().collect();
        let mut entries: Vec<CacheEntry> = slots
            .iter()
            .filter_map(|slot| slot.try_lock().ok().and_then(|guard| guard.clone()))
            .collect();
        entries.sort_by(|a, b| a.repo_id.cmp(&b.repo_id));
        entries
    }

    /// Number of entries that are ready or being cloned or refreshed
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| match slot.try_lock() {
                Ok(guard) => guard.is_some(),
                Err(_) => true,
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the entry for `repo_id` and delete its working copy
    pub async fn remove(&self, repo_id: &str) -> SiftResult<bool> {
        let Some(slot) = self.slots.lock().remove(repo_id) else {
            return Ok(false);
        };
        let mut guard = tokio::time::timeout(self.lock_wait, slot.lock())
            .await
            .map_err(|_| {
                SearchError::repository_reason(
                    repo_id,
                    "",
                    "timed out waiting to remove working copy",
                )
            })?;
        match guard.take() {
            Some(entry) => {
                remove_dir(&entry.path).await?;
                info!(repo = %repo_id, "working copy removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every working copy this cache created
    pub async fn cleanup(&self) -> SiftResult<usize> {
        let ids: Vec<String> = self.slots.lock().keys().cloned().collect();
        let mut removed = 0;
        for id in ids {
            if self.remove(&id).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn slot(&self, repo_id: &str) -> Slot {
        self.slots
            .lock()
            .entry(repo_id.to_string())
            .or_default()
            .clone()
    }

    async fn clone_into_workspace(
        &self,
        repo_id: &str,
        remote_url: &str,
    ) -> SiftResult<CacheEntry> {
        tokio::fs::create_dir_all(&self.workspace)
            .await
            .map_err(|e| SearchError::repository_unavailable(repo_id, remote_url, e))?;

        let dest = self.destination(repo_id);
        debug!(dest = %dest.display(), "cloning repository");

        if let Err(e) = self.transport.shallow_clone(remote_url, &dest).await {
            if let Err(cleanup) = remove_dir(&dest).await {
                warn!(dest = %dest.display(), "failed to remove partial clone: {}", cleanup);
            }
            return Err(SearchError::repository_unavailable(repo_id, remote_url, e));
        }

        info!(path = %dest.display(), "repository cloned");
        Ok(CacheEntry::new(repo_id, remote_url, dest))
    }

    fn destination(&self, repo_id: &str) -> PathBuf {
        let base = format!("{}-{}", sanitize(repo_id), self.instance);
        let mut dest = self.workspace.join(&base);
        let mut n = 1;
        while dest.exists() {
            dest = self.workspace.join(format!("{}-{}", base, n));
            n += 1;
        }
        dest
    }
}

fn sanitize(repo_id: &str) -> String {
    repo_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

async fn remove_dir(path: &Path) -> SiftResult<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SearchError::Io(e)),
    }
}
