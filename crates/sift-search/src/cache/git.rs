//! Git transport used to populate and refresh working copies

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Failure of a single git operation
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("git {command} failed with exit code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to run '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} timed out after {}s", .timeout.as_secs())]
    TimedOut { command: String, timeout: Duration },
}

/// Fetches repository contents into a local directory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitTransport: Send + Sync {
    /// Clone `remote_url` at depth 1 into `dest`, which must not exist yet
    async fn shallow_clone(&self, remote_url: &str, dest: &Path) -> Result<(), TransportError>;

    /// Bring an existing shallow working copy up to the remote head
    async fn fetch_latest(&self, repo_dir: &Path) -> Result<(), TransportError>;
}

/// [`GitTransport`] that shells out to the `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    async fn run(&self, args: &[&str], working_dir: Option<&Path>) -> Result<String, TransportError> {
        let command = args.join(" ");
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        debug!("Executing git command: git {}", command);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| TransportError::TimedOut {
                command: command.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| TransportError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(TransportError::CommandFailed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl GitTransport for GitCli {
    #[instrument(skip(self), fields(dest = %dest.display()))]
    async fn shallow_clone(&self, remote_url: &str, dest: &Path) -> Result<(), TransportError> {
        let dest = dest.to_string_lossy();
        self.run(
            &["clone", "--depth", "1", "--single-branch", "--", remote_url, &dest],
            None,
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %repo_dir.display()))]
    async fn fetch_latest(&self, repo_dir: &Path) -> Result<(), TransportError> {
        self.run(&["fetch", "--depth", "1", "origin", "HEAD"], Some(repo_dir))
            .await?;
        self.run(&["reset", "--hard", "FETCH_HEAD"], Some(repo_dir))
            .await?;
        Ok(())
    }
}
