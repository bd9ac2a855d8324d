//! ripgrep process adapter

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sift_core::config::{EngineConfig, timeouts};
use sift_core::{RawMatch, SearchError, SiftResult};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::options::{DEFAULT_EXCLUDES, EngineOptions};
use super::parser::JsonStreamParser;
use super::{SearchEngine, literal_pattern};

/// Exit status ripgrep uses when it hit an error
const EXIT_ERROR: i32 = 2;

/// [`SearchEngine`] backed by the `rg` binary
#[derive(Debug, Clone)]
pub struct RipgrepEngine {
    binary: PathBuf,
    timeout: Duration,
    extra_excludes: Vec<String>,
    version: String,
}

enum ReadOutcome {
    Eof,
    CapReached,
    Cancelled,
    TimedOut,
    Failed(std::io::Error),
}

impl RipgrepEngine {
    /// Locate the binary and confirm it runs
    ///
    /// Fails with `EngineUnavailable` when `rg --version` cannot be executed.
    pub async fn new(config: &EngineConfig) -> SiftResult<Self> {
        let version = Self::probe(&config.binary).await?;
        debug!(binary = %config.binary.display(), %version, "ripgrep available");
        Ok(Self {
            binary: config.binary.clone(),
            timeout: config.search_timeout,
            extra_excludes: config.extra_excludes.clone(),
            version,
        })
    }

    /// Run `rg --version` and return its first line
    pub async fn probe(binary: &Path) -> SiftResult<String> {
        let display = binary.display().to_string();
        let output = tokio::time::timeout(
            timeouts::search::probe_timeout(),
            Command::new(binary)
                .arg("--version")
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| SearchError::engine_unavailable(&display, "version probe timed out"))?
        .map_err(|e| SearchError::engine_unavailable(&display, e.to_string()))?;

        if !output.status.success() {
            return Err(SearchError::engine_unavailable(
                &display,
                format!("`--version` exited with {:?}", output.status.code()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Search for `text` literally
    pub async fn execute_text(
        &self,
        root: &Path,
        text: &str,
        options: &EngineOptions,
        cancel: &CancellationToken,
    ) -> SiftResult<Vec<RawMatch>> {
        self.execute(root, &literal_pattern(text), options, cancel)
            .await
    }

    /// Command-line arguments for one invocation, excluding the binary
    pub fn build_args(&self, pattern: &str, options: &EngineOptions) -> Vec<String> {
        let mut args = vec![
            "--json".to_string(),
            "--no-config".to_string(),
            "--sort".to_string(),
            "path".to_string(),
        ];

        if options.case_sensitive {
            args.push("--case-sensitive".to_string());
        } else {
            args.push("--ignore-case".to_string());
        }
        if options.whole_word {
            args.push("--word-regexp".to_string());
        }
        if options.context_lines > 0 {
            args.push("--context".to_string());
            args.push(options.context_lines.to_string());
        }

        for glob in &options.globs {
            args.push("--glob".to_string());
            args.push(glob.clone());
        }
        let excludes = DEFAULT_EXCLUDES
            .iter()
            .map(|g| g.to_string())
            .chain(self.extra_excludes.iter().cloned())
            .chain(options.exclude_globs.iter().cloned());
        for glob in excludes {
            args.push("--glob".to_string());
            args.push(format!("!{}", glob));
        }

        args.push("--regexp".to_string());
        args.push(pattern.to_string());
        args.push("--".to_string());
        args.push(".".to_string());
        args
    }

    fn spawn(&self, root: &Path, args: &[String]) -> SiftResult<Child> {
        Command::new(&self.binary)
            .args(args)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    SearchError::engine_unavailable(self.binary.display().to_string(), e.to_string())
                }
                _ => SearchError::Io(e),
            })
    }
}

#[async_trait]
impl SearchEngine for RipgrepEngine {
    #[instrument(skip(self, options, cancel), fields(root = %root.display(), max = options.max_matches))]
    async fn execute(
        &self,
        root: &Path,
        pattern: &str,
        options: &EngineOptions,
        cancel: &CancellationToken,
    ) -> SiftResult<Vec<RawMatch>> {
        if !root.is_dir() {
            return Err(SearchError::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("search root '{}' is not a directory", root.display()),
            )));
        }

        let args = self.build_args(pattern, options);
        debug!(binary = %self.binary.display(), ?args, "spawning ripgrep");

        let started = Instant::now();
        let mut child = self.spawn(root, &args)?;
        let stdout = child.stdout.take().ok_or_else(|| {
            SearchError::Io(std::io::Error::other("ripgrep stdout was not captured"))
        })?;
        let stderr_task = child.stderr.take().map(|mut pipe| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = pipe.read_to_string(&mut buf).await;
                buf
            })
        });

        let mut lines = BufReader::new(stdout).lines();
        let mut parser = JsonStreamParser::new(options.context_lines);
        let mut matches = Vec::new();
        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break ReadOutcome::Cancelled,
                _ = &mut deadline => break ReadOutcome::TimedOut,
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        parser.push_line(&line, &mut matches);
                        if matches.len() >= options.max_matches {
                            break ReadOutcome::CapReached;
                        }
                    }
                    Ok(None) => break ReadOutcome::Eof,
                    Err(e) => break ReadOutcome::Failed(e),
                },
            }
        };

        match outcome {
            ReadOutcome::Cancelled => {
                terminate(&mut child).await;
                abort(stderr_task);
                debug!("ripgrep cancelled");
                Err(SearchError::Cancelled)
            }
            ReadOutcome::TimedOut => {
                terminate(&mut child).await;
                abort(stderr_task);
                warn!(timeout_secs = self.timeout.as_secs_f64(), "ripgrep timed out");
                Err(SearchError::SearchTimeout {
                    pattern: pattern.to_string(),
                    timeout: self.timeout,
                })
            }
            ReadOutcome::Failed(e) => {
                terminate(&mut child).await;
                abort(stderr_task);
                Err(SearchError::Io(e))
            }
            ReadOutcome::CapReached => {
                terminate(&mut child).await;
                abort(stderr_task);
                matches.truncate(options.max_matches);
                debug!(
                    count = matches.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "match cap reached, ripgrep stopped"
                );
                Ok(matches)
            }
            ReadOutcome::Eof => {
                parser.finish(&mut matches);
                matches.truncate(options.max_matches);

                let remaining = self.timeout.saturating_sub(started.elapsed());
                let status = match tokio::time::timeout(remaining, child.wait()).await {
                    Ok(status) => status?,
                    Err(_) => {
                        terminate(&mut child).await;
                        abort(stderr_task);
                        return Err(SearchError::SearchTimeout {
                            pattern: pattern.to_string(),
                            timeout: self.timeout,
                        });
                    }
                };
                let stderr = match stderr_task {
                    Some(task) => task.await.unwrap_or_default(),
                    None => String::new(),
                };

                if status.code() == Some(EXIT_ERROR) {
                    if is_pattern_error(&stderr) {
                        return Err(SearchError::InvalidPattern {
                            pattern: pattern.to_string(),
                            diagnostic: stderr.trim().to_string(),
                        });
                    }
                    if !stderr.trim().is_empty() {
                        warn!(diagnostic = %stderr.trim(), "ripgrep reported errors");
                    }
                }

                debug!(
                    count = matches.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "ripgrep finished"
                );
                Ok(matches)
            }
        }
    }
}

fn is_pattern_error(stderr: &str) -> bool {
    stderr.contains("regex parse error") || stderr.contains("error parsing regex")
}

fn abort(task: Option<JoinHandle<String>>) {
    if let Some(task) = task {
        task.abort();
    }
}

/// Stop the child and reap it: SIGTERM first, SIGKILL after a grace period
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        if let Some(pid) = child.id() {
            let pid = Pid::from_raw(pid as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                let grace = timeouts::search::terminate_grace();
                if let Ok(Ok(_)) = tokio::time::timeout(grace, child.wait()).await {
                    return;
                }
            }
        }
    }

    if let Err(e) = child.kill().await {
        debug!("ripgrep already exited: {}", e);
    }
}
