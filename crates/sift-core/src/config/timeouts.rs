//! Centralized timeout defaults
//!
//! All values can be overridden via configuration.

use std::time::Duration;

/// Default timeouts for the matching engine
pub mod search {
    use super::*;

    /// Wall-clock budget for one engine invocation (30 seconds)
    pub const EXECUTE_SECS: u64 = 30;

    /// Budget for the `rg --version` probe (5 seconds)
    pub const PROBE_SECS: u64 = 5;

    /// Grace period between SIGTERM and SIGKILL (500 milliseconds)
    pub const TERMINATE_GRACE_MS: u64 = 500;

    pub fn execute_timeout() -> Duration {
        Duration::from_secs(EXECUTE_SECS)
    }

    pub fn probe_timeout() -> Duration {
        Duration::from_secs(PROBE_SECS)
    }

    pub fn terminate_grace() -> Duration {
        Duration::from_millis(TERMINATE_GRACE_MS)
    }
}

/// Default timeouts for the repository cache
pub mod cache {
    use super::*;

    /// Budget for a shallow clone or refresh (5 minutes)
    pub const CLONE_SECS: u64 = 300;

    /// How long a caller waits for another caller's clone of the same
    /// repository: a full clone budget plus one minute (6 minutes)
    pub const LOCK_WAIT_SECS: u64 = CLONE_SECS + 60;

    pub fn clone_timeout() -> Duration {
        Duration::from_secs(CLONE_SECS)
    }

    pub fn lock_wait_timeout() -> Duration {
        Duration::from_secs(LOCK_WAIT_SECS)
    }
}
