//! Core types, errors and configuration shared by the Sift crates

pub mod config;
pub mod error;
pub mod language;
pub mod types;

pub use config::{LoggingConfig, RankingWeights, SiftConfig};
pub use error::{ErrorCategory, SearchError, SiftResult};
pub use language::{FileCategory, Language};
pub use types::*;
