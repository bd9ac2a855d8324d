//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use sift_core::LoggingConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Install the global subscriber; `RUST_LOG` wins over the configured level
pub fn init(config: &LoggingConfig, verbose: bool) -> anyhow::Result<()> {
    let directive = if verbose {
        LoggingConfig {
            level: "debug".to_string(),
            ..config.clone()
        }
        .filter_directive()
    } else {
        config.filter_directive()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let (writer, ansi) = match (&config.log_file, config.log_to_file) {
        (Some(path), true) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        _ => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        _ => builder.compact().try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))
}
