//! Command routing logic for CLI

use std::process::ExitCode;

use sift_core::{ErrorCategory, SearchError, SiftConfig};

use crate::args::{Cli, Commands};
use crate::commands;
use crate::console::CliConsole;

/// Route a parsed command line to its handler
///
/// Search failures are reported on the console and turned into an exit code;
/// only unexpected failures bubble up as `anyhow` errors.
pub async fn route(cli: Cli, config: SiftConfig) -> anyhow::Result<ExitCode> {
    let console = CliConsole::new(cli.verbose);
    let outcome = match cli.command {
        Commands::Search(args) => commands::search::run(args, &config, &console).await,
        Commands::Check => commands::check::run(&config, &console).await,
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            console.error(&err.to_string());
            tracing::debug!(code = err.error_code(), retryable = err.is_retryable(), "command failed");
            Ok(exit_code(&err))
        }
    }
}

fn exit_code(err: &SearchError) -> ExitCode {
    match err.category() {
        ErrorCategory::ConfigurationFatal => ExitCode::from(2),
        ErrorCategory::TransientExternal => ExitCode::from(3),
        ErrorCategory::PerRequest => ExitCode::from(1),
    }
}
