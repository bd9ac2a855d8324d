//! Sift command-line interface
//!
//! Ranked text, regex and symbol search over local directories or shallow
//! clones of remote repositories.

mod args;
mod commands;
mod console;
mod logging;
mod router;

use std::process::ExitCode;

use clap::Parser;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = sift_core::config::load_config(cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose)?;

    router::route(cli, config).await
}
