//! Engine availability check

use sift_core::{SiftConfig, SiftResult};
use sift_search::RipgrepEngine;

use crate::console::CliConsole;

pub async fn run(config: &SiftConfig, console: &CliConsole) -> SiftResult<()> {
    let version = RipgrepEngine::probe(&config.engine.binary).await?;
    console.success(&format!(
        "{} is available ({})",
        config.engine.binary.display(),
        version
    ));
    console.info(&format!(
        "workspace: {}",
        config.cache.workspace_dir.display()
    ));
    Ok(())
}
