//! One-shot build command.

use std::path::Path;

use anyhow::{Context, Result};

use weft_static::{Config, Engine};

/// Run the build command.
pub async fn run(config_path: &Path, quick: bool) -> Result<()> {
    tracing::info!("Building pattern library...");

    let config = Config::load(config_path).context("Failed to load configuration")?;
    let engine = Engine::new(config);

    let report = engine.build(quick).await?;

    if !report.clean() {
        tracing::warn!("{} issues recorded during the build", report.issues.len());
    }
    if report.failed > 0 {
        tracing::warn!("{} patterns failed to render", report.failed);
    }
    tracing::info!("Output: {}", engine.config().output_dir.display());

    Ok(())
}
