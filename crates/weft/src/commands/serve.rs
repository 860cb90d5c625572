//! Preview server command.

use std::path::Path;

use anyhow::{Context, Result};

use weft_server::{PreviewConfig, PreviewServer};
use weft_static::{Config, Engine};

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting preview server on port {}", port);

    let config = Config::load(config_path).context("Failed to load configuration")?;
    let engine = Engine::new(config);

    PreviewServer::new(engine, PreviewConfig { port, open })
        .start()
        .await?;

    Ok(())
}
