//! Development server command.

use std::path::Path;

use anyhow::Result;
use awe_server::{DevServer, DevServerConfig};

use crate::config::{config_root, SiteConfig};

/// Run the dev server.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let file_config = SiteConfig::load(config_path)?;

    let config = DevServerConfig {
        build: file_config.build_config(&config_root(config_path)),
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}
