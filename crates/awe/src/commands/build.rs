//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use awe_site::SiteBuilder;

use crate::config::{config_root, SiteConfig};

/// Run the build command. Flags override values from the config file.
pub async fn run(
    config_path: &Path,
    output: Option<PathBuf>,
    minify: Option<bool>,
    drafts: Option<bool>,
) -> Result<()> {
    tracing::info!("Building site...");

    let file_config = SiteConfig::load(config_path)?;
    let mut config = file_config.build_config(&config_root(config_path));

    if let Some(output) = output {
        config.output_dir = output;
    }
    config.minify = minify.unwrap_or(config.minify);
    config.drafts = drafts.unwrap_or(config.drafts);

    let result = SiteBuilder::new(config)
        .build()
        .await
        .context("Build failed")?;

    tracing::info!(
        "Built {} essays with {} widgets and {} preview images in {}ms",
        result.pages,
        result.widgets,
        result.images,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
