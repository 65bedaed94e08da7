//! Scaffold a new site.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::config_root;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing awe...");

    let created = scaffold(config_path, yes)?;
    for path in &created {
        tracing::info!("Created {}", path.display());
    }

    if created.is_empty() {
        tracing::warn!("Nothing to do, files already exist. Use --yes to overwrite.");
        return Ok(());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'awe dev' to start the development server.");

    Ok(())
}

/// Write the config file and a sample essay, skipping files that exist
/// unless `overwrite` is set. Returns the files written.
fn scaffold(config_path: &Path, overwrite: bool) -> Result<Vec<PathBuf>> {
    let essay_dir = config_root(config_path).join("essays").join("hello-circuits");
    let essay_path = essay_dir.join("index.mdx");

    let mut created = Vec::new();

    if !config_path.exists() || overwrite {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        created.push(config_path.to_path_buf());
    }

    if !essay_path.exists() || overwrite {
        fs::create_dir_all(&essay_dir).context("Failed to create essays directory")?;
        fs::write(&essay_path, DEFAULT_ESSAY)
            .with_context(|| format!("Failed to write {}", essay_path.display()))?;
        created.push(essay_path);
    }

    Ok(created)
}

const DEFAULT_CONFIG: &str = r##"# awe configuration

[site]
title = "awe in everything"
description = "Essays on the wonder hiding in ordinary things."
url = "https://aweineverything.com"
author = ""

[build]
# Essays directory; every .md/.mdx file outside `_` folders is an essay
content = "essays"
output = "dist"
minify = true
drafts = false
og_images = true
line_numbers = true

[og]
font_family = "La Belle Aurore"
background = "#ffffff"
title_color = "#171717"
footer_color = "#525252"

[fonts]
# Font files used for preview images in addition to system fonts
files = []
"##;

const DEFAULT_ESSAY: &str = r#"---
title: Hello, circuits
pubDatetime: 2025-01-01
description: Two switches, one light, and the first logic gate.
draft: true
sources:
  - title: "Code: The Hidden Language of Computer Hardware and Software"
    url: https://www.charlespetzold.com/code/
---

import SwitchAndGate from "./_components/SwitchAndGate";

## Two switches

Current only reaches the bulb when both switches are closed.
Click the switches to try it.

<SwitchAndGate client:load />

## The same thing in code

```rust title="and.rs"
fn and(a: bool, b: bool) -> bool {
    a && b
}
```
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::tempdir;

    #[test]
    fn scaffolds_config_and_essay() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("site.toml");

        let created = scaffold(&config_path, false).unwrap();

        assert_eq!(created.len(), 2);
        assert!(config_path.exists());
        assert!(temp.path().join("essays/hello-circuits/index.mdx").exists());
        assert!(SiteConfig::load(&config_path).is_ok());
    }

    #[test]
    fn keeps_existing_files_unless_overwriting() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("site.toml");
        fs::write(&config_path, "[site]\ntitle = \"Mine\"\n").unwrap();

        let created = scaffold(&config_path, false).unwrap();
        assert_eq!(created.len(), 1);
        assert!(fs::read_to_string(&config_path).unwrap().contains("Mine"));

        let created = scaffold(&config_path, true).unwrap();
        assert_eq!(created.len(), 2);
        assert!(!fs::read_to_string(&config_path).unwrap().contains("Mine"));
    }

    #[tokio::test]
    async fn sample_essay_builds() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("site.toml");
        scaffold(&config_path, false).unwrap();

        let mut config = SiteConfig::load(&config_path)
            .unwrap()
            .build_config(temp.path());
        config.drafts = true;
        config.og_images = false;

        let result = awe_site::SiteBuilder::new(config).build().await.unwrap();

        assert_eq!(result.pages, 1);
        assert_eq!(result.widgets, 1);
        assert!(temp.path().join("dist/hello-circuits/index.html").exists());
    }
}
