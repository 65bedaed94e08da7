//! Site configuration file (site.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use awe_og::OgStyle;
use awe_site::{BuildConfig, SiteMeta};

/// Configuration file structure. Every section and field is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteMeta,
    pub build: BuildSettings,
    pub og: OgStyle,
    pub fonts: FontSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Essays directory
    pub content: PathBuf,
    /// Output directory
    pub output: PathBuf,
    pub minify: bool,
    pub drafts: bool,
    pub og_images: bool,
    pub line_numbers: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        let defaults = BuildConfig::default();
        Self {
            content: defaults.content_dir,
            output: defaults.output_dir,
            minify: defaults.minify,
            drafts: defaults.drafts,
            og_images: defaults.og_images,
            line_numbers: defaults.line_numbers,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FontSettings {
    /// Font files loaded in addition to system fonts
    pub files: Vec<PathBuf>,
}

impl SiteConfig {
    /// Load configuration from `path` if it exists.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SiteConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());

        Ok(config)
    }

    /// Builder settings, with relative paths resolved against `root`.
    pub fn build_config(&self, root: &Path) -> BuildConfig {
        BuildConfig {
            content_dir: root.join(&self.build.content),
            output_dir: root.join(&self.build.output),
            minify: self.build.minify,
            drafts: self.build.drafts,
            og_images: self.build.og_images,
            line_numbers: self.build.line_numbers,
            hmr: false,
            site: self.site.clone(),
            og: self.og.clone(),
            font_files: self.fonts.files.iter().map(|f| root.join(f)).collect(),
        }
    }
}

/// Directory that relative paths in the config file are resolved against.
pub fn config_root(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let config = SiteConfig::load(&temp.path().join("site.toml")).unwrap();

        assert_eq!(config.site, SiteMeta::default());
        assert_eq!(config.build.content, PathBuf::from("essays"));
        assert!(config.build.minify);
        assert!(!config.build.drafts);
    }

    #[test]
    fn parses_partial_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(
            &path,
            r##"
[site]
title = "Wonder"

[build]
drafts = true

[og]
font_family = "Caveat"

[fonts]
files = ["fonts/Caveat.ttf"]
"##,
        )
        .unwrap();

        let config = SiteConfig::load(&path).unwrap();
        let build = config.build_config(temp.path());

        assert_eq!(config.site.title, "Wonder");
        assert_eq!(config.site.url, "https://aweineverything.com");
        assert!(build.drafts);
        assert!(build.og_images);
        assert_eq!(build.og.font_family, "Caveat");
        assert_eq!(build.og.background, "#ffffff");
        assert_eq!(build.content_dir, temp.path().join("essays"));
        assert_eq!(build.font_files, vec![temp.path().join("fonts/Caveat.ttf")]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, "[build]\nminify = \"yes\"\n").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn config_root_defaults_to_current_dir() {
        assert_eq!(config_root(Path::new("site.toml")), PathBuf::from("."));
        assert_eq!(config_root(Path::new("blog/site.toml")), PathBuf::from("blog"));
    }
}
