//! Static site builder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use awe_circuits::WidgetRegistry;
use awe_og::{OgRenderer, OgStyle};

use crate::assets::AssetPipeline;
use crate::collection::{load_essays, Essay};
use crate::markdown::render_body;
use crate::templates::{EssayPage, EssaySummary, SiteMeta, TemplateEngine, TocEntry};

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Essays directory
    pub content_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Publish drafts too
    pub drafts: bool,

    /// Render Open Graph PNGs
    pub og_images: bool,

    /// Show line numbers in code blocks unless a block opts out
    pub line_numbers: bool,

    /// Inject the live reload client into every page
    pub hmr: bool,

    /// Site metadata
    pub site: SiteMeta,

    /// Preview image style
    pub og: OgStyle,

    /// Extra font files for preview images
    pub font_files: Vec<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("essays"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            drafts: false,
            og_images: true,
            line_numbers: true,
            hmr: false,
            site: SiteMeta::default(),
            og: OgStyle::default(),
            font_files: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of essay pages generated
    pub pages: usize,

    /// Number of widgets embedded
    pub widgets: usize,

    /// Number of preview images rendered
    pub images: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Every essay that was built, drafts flagged
    pub essays: Vec<EssaySummary>,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read essays: {0}")]
    ReadError(String),

    #[error("Invalid essay {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Essays {first} and {second} both use the slug '{slug}'")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("Failed to embed widget at {path}:{line}: {message}")]
    WidgetError {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to render preview image: {0}")]
    ImageError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    registry: WidgetRegistry,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            registry: WidgetRegistry::builtin(),
            templates: TemplateEngine::new(),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let essays = load_essays(&self.config.content_dir, self.config.drafts)?;
        tracing::debug!("Loaded {} essays", essays.len());

        // Render pages in parallel
        let results: Vec<Result<usize, BuildError>> = essays
            .par_iter()
            .map(|essay| self.build_page(essay))
            .collect();

        let mut total_widgets = 0;
        for result in results {
            total_widgets += result?;
        }

        self.generate_index(&essays)?;
        self.generate_not_found()?;

        let images = if self.config.og_images {
            self.generate_og_images(&essays)?
        } else {
            0
        };

        self.generate_assets()?;
        self.generate_sitemap(&essays)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: essays.len(),
            widgets: total_widgets,
            images,
            duration_ms: duration.as_millis() as u64,
            essays: essays.iter().map(summary).collect(),
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Build a single essay page. Returns the number of widgets embedded.
    fn build_page(&self, essay: &Essay) -> Result<usize, BuildError> {
        let mut scripts: BTreeMap<String, String> = BTreeMap::new();
        let mut widgets = Vec::with_capacity(essay.parsed.widgets.len());

        for tag in &essay.parsed.widgets {
            let generated = self
                .registry
                .generate(&tag.name, &tag.props)
                .map_err(|e| BuildError::WidgetError {
                    path: essay.source_path.display().to_string(),
                    line: tag.line,
                    message: e.to_string(),
                })?;

            // Only ship each widget type's script once per page
            scripts
                .entry(generated.tag_name.clone())
                .or_insert(generated.script);
            widgets.push(format!(r#"<div class="widget">{}</div>"#, generated.markup));
        }

        let content = render_body(&essay.parsed, &widgets, self.config.line_numbers);

        let page = EssayPage {
            summary: summary(essay),
            content,
            toc: essay
                .parsed
                .toc
                .iter()
                .map(|e| TocEntry {
                    title: e.title.clone(),
                    id: e.id.clone(),
                    level: e.level,
                })
                .collect(),
            sources: essay.meta().sources.clone(),
            scripts: scripts.into_values().collect(),
        };

        let html = self
            .templates
            .render_essay(&self.config.site, &page, self.config.hmr)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let output_path = self.page_dir(essay).join("index.html");
        write_file(&output_path, html)?;

        Ok(widgets.len())
    }

    fn page_dir(&self, essay: &Essay) -> PathBuf {
        self.config.output_dir.join(&essay.slug)
    }

    /// Generate the index page.
    fn generate_index(&self, essays: &[Essay]) -> Result<(), BuildError> {
        let summaries: Vec<EssaySummary> = essays.iter().map(summary).collect();

        let html = self
            .templates
            .render_index(&self.config.site, &summaries, self.config.hmr)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        write_file(&self.config.output_dir.join("index.html"), html)
    }

    fn generate_not_found(&self) -> Result<(), BuildError> {
        let html = self
            .templates
            .render_not_found(&self.config.site, self.config.hmr)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        write_file(&self.config.output_dir.join("404.html"), html)
    }

    /// Render `/<slug>/index.png` for every essay plus the site `/og.png`.
    fn generate_og_images(&self, essays: &[Essay]) -> Result<usize, BuildError> {
        let renderer = self.og_renderer()?;

        let results: Vec<Result<(), BuildError>> = essays
            .par_iter()
            .map(|essay| {
                let png = renderer
                    .render_essay(&essay.meta().title)
                    .map_err(|e| BuildError::ImageError(format!("{}: {}", essay.slug, e)))?;
                write_file(&self.page_dir(essay).join("index.png"), png)
            })
            .collect();

        for result in results {
            result?;
        }

        let site_png = renderer
            .render_site()
            .map_err(|e| BuildError::ImageError(e.to_string()))?;
        write_file(&self.config.output_dir.join("og.png"), site_png)?;

        Ok(essays.len() + 1)
    }

    /// Renderer configured with the site's preview style and fonts.
    pub fn og_renderer(&self) -> Result<OgRenderer, BuildError> {
        OgRenderer::with_font_files(self.config.og.clone(), &self.config.font_files)
            .map_err(|e| BuildError::ImageError(e.to_string()))
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Failed to minify CSS: {}", e);
                css
            })
        } else {
            css
        };
        write_file(&assets_dir.join("main.css"), css)?;
        write_file(&assets_dir.join("main.js"), AssetPipeline::generate_js())?;

        Ok(())
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, essays: &[Essay]) -> Result<(), BuildError> {
        let site = &self.config.site;

        let mut urls = vec![format!(
            "  <url>\n    <loc>{}</loc>\n  </url>",
            site.absolute("/")
        )];
        urls.extend(essays.iter().map(|essay| {
            format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>",
                site.absolute(&essay.url()),
                essay.meta().pub_datetime.format("%Y-%m-%d")
            )
        }));

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );
        write_file(&self.config.output_dir.join("sitemap.xml"), sitemap)?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}\n",
            site.absolute("/sitemap.xml")
        );
        write_file(&self.config.output_dir.join("robots.txt"), robots)
    }
}

/// Listing data for an essay.
fn summary(essay: &Essay) -> EssaySummary {
    let meta = essay.meta();
    EssaySummary {
        slug: essay.slug.clone(),
        title: meta.title.clone(),
        description: meta.description.clone(),
        url: essay.url(),
        date_iso: meta.pub_datetime.to_rfc3339(),
        date_display: meta.pub_datetime.format("%B %-d, %Y").to_string(),
        draft: meta.draft,
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}
