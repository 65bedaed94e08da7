//! Rasterization of preview templates.

use std::path::PathBuf;
use std::sync::Arc;

use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};

use crate::template::{essay_svg, site_svg, OgStyle, HEIGHT, WIDTH};

/// Renders preview images to PNG.
///
/// The font database is loaded once and shared by every render, so a
/// renderer is cheap to clone and safe to use from several threads.
#[derive(Debug, Clone)]
pub struct OgRenderer {
    fontdb: Arc<fontdb::Database>,
    style: OgStyle,
}

impl OgRenderer {
    /// Create a renderer using system fonts.
    pub fn new(style: OgStyle) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());

        Self {
            fontdb: Arc::new(db),
            style,
        }
    }

    /// Create a renderer using system fonts plus the given font files.
    pub fn with_font_files(style: OgStyle, files: &[PathBuf]) -> Result<Self, OgError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        for path in files {
            db.load_font_file(path).map_err(|source| OgError::FontFile {
                path: path.clone(),
                source,
            })?;
            tracing::debug!("Loaded font {}", path.display());
        }

        if !has_family(&db, &style.font_family) {
            tracing::warn!(
                "Font family '{}' not found, preview text will use a fallback",
                style.font_family
            );
        }

        Ok(Self {
            fontdb: Arc::new(db),
            style,
        })
    }

    pub fn style(&self) -> &OgStyle {
        &self.style
    }

    /// Preview for an essay title.
    pub fn render_essay(&self, title: &str) -> Result<Vec<u8>, OgError> {
        self.render_png(&essay_svg(title, &self.style))
    }

    /// Preview for the site itself.
    pub fn render_site(&self) -> Result<Vec<u8>, OgError> {
        self.render_png(&site_svg(&self.style))
    }

    /// Rasterize an SVG document to a PNG of the preview size.
    pub fn render_png(&self, svg: &str) -> Result<Vec<u8>, OgError> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        options.font_family = self.style.font_family.clone();

        let tree = usvg::Tree::from_str(svg, &options)?;

        let mut pixmap = tiny_skia::Pixmap::new(WIDTH, HEIGHT).ok_or(OgError::Pixmap {
            width: WIDTH,
            height: HEIGHT,
        })?;

        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            WIDTH as f32 / size.width(),
            HEIGHT as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| OgError::Encode(e.to_string()))
    }
}

impl Default for OgRenderer {
    fn default() -> Self {
        Self::new(OgStyle::default())
    }
}

fn has_family(db: &fontdb::Database, family: &str) -> bool {
    db.faces()
        .any(|face| face.families.iter().any(|(name, _)| name.eq_ignore_ascii_case(family)))
}

/// Read a PNG's dimensions from its IHDR chunk.
pub fn png_dimensions(png: &[u8]) -> Option<(u32, u32)> {
    const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
    if png.len() < 24 || !png.starts_with(SIGNATURE) || &png[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(png[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(png[20..24].try_into().ok()?);
    Some((width, height))
}

/// Errors raised while rendering previews.
#[derive(Debug, thiserror::Error)]
pub enum OgError {
    #[error("Invalid preview SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("Failed to allocate {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    #[error("Failed to load font {}: {source}", path.display())]
    FontFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_essay_png_at_preview_size() {
        let renderer = OgRenderer::default();
        let png = renderer.render_essay("How computers work").unwrap();

        assert_eq!(png_dimensions(&png), Some((1200, 630)));
    }

    #[test]
    fn renders_site_png() {
        let png = OgRenderer::default().render_site().unwrap();
        assert_eq!(png_dimensions(&png), Some((1200, 630)));
    }

    #[test]
    fn scales_smaller_documents_to_fill() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="315"><rect width="600" height="315" fill="#000"/></svg>"##;
        let png = OgRenderer::default().render_png(svg).unwrap();

        assert_eq!(png_dimensions(&png), Some((1200, 630)));
    }

    #[test]
    fn rejects_invalid_svg() {
        let result = OgRenderer::default().render_png("<svg");
        assert!(matches!(result, Err(OgError::Svg(_))));
    }

    #[test]
    fn missing_font_file_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("missing.ttf");

        let result = OgRenderer::with_font_files(OgStyle::default(), &[missing.clone()]);
        assert!(matches!(result, Err(OgError::FontFile { path, .. }) if path == missing));
    }

    #[test]
    fn png_dimensions_rejects_garbage() {
        assert_eq!(png_dimensions(b"not a png"), None);
    }
}
