//! SVG templates for preview images.

use serde::Deserialize;

/// Image width in pixels.
pub const WIDTH: u32 = 1200;
/// Image height in pixels.
pub const HEIGHT: u32 = 630;

const PADDING_X: f64 = 80.0;
const PADDING_Y: f64 = 60.0;
const TITLE_SIZE: f64 = 96.0;
const TITLE_LINE_HEIGHT: f64 = 1.2;
const TITLE_MARGIN_TOP: f64 = 50.0;
const FOOTER_SIZE: f64 = 48.0;
const MAX_TITLE_LINES: usize = 3;

/// Average advance of a glyph relative to the font size.
const GLYPH_ADVANCE: f64 = 0.5;

/// Visual settings shared by both templates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OgStyle {
    pub font_family: String,
    pub site_name: String,
    pub background: String,
    pub title_color: String,
    pub footer_color: String,
}

impl Default for OgStyle {
    fn default() -> Self {
        Self {
            font_family: "La Belle Aurore".to_string(),
            site_name: "awe in everything".to_string(),
            background: "#ffffff".to_string(),
            title_color: "#171717".to_string(),
            footer_color: "#525252".to_string(),
        }
    }
}

/// Preview for a single essay: the title top-left, the site name at the bottom.
pub fn essay_svg(title: &str, style: &OgStyle) -> String {
    let content_width = f64::from(WIDTH) - 2.0 * PADDING_X;
    let lines = wrap_title(title, TITLE_SIZE, content_width * 0.95);
    let line_height = TITLE_SIZE * TITLE_LINE_HEIGHT;

    // Baseline of the first line inside its line box.
    let first_baseline =
        PADDING_Y + TITLE_MARGIN_TOP + (line_height - TITLE_SIZE) / 2.0 + TITLE_SIZE * 0.8;

    let mut tspans = String::new();
    for (i, line) in lines.iter().enumerate() {
        let y = first_baseline + line_height * i as f64;
        tspans.push_str(&format!(
            r#"<tspan x="{}" y="{}">{}</tspan>"#,
            PADDING_X,
            round(y),
            escape_xml(line)
        ));
    }

    let footer_y = f64::from(HEIGHT) - PADDING_Y - FOOTER_SIZE * 0.3;

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="100%" height="100%" fill="{bg}"/><text font-family="{font}" font-size="{title_size}" fill="{title_color}">{tspans}</text><text x="{px}" y="{footer_y}" font-family="{font}" font-size="{footer_size}" fill="{footer_color}">{site}</text></svg>"#,
        w = WIDTH,
        h = HEIGHT,
        bg = escape_xml(&style.background),
        font = escape_xml(&style.font_family),
        title_size = TITLE_SIZE,
        title_color = escape_xml(&style.title_color),
        tspans = tspans,
        px = PADDING_X,
        footer_y = round(footer_y),
        footer_size = FOOTER_SIZE,
        footer_color = escape_xml(&style.footer_color),
        site = escape_xml(&style.site_name),
    )
}

/// Preview for the site itself: the site name centered.
pub fn site_svg(style: &OgStyle) -> String {
    let baseline = f64::from(HEIGHT) / 2.0 + TITLE_SIZE * 0.3;

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="100%" height="100%" fill="{bg}"/><text x="{cx}" y="{y}" text-anchor="middle" font-family="{font}" font-size="{size}" fill="{color}">{site}</text></svg>"#,
        w = WIDTH,
        h = HEIGHT,
        bg = escape_xml(&style.background),
        cx = WIDTH / 2,
        y = round(baseline),
        font = escape_xml(&style.font_family),
        size = TITLE_SIZE,
        color = escape_xml(&style.title_color),
        site = escape_xml(&style.site_name),
    )
}

/// Greedy word wrap using an estimated glyph advance.
///
/// Words wider than a line are kept whole. Output is capped at three lines;
/// the last one ends with an ellipsis when text was dropped.
pub fn wrap_title(title: &str, font_size: f64, max_width: f64) -> Vec<String> {
    let max_chars = ((max_width / (font_size * GLYPH_ADVANCE)).floor() as usize).max(1);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in title.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > MAX_TITLE_LINES {
        lines.truncate(MAX_TITLE_LINES);
        if let Some(last) = lines.last_mut() {
            while last.chars().count() + 1 > max_chars {
                if last.pop().is_none() {
                    break;
                }
            }
            let trimmed = last.trim_end().len();
            last.truncate(trimmed);
            last.push('…');
        }
    }

    lines
}

/// Escape text for XML content and attribute values.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn round(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
