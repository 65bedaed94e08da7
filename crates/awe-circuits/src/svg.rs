//! Minimal SVG markup writer used by the diagram widgets.

use std::fmt::Write;

/// A point in SVG user space.
pub type Xy = (f64, f64);

/// Incrementally built SVG document.
#[derive(Debug)]
pub struct SvgBuilder {
    buf: String,
}

impl SvgBuilder {
    /// Open an `<svg>` element with the given viewBox size.
    pub fn new(width: u32, height: u32) -> Self {
        let mut buf = String::with_capacity(4096);
        let _ = write!(
            buf,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" class="circuit" role="img">"#,
            width, height
        );
        Self { buf }
    }

    /// Append markup verbatim.
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Glow filter definitions. `blur_passes` controls how strong the halo is.
    pub fn glow_filter(&mut self, id: &str, std_dev: f64, spread: u32, blur_passes: u32) -> &mut Self {
        let lower = -((spread as i64 - 100) / 2);
        let _ = write!(
            self.buf,
            r#"<defs><filter id="{id}" x="{lower}%" y="{lower}%" width="{spread}%" height="{spread}%"><feGaussianBlur stdDeviation="{}" result="blur"/><feMerge>"#,
            num(std_dev)
        );
        for _ in 0..blur_passes {
            self.buf.push_str(r#"<feMergeNode in="blur"/>"#);
        }
        self.buf
            .push_str(r#"<feMergeNode in="SourceGraphic"/></feMerge></filter></defs>"#);
        self
    }

    pub fn line(&mut self, from: Xy, to: Xy, class: &str, width: f64) -> &mut Self {
        let _ = write!(
            self.buf,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" class="{}" stroke-width="{}" stroke-linecap="round"/>"#,
            num(from.0),
            num(from.1),
            num(to.0),
            num(to.1),
            class,
            num(width)
        );
        self
    }

    /// A line whose dash offset is driven by the client-side animation.
    pub fn dashed_line(&mut self, from: Xy, to: Xy, class: &str, offset: u32) -> &mut Self {
        let _ = write!(
            self.buf,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" class="{}" stroke-width="3" stroke-linecap="round" stroke-dasharray="8 8" stroke-dashoffset="-{}" data-dash=""/>"#,
            num(from.0),
            num(from.1),
            num(to.0),
            num(to.1),
            class,
            offset
        );
        self
    }

    pub fn circle(&mut self, center: Xy, r: f64, class: &str) -> &mut Self {
        let _ = write!(
            self.buf,
            r#"<circle cx="{}" cy="{}" r="{}" class="{}"/>"#,
            num(center.0),
            num(center.1),
            num(r),
            class
        );
        self
    }

    /// A circle with a filter applied.
    pub fn glowing_circle(&mut self, center: Xy, r: f64, class: &str, filter: &str) -> &mut Self {
        let _ = write!(
            self.buf,
            r#"<circle cx="{}" cy="{}" r="{}" class="{}" filter="url(#{})"/>"#,
            num(center.0),
            num(center.1),
            num(r),
            class,
            filter
        );
        self
    }

    pub fn path(&mut self, d: &str, class: &str, width: f64) -> &mut Self {
        let _ = write!(
            self.buf,
            r#"<path d="{}" class="{}" fill="none" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            d,
            class,
            num(width)
        );
        self
    }

    pub fn polygon(&mut self, points: &str, class: &str) -> &mut Self {
        let _ = write!(self.buf, r#"<polygon points="{}" class="{}"/>"#, points, class);
        self
    }

    pub fn text(&mut self, at: Xy, size: u32, class: &str, content: &str) -> &mut Self {
        let _ = write!(
            self.buf,
            r#"<text x="{}" y="{}" font-size="{}" text-anchor="middle" class="{}">{}</text>"#,
            num(at.0),
            num(at.1),
            size,
            class,
            escape(content)
        );
        self
    }

    /// Open a clickable group dispatching `action` to the widget.
    pub fn open_action(&mut self, action: &str) -> &mut Self {
        let _ = write!(
            self.buf,
            r#"<g class="toggle" data-action="{}" role="button" tabindex="0">"#,
            action
        );
        self
    }

    pub fn open_group(&mut self, class: &str) -> &mut Self {
        let _ = write!(self.buf, r#"<g class="{}">"#, class);
        self
    }

    pub fn close_group(&mut self) -> &mut Self {
        self.buf.push_str("</g>");
        self
    }

    /// Transparent rectangle that widens the click target of a group.
    pub fn hit_area(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let _ = write!(
            self.buf,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="transparent"/>"#,
            num(x),
            num(y),
            num(width),
            num(height)
        );
        self
    }

    /// Close the document.
    pub fn finish(mut self) -> String {
        self.buf.push_str("</svg>");
        self.buf
    }
}

/// Class list for an element with an on/off state.
pub fn lit(base: &str, on: bool) -> String {
    if on {
        format!("{} is-on", base)
    } else {
        base.to_string()
    }
}

/// Format a coordinate without trailing zeros.
pub fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// Escape text for inclusion in markup.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_numbers() {
        assert_eq!(num(60.0), "60");
        assert_eq!(num(30.5), "30.5");
        assert_eq!(num(434.00000001), "434");
        assert_eq!(num(-4.25), "-4.25");
    }

    #[test]
    fn builds_document() {
        let mut svg = SvgBuilder::new(560, 120);
        svg.line((30.0, 60.0), (530.0, 60.0), "wire", 2.0)
            .text((10.0, 38.0), 12, "label", "+");
        let markup = svg.finish();

        assert!(markup.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 560 120""#));
        assert!(markup.contains(r#"<line x1="30" y1="60" x2="530" y2="60" class="wire""#));
        assert!(markup.contains(">+</text>"));
        assert!(markup.ends_with("</svg>"));
    }

    #[test]
    fn glow_filter_bounds() {
        let mut svg = SvgBuilder::new(10, 10);
        svg.glow_filter("glow", 4.0, 200, 2);
        let markup = svg.finish();

        assert!(markup.contains(r#"x="-50%" y="-50%" width="200%" height="200%""#));
        assert_eq!(markup.matches(r#"<feMergeNode in="blur"/>"#).count(), 2);
    }

    #[test]
    fn lit_classes() {
        assert_eq!(lit("wire", true), "wire is-on");
        assert_eq!(lit("wire", false), "wire");
    }

    #[test]
    fn escapes_text() {
        assert_eq!(escape("A & <B>"), "A &amp; &lt;B&gt;");
    }
}
