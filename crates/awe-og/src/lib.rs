//! Open Graph preview images.
//!
//! A preview is a fixed SVG template with the essay title substituted in,
//! rasterized to a 1200x630 PNG.

pub mod render;
pub mod template;

pub use render::{png_dimensions, OgError, OgRenderer};
pub use template::{essay_svg, site_svg, wrap_title, OgStyle, HEIGHT, WIDTH};
