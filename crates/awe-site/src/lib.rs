//! Static site builder for awe in everything.
//!
//! Loads essays, embeds their circuit widgets as Web Components, renders
//! pages through minijinja templates and writes preview images, assets and
//! a sitemap to the output directory.

pub mod assets;
pub mod builder;
pub mod collection;
pub mod highlight;
pub mod markdown;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
pub use collection::{load_essays, Essay};
pub use templates::{EssaySummary, SiteMeta};
