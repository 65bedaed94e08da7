//! Essay parsing for the awe site.
//!
//! This crate extracts and validates essay frontmatter, derives slugs from
//! content paths, and prepares MDX bodies for rendering by pulling out the
//! interactive widget tags embedded in them.

pub mod codeblock;
pub mod frontmatter;
pub mod parser;
pub mod schema;
pub mod slug;
pub mod widgets;

pub use codeblock::{CodeBlock, Language};
pub use frontmatter::{extract_frontmatter, FrontmatterError};
pub use parser::{parse_essay, widget_marker, ParseError, ParsedEssay, TocEntry};
pub use schema::{validate, EssayMeta, SchemaError, SchemaIssue, Source};
pub use slug::{is_essay_path, slug_for, slugify};
pub use widgets::{parse_widget_tag, PropValue, WidgetTag};
