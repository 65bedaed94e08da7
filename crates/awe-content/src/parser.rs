//! Essay document parser.

use std::collections::HashMap;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::codeblock::CodeBlock;
use crate::frontmatter::{extract_frontmatter, FrontmatterError};
use crate::schema::{validate, EssayMeta, SchemaError};
use crate::slug::slugify;
use crate::widgets::{parse_widget_tag, WidgetTag};

/// A parsed essay.
#[derive(Debug, Clone)]
pub struct ParsedEssay {
    /// Validated frontmatter
    pub meta: EssayMeta,

    /// Markdown body with ESM lines removed and widget tags replaced by markers
    pub body: String,

    /// Widget tags in document order; index `i` sits at `widget_marker(i)`
    pub widgets: Vec<WidgetTag>,

    /// Fenced code blocks
    pub code_blocks: Vec<CodeBlock>,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing an essay.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Missing frontmatter block")]
    MissingFrontmatter,

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Markdown options shared by parsing and rendering.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
}

/// Placeholder left in the body where widget `index` is embedded.
pub fn widget_marker(index: usize) -> String {
    format!("<!-- awe:widget:{} -->", index)
}

/// Parse an essay source file.
///
/// Frontmatter is required and must satisfy the essay schema.
pub fn parse_essay(source: &str) -> Result<ParsedEssay, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;
    let frontmatter = frontmatter.ok_or(ParseError::MissingFrontmatter)?;
    let meta = validate(&frontmatter)?;

    // Lines consumed by the frontmatter block, for widget line numbers
    let consumed = source.len() - content.len();
    let line_offset = source[..consumed].lines().count();

    let (body, widgets) = prepare_body(content, line_offset);

    let mut code_blocks = Vec::new();
    let mut toc = Vec::new();
    let mut current_code_block: Option<(String, String)> = None; // (info, text)
    let mut current_heading: Option<(u8, String)> = None; // (level, text)
    let mut used_ids = HashMap::new();

    for event in Parser::new_ext(&body, markdown_options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                current_code_block = Some((info, String::new()));
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, text)) = current_code_block.take() {
                    code_blocks.push(CodeBlock::from_fence(&info, text));
                }
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut code)) = current_code_block {
                    code.push_str(&text);
                } else if let Some((_, ref mut heading)) = current_heading {
                    heading.push_str(&text);
                }
            }

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = unique_id(slugify(&title), &mut used_ids);
                    toc.push(TocEntry { title, id, level });
                }
            }

            _ => {}
        }
    }

    Ok(ParsedEssay {
        meta,
        body,
        widgets,
        code_blocks,
        toc,
    })
}

/// Suffix repeated heading ids with `-1`, `-2`, ... so anchors stay unique.
fn unique_id(base: String, used: &mut HashMap<String, usize>) -> String {
    let mut id = base.clone();
    while used.contains_key(&id) {
        let count = used.entry(base.clone()).or_insert(0);
        *count += 1;
        id = format!("{base}-{count}");
    }
    used.insert(id.clone(), 0);
    id
}

/// Strip MDX module syntax and swap widget tags for markers.
///
/// Fenced code is passed through untouched so examples of imports or tags
/// inside code blocks survive.
fn prepare_body(content: &str, line_offset: usize) -> (String, Vec<WidgetTag>) {
    let mut body = String::with_capacity(content.len());
    let mut widgets = Vec::new();
    let mut fence: Option<&str> = None;
    let mut esm_depth: i32 = 0;

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            body.push_str(line);
            body.push('\n');
            continue;
        }

        if esm_depth > 0 {
            esm_depth += brace_balance(line);
            continue;
        }

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            fence = Some(&trimmed[..3]);
            body.push_str(line);
            body.push('\n');
            continue;
        }

        if line.starts_with("import ") || line.starts_with("export ") {
            esm_depth = brace_balance(line).max(0);
            continue;
        }

        if let Some(tag) = parse_widget_tag(line, line_offset + i + 1) {
            body.push('\n');
            body.push_str(&widget_marker(widgets.len()));
            body.push_str("\n\n");
            widgets.push(tag);
            continue;
        }

        body.push_str(line);
        body.push('\n');
    }

    (body, widgets)
}

fn brace_balance(line: &str) -> i32 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ESSAY: &str = r#"---
title: How Computers Work
pubDatetime: 2025-01-12
description: From switches to logic gates
---

import SwitchAndGate from "./_components/SwitchAndGate";
import {
  TransistorAndGate,
} from "./_components/TransistorAndGate";

# Switches

A switch either lets electricity through or it doesn't.

<SwitchAndGate client:load />

## Transistors

```tsx title="Gate.tsx"
import { useState } from "react";
<TransistorAndGate />
```

<TransistorAndGate client:visible />
"#;

    #[test]
    fn parses_complete_essay() {
        let essay = parse_essay(ESSAY).unwrap();

        assert_eq!(essay.meta.title, "How Computers Work");

        assert_eq!(essay.widgets.len(), 2);
        assert_eq!(essay.widgets[0].name, "SwitchAndGate");
        assert_eq!(essay.widgets[0].line, 16);
        assert_eq!(essay.widgets[1].name, "TransistorAndGate");

        assert!(!essay.body.contains("import SwitchAndGate"));
        assert!(!essay.body.contains("} from"));
        assert!(essay.body.contains(&widget_marker(0)));
        assert!(essay.body.contains(&widget_marker(1)));

        assert_eq!(essay.code_blocks.len(), 1);
        assert_eq!(essay.code_blocks[0].title, Some("Gate.tsx".to_string()));
        assert!(essay.code_blocks[0].source.contains("import { useState }"));
        assert!(essay.code_blocks[0].source.contains("<TransistorAndGate />"));

        assert_eq!(
            essay.toc,
            vec![
                TocEntry {
                    title: "Switches".to_string(),
                    id: "switches".to_string(),
                    level: 1,
                },
                TocEntry {
                    title: "Transistors".to_string(),
                    id: "transistors".to_string(),
                    level: 2,
                },
            ]
        );
    }

    #[test]
    fn requires_frontmatter() {
        let result = parse_essay("# Just Markdown\n\nNo frontmatter.");

        assert!(matches!(result, Err(ParseError::MissingFrontmatter)));
    }

    #[test]
    fn surfaces_schema_errors() {
        let result = parse_essay("---\ntitle: Only a title\n---\nBody");

        let Err(ParseError::Schema(err)) = result else {
            panic!("expected schema error");
        };
        assert_eq!(err.issues.len(), 2);
    }

    #[test]
    fn headings_with_inline_code() {
        let essay = parse_essay(
            "---\ntitle: T\npubDatetime: 2024-01-01\ndescription: D\n---\n## The `AND` gate\n",
        )
        .unwrap();

        assert_eq!(essay.toc[0].title, "The AND gate");
        assert_eq!(essay.toc[0].id, "the-and-gate");
    }

    #[test]
    fn repeated_headings_get_unique_ids() {
        let essay = parse_essay(
            "---\ntitle: T\npubDatetime: 2024-01-01\ndescription: D\n---\n\
             ## Example\n\n## Example\n\n## Example 1\n\n## Example\n",
        )
        .unwrap();

        let ids: Vec<&str> = essay.toc.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["example", "example-1", "example-1-1", "example-2"]);
    }

    #[test]
    fn widget_props_with_slashes_stay_widgets() {
        let essay = parse_essay(
            "---\ntitle: T\npubDatetime: 2024-01-01\ndescription: D\n---\n\
             Intro\n\n<Counter label=\"on/off\" client:load />\n\n<Counter label=\"a > b\" />\n",
        )
        .unwrap();

        assert_eq!(essay.widgets.len(), 2);
        assert!(!essay.body.contains("<Counter"));
        assert_eq!(essay.widgets[0].line, 8);
    }
}
