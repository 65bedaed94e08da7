//! Markdown rendering for essay bodies.

use std::fmt::Write;

use pulldown_cmark::{html, CowStr, Event, Parser, Tag, TagEnd};

use awe_content::parser::markdown_options;
use awe_content::{widget_marker, CodeBlock, ParsedEssay};

use crate::highlight::highlight_lines;

/// Render an essay body to HTML.
///
/// Headings get the anchors listed in the essay's TOC, fenced code is
/// rendered as framed blocks, and widget markers are replaced by
/// `widgets[i]`.
pub fn render_body(essay: &ParsedEssay, widgets: &[String], line_numbers: bool) -> String {
    let mut events = Vec::new();
    let mut headings = essay.toc.iter();
    let mut code_blocks = essay.code_blocks.iter();
    let mut in_code = false;

    for event in Parser::new_ext(&essay.body, markdown_options()) {
        match event {
            Event::Start(Tag::Heading {
                level,
                classes,
                attrs,
                ..
            }) => {
                let id = headings.next().map(|e| CowStr::from(e.id.clone()));
                events.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }

            Event::Start(Tag::CodeBlock(_)) => in_code = true,

            Event::End(TagEnd::CodeBlock) => {
                in_code = false;
                if let Some(block) = code_blocks.next() {
                    events.push(Event::Html(render_code_block(block, line_numbers).into()));
                }
            }

            Event::Text(_) if in_code => {}

            other => events.push(other),
        }
    }

    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());

    for (i, markup) in widgets.iter().enumerate() {
        output = output.replace(&widget_marker(i), markup);
    }

    output
}

/// Render a code block with one highlighted span per line.
pub fn render_code_block(block: &CodeBlock, default_line_numbers: bool) -> String {
    let numbered = block.show_line_numbers(default_line_numbers);
    let language = block.language.as_str();

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<figure class="code-block{}" data-language="{}">"#,
        if block.language.is_terminal() {
            " terminal"
        } else {
            ""
        },
        language
    );
    if let Some(title) = &block.title {
        let _ = write!(out, "<figcaption>{}</figcaption>", escape_html(title));
    }
    let _ = write!(out, r#"<pre><code class="language-{}">"#, language);

    let source = block.source.strip_suffix('\n').unwrap_or(&block.source);
    let lines: Vec<&str> = source.split('\n').collect();
    for (i, line) in highlight_lines(&lines, &block.language).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(r#"<span class="line">"#);
        if numbered {
            let _ = write!(
                out,
                r#"<span class="line-number" aria-hidden="true">{}</span>"#,
                i + 1
            );
        }
        let _ = write!(out, r#"<span class="line-content">{}</span></span>"#, line);
    }

    out.push_str("</code></pre></figure>\n");
    out
}

/// Escape text for HTML content.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use awe_content::parse_essay;

    const ESSAY: &str = r#"---
title: Gates
pubDatetime: 2025-03-05
description: Switches and gates
---

import SwitchAndGate from "./_components/SwitchAndGate";

## The AND gate

Two switches in series.

<SwitchAndGate client:load />

```rust title="gate.rs"
fn and(a: bool, b: bool) -> bool {
    a && b
}
```
"#;

    #[test]
    fn headings_get_toc_anchors() {
        let essay = parse_essay(ESSAY).unwrap();
        let html = render_body(&essay, &[], true);

        assert!(html.contains(r#"<h2 id="the-and-gate">The AND gate</h2>"#));
        assert!(!html.contains("import SwitchAndGate"));
    }

    #[test]
    fn widgets_replace_markers() {
        let essay = parse_essay(ESSAY).unwrap();
        let html = render_body(&essay, &["<awe-switch-and-gate></awe-switch-and-gate>".to_string()], true);

        assert!(html.contains("<awe-switch-and-gate></awe-switch-and-gate>"));
        assert!(!html.contains("awe:widget"));
    }

    #[test]
    fn code_blocks_are_numbered() {
        let essay = parse_essay(ESSAY).unwrap();
        let html = render_body(&essay, &[], true);

        assert!(html.contains(r#"<figure class="code-block" data-language="rust"><figcaption>gate.rs</figcaption>"#));
        assert!(html.contains(r#"<span class="line-number" aria-hidden="true">3</span><span class="line-content"><span class="hl-source hl-rust">"#));
        assert!(html.contains("&amp;&amp;"));
        assert!(!html.contains("a && b"));
        assert!(!html.contains("<pre><code>fn"), "default code rendering is replaced");
    }

    #[test]
    fn line_numbers_can_be_disabled() {
        let block = CodeBlock::from_fence("bash", "cargo run\n".to_string());
        let html = render_code_block(&block, true);

        assert!(html.contains(r#"class="code-block terminal""#));
        assert!(!html.contains("line-number"));
        assert!(html.contains(r#"<span class="line"><span class="line-content"><span class="hl-source hl-shell"#));
        assert!(html.contains("cargo") && html.contains("run"));
    }

    #[test]
    fn highlighted_lines_stay_balanced() {
        let block = CodeBlock::from_fence(
            "rust",
            "/* a gate\n   in two lines */\nlet out = a && b;\n".to_string(),
        );
        let html = render_code_block(&block, false);

        assert!(html.contains("hl-comment"));
        for line in html.split('\n') {
            assert_eq!(
                line.matches("<span").count(),
                line.matches("</span>").count(),
                "unbalanced line: {line}"
            );
        }
    }

    #[test]
    fn plain_text_is_escaped() {
        let block = CodeBlock::from_fence("", "<b>bold</b>\n".to_string());
        let html = render_code_block(&block, false);

        assert!(html.contains(r#"<span class="line-content">&lt;b&gt;bold&lt;/b&gt;</span>"#));
    }
}
