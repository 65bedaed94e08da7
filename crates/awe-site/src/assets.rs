//! Asset pipeline for CSS and JavaScript processing.

use crate::highlight;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file, code highlighting themes included.
    pub fn generate_css() -> String {
        match highlight::theme_css() {
            Ok(themes) => format!("{}\n{}", DEFAULT_CSS, themes),
            Err(e) => {
                tracing::warn!("Skipping code highlighting styles: {}", e);
                DEFAULT_CSS.to_string()
            }
        }
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* awe in everything */

:root {
  --background: #ffffff;
  --foreground: #171717;
  --muted: #737373;
  --subtle: #525252;
  --border: #d4d4d4;
  --surface: #fafafa;
  --wire: #d4d4d4;
  --live: #f59e0b;
  --glow: #fbbf24;
  --particle: #facc15;
  --current: #3b82f6;
  --output: #10b981;
  --content-max-width: 42rem;
  --font-display: "La Belle Aurore", cursive;
}

@media (prefers-color-scheme: dark) {
  :root {
    --background: #0a0a0a;
    --foreground: #e5e5e5;
    --muted: #a3a3a3;
    --subtle: #737373;
    --border: #404040;
    --surface: #171717;
    --wire: #404040;
    --live: #fbbf24;
  }
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: var(--font-sans, Georgia, "Times New Roman", serif);
  background: var(--background);
  color: var(--foreground);
  line-height: 1.7;
}

a {
  color: inherit;
  text-underline-offset: 3px;
}

.site-header,
.main,
.site-footer {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 0 1.25rem;
}

.site-header {
  padding-top: 2.5rem;
  padding-bottom: 2rem;
}

.site-title {
  font-family: var(--font-display);
  font-size: 2rem;
  text-decoration: none;
}

.site-footer {
  padding-top: 4rem;
  padding-bottom: 2rem;
  color: var(--muted);
  font-size: 0.875rem;
}

/* Index */

.essay-list {
  list-style: none;
  padding: 0;
  margin: 0;
}

.essay-list li {
  margin-bottom: 2rem;
}

.essay-list time {
  display: block;
  color: var(--muted);
  font-size: 0.875rem;
}

.essay-list h2 {
  margin: 0.25rem 0;
  font-size: 1.375rem;
}

.essay-list p {
  margin: 0;
  color: var(--subtle);
}

/* Essay */

.essay-header h1 {
  font-size: 2.25rem;
  line-height: 1.2;
  margin: 0 0 0.5rem;
}

.essay-header time {
  color: var(--muted);
  font-size: 0.875rem;
}

.toc {
  margin: 2rem 0;
  padding: 1rem 1.25rem;
  border-left: 2px solid var(--border);
  font-size: 0.9375rem;
}

.toc ul {
  list-style: none;
  margin: 0;
  padding: 0;
}

.toc-level-3 { padding-left: 1rem; }
.toc-level-4 { padding-left: 2rem; }

.content img {
  max-width: 100%;
}

.content blockquote {
  margin: 1.5rem 0;
  padding-left: 1rem;
  border-left: 3px solid var(--border);
  color: var(--subtle);
}

.sources {
  margin-top: 3rem;
  padding-top: 1.5rem;
  border-top: 1px solid var(--border);
  font-size: 0.9375rem;
}

.sources h2 {
  font-size: 1rem;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted);
}

/* Code */

.code-block {
  position: relative;
  margin: 1.5rem 0;
  font-size: 0.875rem;
}

.code-block figcaption {
  color: var(--muted);
  font-family: ui-monospace, monospace;
  font-size: 0.8125rem;
  margin-bottom: 0.25rem;
}

.code-block pre {
  margin: 0;
  padding: 1rem 0;
  overflow-x: auto;
  background: transparent;
}

.code-block code {
  display: grid;
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
}

.code-block .line {
  display: flex;
  padding-right: 1rem;
}

.code-block .line-number {
  min-width: 2.5rem;
  padding-right: 1rem;
  text-align: right;
  color: var(--muted);
  user-select: none;
}

.code-block.terminal pre {
  padding-left: 1rem;
  border: 1px solid var(--border);
  border-radius: 0.375rem;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.125rem 0.5rem;
  font-size: 0.75rem;
  background: var(--surface);
  color: var(--muted);
  border: 1px solid var(--border);
  border-radius: 0.25rem;
  cursor: pointer;
  opacity: 0;
  transition: opacity 0.15s;
}

.code-block:hover .copy-btn {
  opacity: 1;
}

/* Widgets */

.widget {
  margin: 2rem 0;
}

.circuit-frame {
  padding: 1rem;
  border: 1px solid var(--border);
  border-radius: 0.5rem;
}

.circuit {
  display: block;
  width: 100%;
  height: auto;
  overflow: visible;
}

.circuit line,
.circuit path {
  stroke: var(--wire);
  transition: stroke 0.2s;
}

.circuit .is-on {
  stroke: var(--live);
}

.circuit .terminal,
.circuit .ground {
  stroke: var(--muted);
}

.circuit .current {
  stroke: var(--current);
}

.circuit circle {
  fill: var(--background);
  stroke: var(--wire);
  stroke-width: 2;
}

.circuit .contact.is-on,
.circuit .pivot.is-on,
.circuit .input.is-on,
.circuit .junction.is-on {
  fill: var(--live);
  stroke: var(--live);
}

.circuit .bulb.is-on,
.circuit .indicator.is-on {
  fill: var(--glow);
  stroke: var(--live);
}

.circuit .output.is-on {
  fill: var(--output);
  stroke: var(--output);
}

.circuit .transistor.is-on {
  stroke: var(--live);
}

.circuit .supply {
  fill: var(--surface);
  stroke: var(--muted);
}

.circuit .particle {
  fill: var(--particle);
  stroke: none;
}

.circuit polygon {
  fill: var(--wire);
}

.circuit polygon.is-on {
  fill: var(--live);
}

.circuit text {
  fill: var(--muted);
  font-family: ui-monospace, monospace;
  stroke: none;
}

.circuit .label.is-on,
.circuit .term.is-on,
.circuit .result.is-on {
  fill: var(--live);
}

.circuit .toggle {
  cursor: pointer;
  outline: none;
}

.circuit .toggle:focus-visible .arm,
.circuit .toggle:focus-visible .resistor {
  stroke-width: 4;
}

.widget-hint {
  margin: 0.5rem 0 0;
  text-align: center;
  color: var(--muted);
  font-size: 0.8125rem;
}

.status-panel {
  display: grid;
  grid-template-columns: repeat(3, 1fr);
  gap: 0.5rem;
  margin-top: 1rem;
}

.status-card {
  padding: 0.5rem;
  border: 1px solid var(--border);
  border-radius: 0.375rem;
  text-align: center;
}

.status-card.is-on {
  border-color: var(--current);
}

.status-label {
  display: block;
  color: var(--muted);
  font-size: 0.75rem;
}

.status-value {
  font-family: ui-monospace, monospace;
  font-weight: 600;
}

.status-card.is-on .status-value {
  color: var(--current);
}

.expression {
  margin: 0.75rem 0 0;
  text-align: center;
  font-family: ui-monospace, monospace;
  color: var(--muted);
}

.expression.is-on {
  color: var(--output);
}

.counter {
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: 1rem;
  padding: 1rem;
  border: 1px dashed var(--border);
  border-radius: 0.5rem;
  background: var(--surface);
}

.counter-label {
  color: var(--subtle);
  font-size: 0.875rem;
}

.counter-controls {
  display: flex;
  align-items: center;
  gap: 0.75rem;
}

.counter button {
  width: 2rem;
  height: 2rem;
  border: none;
  border-radius: 0.375rem;
  background: var(--border);
  color: var(--foreground);
  font-size: 1.125rem;
  cursor: pointer;
}

.counter-value {
  min-width: 3rem;
  text-align: center;
  font-size: 1.125rem;
  font-variant-numeric: tabular-nums;
}

/* 404 */

.not-found {
  text-align: center;
  padding: 4rem 0;
}

.not-found h1 {
  font-family: var(--font-display);
  font-size: 3rem;
}
"#;

const DEFAULT_JS: &str = r#"// awe in everything - page runtime
(function() {
  'use strict';

  // Copy button for code blocks; copies source lines without line numbers
  document.querySelectorAll('.code-block').forEach(block => {
    if (block.querySelector('.copy-btn')) return;

    const btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.textContent = 'Copy';
    btn.setAttribute('type', 'button');

    btn.addEventListener('click', async () => {
      const lines = block.querySelectorAll('.line-content');
      const text = Array.from(lines).map(line => line.textContent).join('\n');

      try {
        await navigator.clipboard.writeText(text);
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });

    block.appendChild(btn);
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(":root"));
        assert!(css.contains("--live: #f59e0b"));
        assert!(css.contains(".circuit .particle"));
        assert!(css.contains("prefers-color-scheme: dark"));
        assert!(css.contains(".hl-comment"));
    }

    #[test]
    fn generates_js() {
        let js = AssetPipeline::generate_js();
        assert!(js.contains("clipboard"));
        assert!(js.contains(".line-content"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.button {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }

    #[test]
    fn site_css_minifies() {
        let css = AssetPipeline::generate_css();
        let minified = AssetPipeline::minify_css(&css).unwrap();
        assert!(minified.len() < css.len());
        assert!(minified.contains(".hl-"));
    }
}
