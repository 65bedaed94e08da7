//! Syntax highlighting for fenced code.
//!
//! Tokens become `<span>`s carrying `hl-` prefixed scope classes, and the
//! colors live in the stylesheet so one page serves both the light and the
//! dark theme.

use std::sync::LazyLock;

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, line_tokens_to_classed_spans, ClassStyle};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

use awe_content::Language;

use crate::markdown::escape_html;

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

const LIGHT_THEME: &str = "InspiredGitHub";
const DARK_THEME: &str = "base16-ocean.dark";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

fn syntax_for(language: &Language) -> Option<&'static SyntaxReference> {
    let extension = match language {
        Language::Rust => "rs",
        // The bundled grammars have no TypeScript; JavaScript covers most of it
        Language::Tsx | Language::Jsx | Language::TypeScript | Language::JavaScript => "js",
        Language::Python => "py",
        Language::C => "c",
        Language::Html => "html",
        Language::Css => "css",
        Language::Json => "json",
        Language::Bash => "sh",
        Language::Unknown => return None,
    };
    SYNTAXES.find_syntax_by_extension(extension)
}

/// Highlight `lines` as `language`, returning the inner HTML of each line.
///
/// Every returned line is balanced: scopes left open at the end of a line
/// are closed there and reopened on the next one. Unknown languages, and
/// sources the grammar fails on, come back as escaped plain text.
pub fn highlight_lines(lines: &[&str], language: &Language) -> Vec<String> {
    let plain = || -> Vec<String> { lines.iter().map(|line| escape_html(line)).collect() };

    let Some(syntax) = syntax_for(language) else {
        return plain();
    };

    match classed_lines(lines, syntax) {
        Ok(highlighted) => highlighted,
        Err(e) => {
            tracing::debug!("Highlighting {} failed: {}", language.as_str(), e);
            plain()
        }
    }
}

fn classed_lines(lines: &[&str], syntax: &SyntaxReference) -> Result<Vec<String>, String> {
    let mut state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        let line = format!("{line}\n");
        let ops = state.parse_line(&line, &SYNTAXES).map_err(|e| e.to_string())?;

        let mut html = String::new();
        let reopened = stack.as_slice().len();
        for scope in stack.as_slice() {
            html.push_str("<span class=\"");
            html.push_str(&scope_classes(&scope.build_string()));
            html.push_str("\">");
        }

        let (spans, delta) = line_tokens_to_classed_spans(&line, &ops, CLASS_STYLE, &mut stack)
            .map_err(|e| e.to_string())?;
        html.push_str(&spans.replace('\n', ""));

        let open = (reopened as isize + delta).max(0) as usize;
        for _ in 0..open {
            html.push_str("</span>");
        }

        out.push(html);
    }

    Ok(out)
}

/// `source.rust` becomes `hl-source hl-rust`, matching `CLASS_STYLE`.
fn scope_classes(scope: &str) -> String {
    scope
        .split('.')
        .map(|atom| format!("hl-{atom}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stylesheet for the highlight classes: a light theme by default and a dark
/// one under `prefers-color-scheme: dark`.
pub fn theme_css() -> Result<String, String> {
    let themes = ThemeSet::load_defaults();
    let css_for = |name: &str| {
        let theme = themes
            .themes
            .get(name)
            .ok_or_else(|| format!("missing theme {name}"))?;
        css_for_theme_with_class_style(theme, CLASS_STYLE).map_err(|e| e.to_string())
    };

    let light = css_for(LIGHT_THEME)?;
    let dark = css_for(DARK_THEME)?;

    Ok(format!(
        "/* Code highlighting */\n{light}\n@media (prefers-color-scheme: dark) {{\n{dark}\n}}\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn balanced(html: &str) -> bool {
        html.matches("<span").count() == html.matches("</span>").count()
    }

    #[test]
    fn highlights_rust() {
        let lines = highlight_lines(
            &["fn and(a: bool, b: bool) -> bool {", "    a && b", "}"],
            &Language::Rust,
        );

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(r#"class="hl-source hl-rust""#));
        assert!(lines[0].contains("hl-storage") || lines[0].contains("hl-keyword"));
        assert!(lines[1].contains("&amp;&amp;"));
        assert!(!lines[1].contains("a && b"));
        assert!(lines.iter().all(|line| balanced(line)));
    }

    #[test]
    fn scopes_spanning_lines_are_reopened() {
        let lines = highlight_lines(&["/* one", "two */", "let x = 1;"], &Language::JavaScript);

        assert!(lines[1].starts_with(r#"<span class="hl-source hl-js">"#));
        assert!(lines[1].contains("hl-comment"));
        assert!(lines[1].contains("two "));
        assert!(lines.iter().all(|line| balanced(line)));
        assert!(!lines.iter().any(|line| line.contains('\n')));
    }

    #[test]
    fn unknown_language_is_escaped_text() {
        let lines = highlight_lines(&["<b> & </b>"], &Language::Unknown);

        assert_eq!(lines, vec!["&lt;b&gt; &amp; &lt;/b&gt;".to_string()]);
    }

    #[test]
    fn theme_css_has_light_and_dark() {
        let css = theme_css().unwrap();

        assert!(css.contains(".hl-comment"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
    }
}
