//! Widget tags embedded in MDX bodies.
//!
//! Essays place interactive diagrams with JSX-style tags on a line of their
//! own, e.g. `<SwitchAndGate client:load />` or
//! `<Counter initialValue={3} label="Clicks" />`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// A widget tag found in an essay body.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetTag {
    /// Component name (e.g., "SwitchAndGate")
    pub name: String,

    /// Props as key-value pairs
    pub props: BTreeMap<String, PropValue>,

    /// Line in the essay source (1-indexed)
    pub line: usize,
}

/// A prop value from a widget tag.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// String literal: label="Clicks"
    String(String),
    /// Boolean (presence): client:load
    Boolean(bool),
    /// Expression: initialValue={3}
    Expression(String),
}

impl PropValue {
    /// Get as string if it's a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as an integer, from either a literal or an expression.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropValue::String(s) | PropValue::Expression(s) => s.trim().parse().ok(),
            PropValue::Boolean(_) => None,
        }
    }
}

impl WidgetTag {
    /// Look up a prop by name.
    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }
}

/// Zero or more props: bare names or `name="..."`, `name='...'`, `name={...}`.
const PROPS_PATTERN: &str =
    r#"(?:\s+[^\s=/>"'{}]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|\{[^}]*\}))?)*"#;

/// Parse a line holding a single widget tag.
///
/// Accepts self-closing tags and empty open/close pairs. The name must start
/// with an uppercase letter, as lowercase tags are plain HTML.
pub fn parse_widget_tag(line: &str, line_number: usize) -> Option<WidgetTag> {
    // Quoted values and `{...}` expressions are matched whole so they may
    // contain `/` and `>`
    static SELF_CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(r"^<([A-Z][a-zA-Z0-9]*)({})\s*/>$", PROPS_PATTERN))
            .expect("Invalid self-closing regex")
    });
    static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(
            r"^<([A-Z][a-zA-Z0-9]*)({})\s*>\s*</([A-Z][a-zA-Z0-9]*)>$",
            PROPS_PATTERN
        ))
        .expect("Invalid open tag regex")
    });

    let line = line.trim();

    let (name, props_str) = if let Some(caps) = SELF_CLOSING_RE.captures(line) {
        (caps.get(1)?.as_str(), caps.get(2).map_or("", |m| m.as_str()))
    } else {
        let caps = PAIR_RE.captures(line)?;
        if caps.get(1)?.as_str() != caps.get(3)?.as_str() {
            return None;
        }
        (caps.get(1)?.as_str(), caps.get(2).map_or("", |m| m.as_str()))
    };

    Some(WidgetTag {
        name: name.to_string(),
        props: parse_props(props_str),
        line: line_number,
    })
}

/// Parse props from a props string.
fn parse_props(props_str: &str) -> BTreeMap<String, PropValue> {
    // Match: name="value" or name='value' or name={expr} or name (boolean)
    static PROP_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r#"([a-zA-Z][a-zA-Z0-9:_-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|\{([^}]*)\}))?"#,
        )
        .expect("Invalid prop regex")
    });

    let mut props = BTreeMap::new();

    for caps in PROP_RE.captures_iter(props_str.trim()) {
        let Some(name) = caps.get(1) else {
            continue;
        };

        let value = if let Some(m) = caps.get(2).or_else(|| caps.get(3)) {
            PropValue::String(m.as_str().to_string())
        } else if let Some(m) = caps.get(4) {
            PropValue::Expression(m.as_str().trim().to_string())
        } else {
            PropValue::Boolean(true)
        };

        props.insert(name.as_str().to_string(), value);
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_self_closing() {
        let tag = parse_widget_tag("<SwitchAndGate />", 12).unwrap();

        assert_eq!(tag.name, "SwitchAndGate");
        assert_eq!(tag.line, 12);
        assert!(tag.props.is_empty());
    }

    #[test]
    fn parses_hydration_directive_as_boolean() {
        let tag = parse_widget_tag("  <TransistorAndGate client:load />", 1).unwrap();

        assert_eq!(tag.prop("client:load"), Some(&PropValue::Boolean(true)));
    }

    #[test]
    fn parses_string_and_expression_props() {
        let tag = parse_widget_tag(r#"<Counter initialValue={3} label="Clicks" />"#, 1).unwrap();

        assert_eq!(tag.prop("initialValue").and_then(PropValue::as_i64), Some(3));
        assert_eq!(tag.prop("label").and_then(PropValue::as_str), Some("Clicks"));
    }

    #[test]
    fn quoted_values_may_contain_slash_and_angle_bracket() {
        let tag = parse_widget_tag(r#"<Counter label="on/off" client:load />"#, 1).unwrap();
        assert_eq!(tag.prop("label").and_then(PropValue::as_str), Some("on/off"));
        assert_eq!(tag.prop("client:load"), Some(&PropValue::Boolean(true)));

        let tag = parse_widget_tag(r#"<Counter label='a > b' initialValue={2} />"#, 1).unwrap();
        assert_eq!(tag.prop("label").and_then(PropValue::as_str), Some("a > b"));
        assert_eq!(tag.prop("initialValue").and_then(PropValue::as_i64), Some(2));

        let tag = parse_widget_tag(r#"<Counter label="1/2 > 1/3"></Counter>"#, 1).unwrap();
        assert_eq!(tag.prop("label").and_then(PropValue::as_str), Some("1/2 > 1/3"));
    }

    #[test]
    fn parses_empty_pair() {
        let tag = parse_widget_tag("<SeriesAndGate></SeriesAndGate>", 4).unwrap();
        assert_eq!(tag.name, "SeriesAndGate");

        assert!(parse_widget_tag("<SeriesAndGate></Counter>", 4).is_none());
    }

    #[test]
    fn ignores_html_and_prose() {
        assert!(parse_widget_tag("<div />", 1).is_none());
        assert!(parse_widget_tag("<br/>", 1).is_none());
        assert!(parse_widget_tag("Use <Counter /> inline", 1).is_none());
        assert!(parse_widget_tag("<Button>Click</Button>", 1).is_none());
    }
}
