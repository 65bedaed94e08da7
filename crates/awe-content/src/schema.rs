//! Essay metadata schema.
//!
//! Frontmatter is checked field by field so that a malformed essay reports
//! every problem at once instead of stopping at the first bad key. Keys the
//! schema does not know about are ignored.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_yaml::{Mapping, Value};
use url::Url;

/// Validated essay metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EssayMeta {
    /// Essay title
    pub title: String,

    /// Publish date and time (UTC)
    pub pub_datetime: DateTime<Utc>,

    /// Short description used for listings and previews
    pub description: String,

    /// Drafts are left out of the published site
    pub draft: bool,

    /// External source citations
    pub sources: Vec<Source>,
}

/// A cited external source.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// One problem found while validating frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Field path, e.g. `sources[1].url`
    pub path: String,
    pub message: String,
}

impl SchemaIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Frontmatter did not match the essay schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid frontmatter: {}", join_issues(.issues))]
pub struct SchemaError {
    pub issues: Vec<SchemaIssue>,
}

fn join_issues(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a frontmatter mapping against the essay schema.
pub fn validate(frontmatter: &Mapping) -> Result<EssayMeta, SchemaError> {
    let mut issues = Vec::new();

    let title = required_string(frontmatter, "title", &mut issues);
    let description = required_string(frontmatter, "description", &mut issues);

    let pub_datetime = match frontmatter.get("pubDatetime") {
        None | Some(Value::Null) => {
            issues.push(SchemaIssue::new("pubDatetime", "required"));
            None
        }
        Some(Value::String(s)) => {
            let parsed = parse_datetime(s);
            if parsed.is_none() {
                issues.push(SchemaIssue::new(
                    "pubDatetime",
                    format!("invalid date '{}'", s),
                ));
            }
            parsed
        }
        Some(other) => {
            issues.push(SchemaIssue::new(
                "pubDatetime",
                format!("expected date, found {}", type_name(other)),
            ));
            None
        }
    };

    let draft = match frontmatter.get("draft") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            issues.push(SchemaIssue::new(
                "draft",
                format!("expected boolean, found {}", type_name(other)),
            ));
            false
        }
    };

    let sources = match frontmatter.get("sources") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| validate_source(i, item, &mut issues))
            .collect(),
        Some(other) => {
            issues.push(SchemaIssue::new(
                "sources",
                format!("expected array, found {}", type_name(other)),
            ));
            Vec::new()
        }
    };

    match (title, description, pub_datetime) {
        (Some(title), Some(description), Some(pub_datetime)) if issues.is_empty() => {
            Ok(EssayMeta {
                title,
                pub_datetime,
                description,
                draft,
                sources,
            })
        }
        _ => Err(SchemaError { issues }),
    }
}

fn validate_source(index: usize, item: &Value, issues: &mut Vec<SchemaIssue>) -> Option<Source> {
    let path = format!("sources[{}]", index);

    let Value::Mapping(map) = item else {
        issues.push(SchemaIssue::new(
            path,
            format!("expected object, found {}", type_name(item)),
        ));
        return None;
    };

    let title = field_string(map, &path, "title", issues);
    let url = field_string(map, &path, "url", issues);

    if let Some(ref url) = url {
        if !is_valid_url(url) {
            issues.push(SchemaIssue::new(
                format!("{}.url", path),
                format!("invalid url '{}'", url),
            ));
            return None;
        }
    }

    Some(Source {
        title: title?,
        url: url?,
    })
}

fn required_string(map: &Mapping, key: &str, issues: &mut Vec<SchemaIssue>) -> Option<String> {
    match map.get(key) {
        None | Some(Value::Null) => {
            issues.push(SchemaIssue::new(key, "required"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            issues.push(SchemaIssue::new(
                key,
                format!("expected string, found {}", type_name(other)),
            ));
            None
        }
    }
}

fn field_string(
    map: &Mapping,
    parent: &str,
    key: &str,
    issues: &mut Vec<SchemaIssue>,
) -> Option<String> {
    let mut nested = Vec::new();
    let value = required_string(map, key, &mut nested);
    issues.extend(
        nested
            .into_iter()
            .map(|issue| SchemaIssue::new(format!("{}.{}", parent, issue.path), issue.message)),
    );
    value
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

/// Parse a frontmatter date.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and plain
/// dates. Values without an offset are taken as UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Check that a string is an absolute URL.
///
/// Any scheme is accepted, as are internationalized hosts and userinfo.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}
