//! Frontmatter extraction.

use serde_yaml::Mapping;

/// Extract the YAML frontmatter block from an essay source.
///
/// Returns the parsed mapping (if a block is present) and the remaining
/// content after the closing `---`. Schema checks happen later in
/// [`crate::schema::validate`]; this only guarantees the block is a YAML mapping.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Mapping>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // The closing fence may be followed by more dashes or spaces on the same line.
    let is_fence_tail = |s: &str| s.trim_matches(|c: char| matches!(c, '-' | ' ' | '\r')).is_empty();
    let remaining = match remaining.find('\n') {
        Some(eol) if is_fence_tail(&remaining[..eol]) => &remaining[eol + 1..],
        None if is_fence_tail(remaining) => "",
        _ => remaining,
    };

    let mapping = if yaml_content.is_empty() {
        Mapping::new()
    } else {
        serde_yaml::from_str::<Mapping>(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(mapping), remaining.trim_start_matches(['\n', '\r'])))
}

/// Errors that can occur when extracting frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_mapping_and_body() {
        let source = r#"---
title: How Computers Work
description: From switches to logic
---

# Switches
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(
            fm.get("title").and_then(|v| v.as_str()),
            Some("How Computers Work")
        );
        assert!(content.trim_start().starts_with("# Switches"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn empty_block_is_an_empty_mapping() {
        let (fm, content) = extract_frontmatter("---\n---\nbody").unwrap();

        assert!(fm.unwrap().is_empty());
        assert_eq!(content, "body");
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn errors_when_block_is_not_a_mapping() {
        let source = "---\n- one\n- two\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
