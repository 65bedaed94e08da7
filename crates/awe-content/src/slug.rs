//! Essay ids and slugs.
//!
//! An essay id is its path relative to the essays directory, always with `/`
//! separators. Essays come in two shapes:
//!
//! - flat: `my-essay.mdx` -> `my-essay`
//! - folder-based: `how-computers-work/index.mdx` -> `how-computers-work`

/// Whether a content id names an essay.
///
/// Only `.md` and `.mdx` files count, and anything under a path component
/// starting with `_` (such as `_components/`) is private to an essay.
pub fn is_essay_path(id: &str) -> bool {
    let has_ext = id.ends_with(".md") || id.ends_with(".mdx");
    has_ext && !id.split('/').any(|part| part.starts_with('_'))
}

/// Derive the public slug for an essay id.
pub fn slug_for(id: &str) -> String {
    let id = id.trim_start_matches("./").trim_start_matches('/');
    let mut parts = id.split('/');
    let first = parts.next().unwrap_or_default();

    if parts.next().is_some() {
        first.to_string()
    } else {
        first
            .strip_suffix(".mdx")
            .or_else(|| first.strip_suffix(".md"))
            .unwrap_or(first)
            .to_string()
    }
}

/// Convert a heading to a URL-safe anchor.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_essays_drop_extension() {
        assert_eq!(slug_for("my-essay.mdx"), "my-essay");
        assert_eq!(slug_for("notes.md"), "notes");
    }

    #[test]
    fn folder_essays_use_folder_name() {
        assert_eq!(slug_for("how-computers-work/index.mdx"), "how-computers-work");
        assert_eq!(slug_for("deep/nested/index.md"), "deep");
    }

    #[test]
    fn underscore_paths_are_not_essays() {
        assert!(is_essay_path("how-computers-work/index.mdx"));
        assert!(is_essay_path("flat.md"));
        assert!(!is_essay_path("how-computers-work/_components/notes.mdx"));
        assert!(!is_essay_path("_drafts.md"));
        assert!(!is_essay_path("how-computers-work/_components/SwitchAndGate.tsx"));
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("The AND Gate"), "the-and-gate");
        assert_eq!(slugify("Switches (and why)"), "switches-and-why");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
