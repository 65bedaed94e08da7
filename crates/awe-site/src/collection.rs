//! The essay collection.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use awe_content::{is_essay_path, parse_essay, slug_for, EssayMeta, ParseError, ParsedEssay};

use crate::builder::BuildError;

/// A parsed essay and where it came from.
#[derive(Debug, Clone)]
pub struct Essay {
    /// Path relative to the essays directory, `/`-separated
    pub id: String,

    /// Public slug
    pub slug: String,

    /// Source file path
    pub source_path: PathBuf,

    /// Parsed document
    pub parsed: ParsedEssay,
}

impl Essay {
    pub fn meta(&self) -> &EssayMeta {
        &self.parsed.meta
    }

    /// Site-relative URL of the essay page.
    pub fn url(&self) -> String {
        format!("/{}/", self.slug)
    }
}

/// Load every essay under `dir`, newest first.
///
/// Every essay is parsed and validated, drafts included, so a broken draft
/// still fails the build. Drafts are dropped from the result unless
/// `include_drafts` is set.
pub fn load_essays(dir: &Path, include_drafts: bool) -> Result<Vec<Essay>, BuildError> {
    if !dir.exists() {
        return Err(BuildError::ReadError(format!(
            "Essays directory not found: {}",
            dir.display()
        )));
    }

    let mut essays = Vec::new();
    let mut slugs: HashMap<String, String> = HashMap::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(id) = essay_id(dir, path) else {
            continue;
        };
        if !is_essay_path(&id) {
            continue;
        }

        let content = fs::read_to_string(path)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

        let parsed = parse_essay(&content).map_err(|e| parse_error(path, e))?;

        let slug = slug_for(&id);
        if let Some(first) = slugs.insert(slug.clone(), id.clone()) {
            return Err(BuildError::DuplicateSlug {
                slug,
                first,
                second: id,
            });
        }

        if parsed.meta.draft && !include_drafts {
            tracing::debug!("Skipping draft {}", id);
            continue;
        }

        essays.push(Essay {
            id,
            slug,
            source_path: path.to_path_buf(),
            parsed,
        });
    }

    essays.sort_by(|a, b| {
        b.meta()
            .pub_datetime
            .cmp(&a.meta().pub_datetime)
            .then_with(|| a.slug.cmp(&b.slug))
    });

    Ok(essays)
}

/// Content id of a file: its path relative to `dir` with `/` separators.
fn essay_id(dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(dir).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

fn parse_error(path: &Path, error: ParseError) -> BuildError {
    let message = match error {
        ParseError::Schema(schema) => schema
            .issues
            .iter()
            .map(|issue| format!("\n  - {}", issue))
            .collect::<String>(),
        other => other.to_string(),
    };

    BuildError::ParseError {
        path: path.display().to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn essay(title: &str, date: &str, draft: bool) -> String {
        format!(
            "---\ntitle: {}\npubDatetime: {}\ndescription: About {}\ndraft: {}\n---\n\nBody\n",
            title, date, title, draft
        )
    }

    #[test]
    fn loads_flat_and_folder_essays_newest_first() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        fs::create_dir_all(dir.join("how-computers-work/_components")).unwrap();
        fs::write(dir.join("older.md"), essay("Older", "2024-01-01", false)).unwrap();
        fs::write(
            dir.join("how-computers-work/index.mdx"),
            essay("How computers work", "2025-03-05", false),
        )
        .unwrap();
        fs::write(
            dir.join("how-computers-work/_components/notes.mdx"),
            "not an essay",
        )
        .unwrap();

        let essays = load_essays(dir, false).unwrap();
        let slugs: Vec<_> = essays.iter().map(|e| e.slug.as_str()).collect();

        assert_eq!(slugs, vec!["how-computers-work", "older"]);
        assert_eq!(essays[0].id, "how-computers-work/index.mdx");
        assert_eq!(essays[0].url(), "/how-computers-work/");
    }

    #[test]
    fn drafts_are_skipped_unless_requested() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("draft.md"), essay("Draft", "2025-01-01", true)).unwrap();
        fs::write(temp.path().join("live.md"), essay("Live", "2025-01-02", false)).unwrap();

        let published = load_essays(temp.path(), false).unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].slug, "live");
        assert_eq!(load_essays(temp.path(), true).unwrap().len(), 2);
    }

    #[test]
    fn duplicate_slugs_fail() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("gates")).unwrap();
        fs::write(temp.path().join("gates.md"), essay("A", "2025-01-01", false)).unwrap();
        fs::write(temp.path().join("gates/index.mdx"), essay("B", "2025-01-01", false)).unwrap();

        let err = load_essays(temp.path(), false).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateSlug { ref slug, .. } if slug == "gates"));
    }

    #[test]
    fn schema_errors_list_every_issue() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("broken.md"),
            "---\ntitle: 42\npubDatetime: soon\n---\nBody\n",
        )
        .unwrap();

        let err = load_essays(temp.path(), false).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("broken.md"));
        assert!(message.contains("title"));
        assert!(message.contains("pubDatetime"));
        assert!(message.contains("description"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempdir().unwrap();
        assert!(matches!(
            load_essays(&temp.path().join("nope"), false),
            Err(BuildError::ReadError(_))
        ));
    }
}
