//! Code block metadata.

/// Programming language of a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Rust,
    Tsx,
    Jsx,
    TypeScript,
    JavaScript,
    Python,
    C,
    Html,
    Css,
    Json,
    Bash,
    #[default]
    Unknown,
}

impl Language {
    /// Parse language from code fence info string.
    pub fn from_info(info: &str) -> Self {
        let lang = info.split_whitespace().next().unwrap_or("");
        match lang.to_lowercase().as_str() {
            "rs" | "rust" => Self::Rust,
            "tsx" => Self::Tsx,
            "jsx" => Self::Jsx,
            "ts" | "typescript" => Self::TypeScript,
            "js" | "javascript" => Self::JavaScript,
            "py" | "python" => Self::Python,
            "c" | "h" => Self::C,
            "html" => Self::Html,
            "css" => Self::Css,
            "json" => Self::Json,
            "bash" | "sh" | "shell" => Self::Bash,
            _ => Self::Unknown,
        }
    }

    /// Class suffix used when rendering (`language-{name}`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Tsx => "tsx",
            Self::Jsx => "jsx",
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::C => "c",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Bash => "bash",
            Self::Unknown => "text",
        }
    }

    /// Terminal sessions read better without line numbers.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Bash)
    }
}

/// A fenced code block from an essay.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Programming language
    pub language: Language,

    /// Source code content
    pub source: String,

    /// Frame title from `title="..."` in the info string
    pub title: Option<String>,

    /// Explicit `showLineNumbers` / `showLineNumbers=false` override
    pub line_numbers: Option<bool>,
}

impl CodeBlock {
    /// Build a block from its fence info string and body.
    pub fn from_fence(info: &str, source: String) -> Self {
        Self {
            language: Language::from_info(info),
            source,
            title: extract_title(info),
            line_numbers: extract_line_numbers(info),
        }
    }

    /// Whether to render line numbers, given the site-wide default.
    pub fn show_line_numbers(&self, default: bool) -> bool {
        self.line_numbers
            .unwrap_or(default && !self.language.is_terminal())
    }
}

/// Extract a frame title from a code fence info string.
///
/// Supports `title="main.rs"` and the shorter `file=main.rs`.
pub fn extract_title(info: &str) -> Option<String> {
    if let Some(start) = info.find("title=\"") {
        let rest = &info[start + 7..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }

    if let Some(start) = info.find("file=") {
        let rest = &info[start + 5..];
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let title = rest[..end].trim_matches('"');
        if !title.is_empty() {
            return Some(title.to_string());
        }
    }

    None
}

fn extract_line_numbers(info: &str) -> Option<bool> {
    info.split_whitespace().find_map(|token| match token {
        "showLineNumbers" | "showLineNumbers=true" | "showLineNumbers={true}" => Some(true),
        "showLineNumbers=false" | "showLineNumbers={false}" => Some(false),
        _ => None,
    })
}
