use std::path::Path;

/// Editor language mode derived from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    C,
    Cpp,
    JavaScript,
    TypeScript,
    Python,
    Java,
    Html,
    Css,
    Json,
    Markdown,
    Xml,
    Sql,
    #[default]
    PlainText,
}

impl LanguageId {
    pub fn from_file_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("c" | "h") => Self::C,
            Some("cpp" | "cc" | "cxx" | "hpp") => Self::Cpp,
            Some("js" | "jsx") => Self::JavaScript,
            Some("ts" | "tsx") => Self::TypeScript,
            Some("py") => Self::Python,
            Some("java") => Self::Java,
            Some("html") => Self::Html,
            Some("css") => Self::Css,
            Some("json") => Self::Json,
            Some("md") => Self::Markdown,
            Some("xml") => Self::Xml,
            Some("sql") => Self::Sql,
            _ => Self::PlainText,
        }
    }

    /// Mode name handed to the editor widget.
    pub fn language_id(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Xml => "xml",
            Self::Sql => "sql",
            Self::PlainText => "plaintext",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/language.rs"]
mod tests;
