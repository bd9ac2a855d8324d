//! Language and file category detection
//!
//! Both are derived from the path alone (extension, file name and directory
//! components); file contents are never inspected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Programming or markup language of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Rust,
    Ruby,
    Php,
    Swift,
    Kotlin,
    Shell,
    Sql,
    Html,
    Css,
    Markdown,
    Json,
    Yaml,
    Toml,
    Xml,
    Unknown,
}

impl Language {
    /// Languages that carry symbol templates, in a fixed order
    pub const CODE: [Language; 12] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Go,
        Language::Java,
        Language::Rust,
        Language::CSharp,
        Language::C,
        Language::Cpp,
        Language::Ruby,
        Language::Php,
        Language::Kotlin,
    ];

    /// Detect the language from a file path's extension
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| Self::from_extension(&ext.to_lowercase()))
            .unwrap_or(Language::Unknown)
    }

    /// Map a lowercase extension (without the dot) to a language
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "py" | "pyw" | "pyi" => Language::Python,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Language::Cpp,
            "cs" => Language::CSharp,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "swift" => Language::Swift,
            "kt" | "kts" => Language::Kotlin,
            "sh" | "bash" | "zsh" => Language::Shell,
            "sql" => Language::Sql,
            "html" | "htm" => Language::Html,
            "css" | "scss" | "sass" | "less" => Language::Css,
            "md" | "markdown" => Language::Markdown,
            "json" => Language::Json,
            "yaml" | "yml" => Language::Yaml,
            "toml" => Language::Toml,
            "xml" => Language::Xml,
            _ => Language::Unknown,
        }
    }

    /// File globs handed to the matching engine when a search is restricted
    /// to this language
    pub fn globs(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["*.py", "*.pyi"],
            Language::JavaScript => &["*.js", "*.jsx", "*.mjs", "*.cjs"],
            Language::TypeScript => &["*.ts", "*.tsx", "*.mts", "*.cts"],
            Language::Java => &["*.java"],
            Language::C => &["*.c", "*.h"],
            Language::Cpp => &["*.cpp", "*.cc", "*.cxx", "*.hpp", "*.hh", "*.hxx", "*.h"],
            Language::CSharp => &["*.cs"],
            Language::Go => &["*.go"],
            Language::Rust => &["*.rs"],
            Language::Ruby => &["*.rb"],
            Language::Php => &["*.php"],
            Language::Swift => &["*.swift"],
            Language::Kotlin => &["*.kt", "*.kts"],
            Language::Shell => &["*.sh", "*.bash", "*.zsh"],
            Language::Sql => &["*.sql"],
            Language::Html => &["*.html", "*.htm"],
            Language::Css => &["*.css", "*.scss", "*.sass", "*.less"],
            Language::Markdown => &["*.md", "*.markdown"],
            Language::Json => &["*.json"],
            Language::Yaml => &["*.yaml", "*.yml"],
            Language::Toml => &["*.toml"],
            Language::Xml => &["*.xml"],
            Language::Unknown => &[],
        }
    }

    /// Whether this is a text or markup format rather than program source
    pub fn is_markup(&self) -> bool {
        matches!(
            self,
            Language::Html
                | Language::Css
                | Language::Markdown
                | Language::Json
                | Language::Yaml
                | Language::Toml
                | Language::Xml
                | Language::Unknown
        )
    }

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Shell => "shell",
            Language::Sql => "sql",
            Language::Html => "html",
            Language::Css => "css",
            Language::Markdown => "markdown",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Xml => "xml",
            Language::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = match s.trim().to_lowercase().as_str() {
            "python" | "py" => Language::Python,
            "javascript" | "js" => Language::JavaScript,
            "typescript" | "ts" => Language::TypeScript,
            "java" => Language::Java,
            "c" => Language::C,
            "cpp" | "c++" | "cxx" => Language::Cpp,
            "csharp" | "c#" | "cs" => Language::CSharp,
            "go" | "golang" => Language::Go,
            "rust" | "rs" => Language::Rust,
            "ruby" | "rb" => Language::Ruby,
            "php" => Language::Php,
            "swift" => Language::Swift,
            "kotlin" | "kt" => Language::Kotlin,
            "shell" | "sh" | "bash" => Language::Shell,
            "sql" => Language::Sql,
            "html" => Language::Html,
            "css" => Language::Css,
            "markdown" | "md" => Language::Markdown,
            "json" => Language::Json,
            "yaml" | "yml" => Language::Yaml,
            "toml" => Language::Toml,
            "xml" => Language::Xml,
            other => return Err(format!("Unknown language: {}", other)),
        };
        Ok(lang)
    }
}

/// Coarse role a file plays in a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Source,
    Test,
    Documentation,
    Configuration,
    Other,
}

const TEST_DIRS: &[&str] = &["test", "tests", "__tests__", "spec", "specs", "testing"];

const DOC_FILES: &[&str] = &[
    "readme", "readme.md", "readme.txt", "readme.rst", "license", "license.md", "license.txt",
    "contributing.md", "changelog.md", "history.md", "authors", "contributors", "notice",
];

const DOC_EXTENSIONS: &[&str] = &["md", "markdown", "rst", "txt", "adoc"];

const CONFIG_FILES: &[&str] = &[
    "package.json", "package-lock.json", "yarn.lock", "requirements.txt", "pipfile",
    "pipfile.lock", "pyproject.toml", "setup.py", "setup.cfg", "cargo.toml", "cargo.lock",
    "go.mod", "go.sum", "gemfile", "gemfile.lock", "composer.json", "composer.lock",
    "tsconfig.json", "jsconfig.json", "webpack.config.js", "vite.config.js", "dockerfile",
    "docker-compose.yml", "docker-compose.yaml", "makefile", "rakefile", "build.gradle",
    "pom.xml", ".gitignore", ".dockerignore", ".editorconfig", ".env",
];

const CONFIG_EXTENSIONS: &[&str] = &[
    "json", "yaml", "yml", "toml", "ini", "cfg", "conf", "config", "env", "xml", "lock",
];

impl FileCategory {
    /// Classify a (repository-relative) path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_lowercase())
            .unwrap_or_default();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let language = Language::from_extension(&ext);

        if !language.is_markup() && is_test_path(path, &name) {
            return FileCategory::Test;
        }
        if CONFIG_FILES.contains(&name.as_str()) {
            return FileCategory::Configuration;
        }
        if DOC_FILES.contains(&name.as_str()) || DOC_EXTENSIONS.contains(&ext.as_str()) {
            return FileCategory::Documentation;
        }
        if CONFIG_EXTENSIONS.contains(&ext.as_str()) {
            return FileCategory::Configuration;
        }
        if !language.is_markup() {
            return FileCategory::Source;
        }
        FileCategory::Other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Source => "source",
            FileCategory::Test => "test",
            FileCategory::Documentation => "documentation",
            FileCategory::Configuration => "configuration",
            FileCategory::Other => "other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_test_path(path: &Path, name: &str) -> bool {
    let in_test_dir = path
        .parent()
        .map(|parent| {
            parent.components().any(|c| {
                c.as_os_str()
                    .to_str()
                    .map(|s| TEST_DIRS.contains(&s.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false);
    if in_test_dir {
        return true;
    }

    let stem = name.split('.').next().unwrap_or_default();
    stem.starts_with("test_")
        || stem.ends_with("_test")
        || stem.ends_with("_tests")
        || stem.ends_with("_spec")
        || name.contains(".test.")
        || name.contains(".spec.")
        || (stem.len() > 4 && stem.ends_with("test") && path_has_pascal_test_suffix(path))
}

// FooTest.java / FooTests.cs style names; checked on the original casing.
fn path_has_pascal_test_suffix(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with("Test") || s.ends_with("Tests"))
        .unwrap_or(false)
}
