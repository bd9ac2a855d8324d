//! Per-invocation engine options

/// Globs excluded from every search
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "*.pyc",
    ".venv",
    "venv",
    "dist",
    "build",
    "target",
    "vendor",
];

/// Options for one engine invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    /// Inclusion globs; a file must match at least one when non-empty
    pub globs: Vec<String>,
    /// Exclusion globs applied on top of [`DEFAULT_EXCLUDES`]
    pub exclude_globs: Vec<String>,
    pub context_lines: usize,
    /// Stop after this many matching lines
    pub max_matches: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            globs: Vec::new(),
            exclude_globs: Vec::new(),
            context_lines: 0,
            max_matches: 100,
        }
    }
}

impl EngineOptions {
    pub fn with_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.globs.extend(globs.into_iter().map(Into::into));
        self
    }
}
