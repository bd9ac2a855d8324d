//! Search request types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::symbol::SymbolKind;
use crate::error::{SearchError, SiftResult};
use crate::language::Language;

/// Default number of context lines captured around a match
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// Default result cap
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// How the query string is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Literal text, escaped before it reaches the engine
    #[default]
    Text,
    /// Regular expression passed to the engine verbatim
    Regex,
    /// Symbol name resolved through per-language templates
    Symbol,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Text => "text",
            SearchMode::Regex => "regex",
            SearchMode::Symbol => "symbol",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "literal" => Ok(SearchMode::Text),
            "regex" | "regexp" => Ok(SearchMode::Regex),
            "symbol" => Ok(SearchMode::Symbol),
            other => Err(format!(
                "Unknown search type: {} (expected text, regex or symbol)",
                other
            )),
        }
    }
}

/// An immutable, validated search request
///
/// Built through [`SearchQuery::builder`]; `build()` enforces a non-empty
/// query and a positive result cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    query: String,
    mode: SearchMode,
    file_pattern: Option<String>,
    exclude_globs: Vec<String>,
    case_sensitive: bool,
    whole_word: bool,
    context_lines: usize,
    max_results: usize,
    language: Option<Language>,
    symbol_kind: Option<SymbolKind>,
    exact_match: bool,
}

impl SearchQuery {
    /// Start building a query
    pub fn builder(mode: SearchMode, query: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder::new(mode, query)
    }

    /// Shorthand for a literal text query
    pub fn text(query: impl Into<String>) -> SearchQueryBuilder {
        Self::builder(SearchMode::Text, query)
    }

    /// Shorthand for a regex query
    pub fn regex(pattern: impl Into<String>) -> SearchQueryBuilder {
        Self::builder(SearchMode::Regex, pattern)
    }

    /// Shorthand for a symbol query
    pub fn symbol(name: impl Into<String>) -> SearchQueryBuilder {
        Self::builder(SearchMode::Symbol, name)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn file_pattern(&self) -> Option<&str> {
        self.file_pattern.as_deref()
    }

    pub fn exclude_globs(&self) -> &[String] {
        &self.exclude_globs
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn whole_word(&self) -> bool {
        self.whole_word
    }

    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn symbol_kind(&self) -> Option<SymbolKind> {
        self.symbol_kind
    }

    pub fn exact_match(&self) -> bool {
        self.exact_match
    }
}

/// Builder for [`SearchQuery`]
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    inner: SearchQuery,
}

impl SearchQueryBuilder {
    fn new(mode: SearchMode, query: impl Into<String>) -> Self {
        Self {
            inner: SearchQuery {
                query: query.into(),
                mode,
                file_pattern: None,
                exclude_globs: Vec::new(),
                case_sensitive: false,
                whole_word: false,
                context_lines: DEFAULT_CONTEXT_LINES,
                max_results: DEFAULT_MAX_RESULTS,
                language: None,
                symbol_kind: None,
                exact_match: true,
            },
        }
    }

    pub fn file_pattern(mut self, glob: impl Into<String>) -> Self {
        self.inner.file_pattern = Some(glob.into());
        self
    }

    pub fn maybe_file_pattern(mut self, glob: Option<String>) -> Self {
        self.inner.file_pattern = glob.filter(|g| !g.trim().is_empty());
        self
    }

    pub fn exclude(mut self, glob: impl Into<String>) -> Self {
        self.inner.exclude_globs.push(glob.into());
        self
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.inner.case_sensitive = yes;
        self
    }

    pub fn whole_word(mut self, yes: bool) -> Self {
        self.inner.whole_word = yes;
        self
    }

    pub fn context_lines(mut self, lines: usize) -> Self {
        self.inner.context_lines = lines;
        self
    }

    pub fn max_results(mut self, cap: usize) -> Self {
        self.inner.max_results = cap;
        self
    }

    pub fn language(mut self, language: Option<Language>) -> Self {
        self.inner.language = language;
        self
    }

    pub fn symbol_kind(mut self, kind: Option<SymbolKind>) -> Self {
        self.inner.symbol_kind = kind;
        self
    }

    pub fn exact_match(mut self, yes: bool) -> Self {
        self.inner.exact_match = yes;
        self
    }

    /// Validate and freeze the query
    pub fn build(self) -> SiftResult<SearchQuery> {
        let query = self.inner;
        if query.query.trim().is_empty() {
            return Err(SearchError::InvalidQuery(
                "query must not be empty".to_string(),
            ));
        }
        if query.max_results == 0 {
            return Err(SearchError::InvalidQuery(
                "max_results must be greater than zero".to_string(),
            ));
        }
        if query.mode == SearchMode::Symbol
            && !query
                .query
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(SearchError::InvalidQuery(format!(
                "symbol name '{}' must be a bare identifier",
                query.query
            )));
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let query = SearchQuery::text("TODO").build().unwrap();
        assert_eq!(query.mode(), SearchMode::Text);
        assert_eq!(query.context_lines(), DEFAULT_CONTEXT_LINES);
        assert_eq!(query.max_results(), DEFAULT_MAX_RESULTS);
        assert!(!query.case_sensitive());
        assert!(query.exact_match());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let err = SearchQuery::text("TODO").max_results(0).build().unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[test]
    fn test_empty_query_rejected() {
        let err = SearchQuery::regex("   ").build().unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[test]
    fn test_symbol_requires_identifier() {
        assert!(SearchQuery::symbol("authenticate").build().is_ok());
        assert!(SearchQuery::symbol("parse_v2").build().is_ok());
        assert!(SearchQuery::symbol("foo.bar").build().is_err());
    }

    #[test]
    fn test_blank_file_pattern_is_dropped() {
        let query = SearchQuery::text("x")
            .maybe_file_pattern(Some("  ".to_string()))
            .build()
            .unwrap();
        assert_eq!(query.file_pattern(), None);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("REGEX".parse::<SearchMode>().unwrap(), SearchMode::Regex);
        assert!("fuzzy".parse::<SearchMode>().is_err());
    }
}
