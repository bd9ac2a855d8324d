//! Wire-level request contract and plain-text rendering of results

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sift_core::config::SearchDefaults;
use sift_core::{
    Language, ScoredResult, SearchError, SearchMode, SearchQuery, SiftResult, SymbolKind,
};

/// A search request as agents send it (JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub query: String,
    pub search_type: Option<String>,
    pub file_pattern: Option<String>,
    pub exclude: Vec<String>,
    pub case_sensitive: Option<bool>,
    pub whole_word: Option<bool>,
    pub context_lines: Option<usize>,
    pub max_results: Option<usize>,
    pub symbol_type: Option<String>,
    pub language: Option<String>,
    pub exact_match: Option<bool>,
}

impl SearchRequest {
    /// Validate and convert into a [`SearchQuery`], filling gaps from `defaults`
    pub fn into_query(self, defaults: &SearchDefaults) -> SiftResult<SearchQuery> {
        let mode = match self.search_type.as_deref() {
            Some(kind) => kind.parse::<SearchMode>().map_err(SearchError::InvalidQuery)?,
            None => SearchMode::Text,
        };
        let symbol_kind = self
            .symbol_type
            .as_deref()
            .map(str::parse::<SymbolKind>)
            .transpose()
            .map_err(SearchError::InvalidQuery)?;
        let language = self
            .language
            .as_deref()
            .map(str::parse::<Language>)
            .transpose()
            .map_err(SearchError::InvalidQuery)?;

        let mut builder = SearchQuery::builder(mode, self.query)
            .maybe_file_pattern(self.file_pattern)
            .case_sensitive(self.case_sensitive.unwrap_or(false))
            .whole_word(self.whole_word.unwrap_or(false))
            .context_lines(self.context_lines.unwrap_or(defaults.context_lines))
            .max_results(self.max_results.unwrap_or(defaults.max_results))
            .language(language)
            .symbol_kind(symbol_kind)
            .exact_match(self.exact_match.unwrap_or(true));
        for glob in self.exclude {
            builder = builder.exclude(glob);
        }
        builder.build()
    }
}

/// Render results as the plain text agents read
pub fn render_results(results: &[ScoredResult], query: &SearchQuery) -> String {
    if results.is_empty() {
        return match query.mode() {
            SearchMode::Symbol => format!("No occurrences found for symbol: {}", query.query()),
            SearchMode::Regex => format!("No matches found for pattern: {}", query.query()),
            SearchMode::Text => format!("No matches found for: {}", query.query()),
        };
    }

    let mut out = match query.mode() {
        SearchMode::Symbol => format!(
            "Found {} occurrence(s) of '{}':\n",
            results.len(),
            query.query()
        ),
        SearchMode::Regex => format!(
            "Found {} matches for pattern '{}':\n",
            results.len(),
            query.query()
        ),
        SearchMode::Text => format!("Found {} matches for '{}':\n", results.len(), query.query()),
    };

    for (i, result) in results.iter().enumerate() {
        match (result.symbol_type, result.symbol_role) {
            (Some(kind), Some(role)) => {
                let _ = write!(
                    out,
                    "\n{}. {} {} in {}:{}",
                    i + 1,
                    kind,
                    role,
                    result.file_path,
                    result.line_number
                );
            }
            _ => {
                let _ = write!(out, "\n{}. {}:{}", i + 1, result.file_path, result.line_number);
            }
        }
        if result.language != Language::Unknown {
            let _ = write!(out, "\n   Language: {}", result.language);
        }
        let _ = write!(out, "\n   Relevance: {:.2}", result.relevance_score);

        let before = result.context_before.len().saturating_sub(2);
        for line in &result.context_before[before..] {
            let _ = write!(out, "\n   | {}", line);
        }
        let _ = write!(out, "\n   > {}", result.line_content);
        for line in result.context_after.iter().take(2) {
            let _ = write!(out, "\n   | {}", line);
        }
        out.push('\n');
    }
    out
}
