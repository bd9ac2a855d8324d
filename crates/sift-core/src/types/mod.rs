//! Data model shared by every search component

mod matches;
mod query;
mod symbol;

pub use matches::{Candidate, RawMatch, ScoreBreakdown, ScoredResult, SymbolOccurrence};
pub use query::{
    DEFAULT_CONTEXT_LINES, DEFAULT_MAX_RESULTS, SearchMode, SearchQuery, SearchQueryBuilder,
};
pub use symbol::{SymbolKind, SymbolRole};
