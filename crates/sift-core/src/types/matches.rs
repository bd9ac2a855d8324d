//! Match and result types
//!
//! `RawMatch` is what the matching engine reports, `SymbolOccurrence` adds
//! symbol semantics on the symbol path, and `ScoredResult` is the ranked,
//! externally visible record.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::symbol::{SymbolKind, SymbolRole};
use crate::language::{FileCategory, Language};

/// One matching line as emitted by the external engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatch {
    /// Path relative to the search root, `/`-separated
    pub file_path: String,
    /// 1-indexed line number
    pub line_number: u64,
    /// Full line text without the trailing newline
    pub line_content: String,
    /// Byte offset where the match starts within the line
    pub match_start: usize,
    /// Byte offset one past the end of the match
    pub match_end: usize,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
}

impl RawMatch {
    /// The matched slice of the line, if the offsets fall on char boundaries
    pub fn matched_text(&self) -> Option<&str> {
        self.line_content.get(self.match_start..self.match_end)
    }
}

/// A raw match interpreted as a symbol occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolOccurrence {
    pub raw: RawMatch,
    pub kind: SymbolKind,
    pub role: SymbolRole,
}

/// Input to ranking: a plain match or a symbol occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Raw(RawMatch),
    Symbol(SymbolOccurrence),
}

impl Candidate {
    pub fn into_parts(self) -> (RawMatch, Option<(SymbolKind, SymbolRole)>) {
        match self {
            Candidate::Raw(raw) => (raw, None),
            Candidate::Symbol(occ) => (occ.raw, Some((occ.kind, occ.role))),
        }
    }
}

impl From<RawMatch> for Candidate {
    fn from(raw: RawMatch) -> Self {
        Candidate::Raw(raw)
    }
}

impl From<SymbolOccurrence> for Candidate {
    fn from(occ: SymbolOccurrence) -> Self {
        Candidate::Symbol(occ)
    }
}

/// Per-signal contributions to a relevance score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub match_quality: f64,
    pub role: f64,
    pub category: f64,
    pub position: f64,
    pub line_length: f64,
    pub path_depth: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.match_quality
            + self.role
            + self.category
            + self.position
            + self.line_length
            + self.path_depth
    }
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub file_path: String,
    pub line_number: u64,
    pub line_content: String,
    pub match_start: usize,
    pub match_end: usize,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
    pub relevance_score: f64,
    pub language: Language,
    pub category: FileCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_type: Option<SymbolKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_role: Option<SymbolRole>,
    pub signals: ScoreBreakdown,
}

impl ScoredResult {
    /// Response ordering: descending score, then ascending path, then line
    pub fn response_order(a: &ScoredResult, b: &ScoredResult) -> Ordering {
        b.relevance_score
            .total_cmp(&a.relevance_score)
            .then_with(|| a.file_path.cmp(&b.file_path))
            .then_with(|| a.line_number.cmp(&b.line_number))
    }
}
