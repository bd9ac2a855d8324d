//! Relevance ranker

use std::collections::HashSet;

use sift_core::{
    Candidate, FileCategory, Language, RankingWeights, ScoreBreakdown, ScoredResult, SearchMode,
    SearchQuery,
};

use super::signals;

/// Scores candidates with additive, bounded signals
///
/// Deterministic: equal input yields equal output order.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    weights: RankingWeights,
}

impl Ranker {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Score and order candidates, best first
    pub fn rank(&self, candidates: Vec<Candidate>, query: &SearchQuery) -> Vec<ScoredResult> {
        let needle = match query.mode() {
            SearchMode::Text | SearchMode::Symbol => Some(query.query()),
            SearchMode::Regex => None,
        };

        let mut results: Vec<ScoredResult> = candidates
            .into_iter()
            .map(|candidate| self.score(candidate, needle))
            .collect();
        results.sort_by(ScoredResult::response_order);
        results
    }

    fn score(&self, candidate: Candidate, needle: Option<&str>) -> ScoredResult {
        let w = &self.weights;
        let (raw, symbol) = candidate.into_parts();
        let category = FileCategory::from_path(&raw.file_path);

        let signals = ScoreBreakdown {
            match_quality: signals::match_quality(&raw, needle, w),
            role: signals::role(symbol.map(|(_, role)| role), w),
            category: signals::category(category, w),
            position: signals::position(&raw, w),
            line_length: signals::line_length(&raw, w),
            path_depth: signals::path_depth(&raw.file_path, w),
        };

        ScoredResult {
            language: Language::from_path(&raw.file_path),
            category,
            relevance_score: signals.total(),
            symbol_type: symbol.map(|(kind, _)| kind),
            symbol_role: symbol.map(|(_, role)| role),
            signals,
            file_path: raw.file_path,
            line_number: raw.line_number,
            line_content: raw.line_content,
            match_start: raw.match_start,
            match_end: raw.match_end,
            context_before: raw.context_before,
            context_after: raw.context_after,
        }
    }
}

/// Drop repeated file+line entries, keeping the first (highest-scoring) one
///
/// Expects input already in response order.
pub fn dedup_ranked(results: Vec<ScoredResult>) -> Vec<ScoredResult> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|r| seen.insert((r.file_path.clone(), r.line_number)))
        .collect()
}
