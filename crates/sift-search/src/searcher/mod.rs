//! Query façade
//!
//! Resolves the working copy, drives the engine (once per query for text and
//! regex, once per language for symbols), ranks, deduplicates and caps.

use std::path::Path;
use std::sync::Arc;

use futures::{StreamExt, stream};
use glob::{MatchOptions, Pattern};
use sift_core::config::SearchDefaults;
use sift_core::{
    Candidate, Language, ScoredResult, SearchError, SearchMode, SearchQuery, SiftConfig,
    SiftResult,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::cache::{CacheEntry, RepositoryCache};
use crate::engine::{EngineOptions, RipgrepEngine, SearchEngine, literal_pattern};
use crate::ranking::{Ranker, dedup_ranked};
use crate::symbols::{Classifier, SearchPlan, resolve};

/// A remote repository to search, identified by a caller-chosen key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub id: String,
    pub remote_url: String,
    /// Update an existing working copy before searching
    pub refresh: bool,
}

impl RepositoryRef {
    pub fn new(id: impl Into<String>, remote_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            remote_url: remote_url.into(),
            refresh: false,
        }
    }

    pub fn refreshed(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }
}

/// Entry point for ranked text, regex and symbol searches
pub struct CodeSearcher {
    engine: Arc<dyn SearchEngine>,
    cache: Arc<RepositoryCache>,
    ranker: Ranker,
    defaults: SearchDefaults,
}

impl CodeSearcher {
    pub fn new(
        engine: Arc<dyn SearchEngine>,
        cache: Arc<RepositoryCache>,
        ranker: Ranker,
        defaults: SearchDefaults,
    ) -> Self {
        Self {
            engine,
            cache,
            ranker,
            defaults,
        }
    }

    /// Build a searcher backed by ripgrep and git
    ///
    /// Fails with `EngineUnavailable` when ripgrep cannot be run.
    pub async fn from_config(config: &SiftConfig) -> SiftResult<Self> {
        config.validate()?;
        let engine = RipgrepEngine::new(&config.engine).await?;
        Ok(Self::new(
            Arc::new(engine),
            Arc::new(RepositoryCache::new(&config.cache)),
            Ranker::new(config.ranking.clone()),
            config.search.clone(),
        ))
    }

    pub fn cache(&self) -> &Arc<RepositoryCache> {
        &self.cache
    }

    pub fn defaults(&self) -> &SearchDefaults {
        &self.defaults
    }

    /// Text or regex search over a repository
    pub async fn search(
        &self,
        repo: &RepositoryRef,
        query: &SearchQuery,
    ) -> SiftResult<Vec<ScoredResult>> {
        self.search_with_cancel(repo, query, &CancellationToken::new())
            .await
    }

    pub async fn search_with_cancel(
        &self,
        repo: &RepositoryRef,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> SiftResult<Vec<ScoredResult>> {
        if query.mode() == SearchMode::Symbol {
            return Err(SearchError::InvalidQuery(
                "symbol queries go through find_symbol".to_string(),
            ));
        }
        let entry = self.resolve_repository(repo).await?;
        self.search_in_with_cancel(&entry.path, query, cancel).await
    }

    /// Symbol search over a repository
    pub async fn find_symbol(
        &self,
        repo: &RepositoryRef,
        query: &SearchQuery,
    ) -> SiftResult<Vec<ScoredResult>> {
        self.find_symbol_with_cancel(repo, query, &CancellationToken::new())
            .await
    }

    pub async fn find_symbol_with_cancel(
        &self,
        repo: &RepositoryRef,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> SiftResult<Vec<ScoredResult>> {
        if query.mode() != SearchMode::Symbol {
            return Err(SearchError::InvalidQuery(format!(
                "find_symbol needs a symbol query, got {}",
                query.mode()
            )));
        }
        let entry = self.resolve_repository(repo).await?;
        self.search_in_with_cancel(&entry.path, query, cancel).await
    }

    /// Any query over an already-local directory
    pub async fn search_in(&self, root: &Path, query: &SearchQuery) -> SiftResult<Vec<ScoredResult>> {
        self.search_in_with_cancel(root, query, &CancellationToken::new())
            .await
    }

    #[instrument(skip(self, query, cancel), fields(root = %root.display(), mode = %query.mode(), query = %query.query()))]
    pub async fn search_in_with_cancel(
        &self,
        root: &Path,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> SiftResult<Vec<ScoredResult>> {
        let candidates = match query.mode() {
            SearchMode::Text | SearchMode::Regex => self.collect_matches(root, query, cancel).await?,
            SearchMode::Symbol => self.collect_symbols(root, query, cancel).await?,
        };
        let found = candidates.len();

        let mut results = dedup_ranked(self.ranker.rank(candidates, query));
        results.truncate(query.max_results());
        debug!(found, returned = results.len(), "search complete");
        Ok(results)
    }

    async fn resolve_repository(&self, repo: &RepositoryRef) -> SiftResult<CacheEntry> {
        self.cache
            .ensure(&repo.id, &repo.remote_url, repo.refresh)
            .await
    }

    /// Matches requested from the engine. Unbounded when results are
    /// filtered after the engine returns, since its cap counts in path order.
    fn engine_cap(&self, query: &SearchQuery, post_filtered: bool) -> usize {
        if post_filtered {
            return usize::MAX;
        }
        query
            .max_results()
            .saturating_mul(self.defaults.over_fetch_factor.max(1))
    }

    async fn collect_matches(
        &self,
        root: &Path,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> SiftResult<Vec<Candidate>> {
        let pattern = match query.mode() {
            SearchMode::Regex => query.query().to_string(),
            _ => literal_pattern(query.query()),
        };

        let language_filter = match (query.file_pattern(), query.language()) {
            (Some(_), Some(language)) => Some(language),
            _ => None,
        };
        let globs: Vec<String> = match (query.file_pattern(), query.language()) {
            (Some(glob), _) => vec![glob.to_string()],
            (None, Some(language)) => language.globs().iter().map(|g| g.to_string()).collect(),
            (None, None) => Vec::new(),
        };

        let options = EngineOptions {
            case_sensitive: query.case_sensitive(),
            whole_word: query.whole_word(),
            globs,
            exclude_globs: query.exclude_globs().to_vec(),
            context_lines: query.context_lines(),
            max_matches: self.engine_cap(query, language_filter.is_some()),
        };

        let raw = self.engine.execute(root, &pattern, &options, cancel).await?;
        Ok(raw
            .into_iter()
            .filter(|m| language_filter.is_none_or(|l| Language::from_path(&m.file_path) == l))
            .map(Candidate::from)
            .collect())
    }

    async fn collect_symbols(
        &self,
        root: &Path,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> SiftResult<Vec<Candidate>> {
        let name = query.query();
        let file_filter = query
            .file_pattern()
            .map(|glob| {
                Pattern::new(glob).map_err(|e| {
                    SearchError::InvalidQuery(format!("invalid file pattern '{}': {}", glob, e))
                })
            })
            .transpose()?;

        let plans = SearchPlan::group(resolve(
            name,
            query.symbol_kind(),
            query.language(),
            query.exact_match(),
        ));
        if plans.is_empty() {
            return Ok(Vec::new());
        }

        let cap = self.engine_cap(query, file_filter.is_some());
        let file_filter = file_filter.as_ref();
        let per_plan: Vec<SiftResult<Vec<Candidate>>> = stream::iter(plans)
            .map(|plan| self.run_plan(root, plan, query, cap, file_filter, cancel))
            .buffered(self.defaults.symbol_concurrency.max(1))
            .collect()
            .await;

        let mut candidates = Vec::new();
        for result in per_plan {
            candidates.extend(result?);
        }
        Ok(candidates)
    }

    async fn run_plan(
        &self,
        root: &Path,
        plan: SearchPlan,
        query: &SearchQuery,
        cap: usize,
        file_filter: Option<&Pattern>,
        cancel: &CancellationToken,
    ) -> SiftResult<Vec<Candidate>> {
        let classifier = Classifier::new(
            query.query(),
            &plan.patterns,
            query.exact_match(),
            query.case_sensitive(),
        )?;
        let options = EngineOptions {
            case_sensitive: query.case_sensitive(),
            whole_word: false,
            globs: plan.globs(),
            exclude_globs: query.exclude_globs().to_vec(),
            context_lines: query.context_lines(),
            max_matches: cap,
        };

        let raw = self
            .engine
            .execute(root, &plan.combined_regex(), &options, cancel)
            .await?;
        debug!(language = %plan.language, matches = raw.len(), "symbol plan finished");

        Ok(raw
            .into_iter()
            .filter(|m| file_filter.is_none_or(|p| glob_matches(p, &m.file_path)))
            .filter_map(|m| classifier.classify(m))
            .map(Candidate::from)
            .collect())
    }
}

fn glob_matches(pattern: &Pattern, path: &str) -> bool {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    if pattern.matches_with(path, options) {
        return true;
    }
    // Basename match, as ripgrep does for globs without a separator
    !pattern.as_str().contains('/')
        && path
            .rsplit('/')
            .next()
            .is_some_and(|name| pattern.matches_with(name, options))
}

#[cfg(test)]
mod tests;
