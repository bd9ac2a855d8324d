use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sift_core::config::SearchDefaults;
use sift_core::{RawMatch, SearchError, SearchQuery, SymbolKind, SymbolRole};
use tempfile::TempDir;

use super::{CodeSearcher, RepositoryRef};
use crate::cache::{GitTransport, RepositoryCache, TransportError};
use crate::engine::MockSearchEngine;
use crate::ranking::Ranker;

struct DirTransport;

#[async_trait]
impl GitTransport for DirTransport {
    async fn shallow_clone(&self, _remote_url: &str, dest: &Path) -> Result<(), TransportError> {
        std::fs::create_dir_all(dest).unwrap();
        Ok(())
    }

    async fn fetch_latest(&self, _repo_dir: &Path) -> Result<(), TransportError> {
        Ok(())
    }
}

fn raw(path: &str, line: u64, content: &str, start: usize, end: usize) -> RawMatch {
    RawMatch {
        file_path: path.to_string(),
        line_number: line,
        line_content: content.to_string(),
        match_start: start,
        match_end: end,
        context_before: vec![],
        context_after: vec![],
    }
}

fn searcher(engine: MockSearchEngine, workspace: &Path) -> CodeSearcher {
    CodeSearcher::new(
        Arc::new(engine),
        Arc::new(RepositoryCache::with_transport(
            workspace,
            Arc::new(DirTransport),
            Duration::from_secs(5),
        )),
        Ranker::default(),
        SearchDefaults::default(),
    )
}

#[tokio::test]
async fn test_text_search_escapes_and_over_fetches() {
    let workspace = TempDir::new().unwrap();
    let mut engine = MockSearchEngine::new();
    engine
        .expect_execute()
        .withf(|_, pattern, options, _| {
            pattern == r"render\(" && options.max_matches == 15 && !options.case_sensitive
        })
        .times(1)
        .returning(|_, _, _, _| Ok(vec![raw("view.py", 3, "    render(ctx)", 4, 11)]));

    let query = SearchQuery::text("render(").max_results(5).build().unwrap();
    let results = searcher(engine, workspace.path())
        .search_in(workspace.path(), &query)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_path, "view.py");
    assert!(results[0].symbol_type.is_none());
}

#[tokio::test]
async fn test_cap_enforced_after_ranking() {
    let workspace = TempDir::new().unwrap();
    let mut engine = MockSearchEngine::new();
    engine.expect_execute().returning(|_, _, _, _| {
        Ok((1..=30)
            .map(|i| {
                let path = if i % 3 == 0 { "README.md" } else { "src/lib.rs" };
                raw(path, i, "// TODO: later", 3, 7)
            })
            .collect())
    });

    let query = SearchQuery::text("TODO").max_results(5).build().unwrap();
    let results = searcher(engine, workspace.path())
        .search_in(workspace.path(), &query)
        .await
        .unwrap();

    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| r.file_path == "src/lib.rs"));
    let lines: Vec<u64> = results.iter().map(|r| r.line_number).collect();
    assert_eq!(lines, vec![1, 2, 4, 5, 7]);
}

#[tokio::test]
async fn test_regex_passed_verbatim_and_errors_propagate() {
    let workspace = TempDir::new().unwrap();
    let mut engine = MockSearchEngine::new();
    engine
        .expect_execute()
        .withf(|_, pattern, _, _| pattern == "(")
        .returning(|_, pattern, _, _| {
            Err(SearchError::InvalidPattern {
                pattern: pattern.to_string(),
                diagnostic: "regex parse error: unclosed group".to_string(),
            })
        });

    let query = SearchQuery::regex("(").build().unwrap();
    let err = searcher(engine, workspace.path())
        .search_in(workspace.path(), &query)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidPattern { .. }));
}

#[tokio::test]
async fn test_find_symbol_definition_then_usage() {
    let workspace = TempDir::new().unwrap();
    let mut engine = MockSearchEngine::new();
    engine
        .expect_execute()
        .withf(|_, _, options, _| options.globs.contains(&"*.py".to_string()))
        .times(1)
        .returning(|_, _, _, _| {
            Ok(vec![
                raw("app.py", 10, "def authenticate(user):", 0, 17),
                raw("app.py", 42, "    authenticate(current_user)", 4, 17),
            ])
        });

    let query = SearchQuery::symbol("authenticate")
        .symbol_kind(Some(SymbolKind::Function))
        .language(Some(sift_core::Language::Python))
        .build()
        .unwrap();
    let results = searcher(engine, workspace.path())
        .search_in(workspace.path(), &query)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].line_number, 10);
    assert_eq!(results[0].symbol_role, Some(SymbolRole::Definition));
    assert_eq!(results[1].line_number, 42);
    assert_eq!(results[1].symbol_role, Some(SymbolRole::Usage));
    assert!(results.iter().all(|r| r.symbol_type == Some(SymbolKind::Function)));
    assert_eq!(results[0].match_start, 4);
    assert_eq!(results[0].match_end, 16);
}

#[tokio::test]
async fn test_symbol_search_covers_every_language_once() {
    let workspace = TempDir::new().unwrap();
    let mut engine = MockSearchEngine::new();
    engine
        .expect_execute()
        .times(sift_core::Language::CODE.len())
        .returning(|_, _, _, _| Ok(Vec::new()));

    let query = SearchQuery::symbol("Handler").build().unwrap();
    let results = searcher(engine, workspace.path())
        .search_in(workspace.path(), &query)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_shared_header_deduplicated() {
    let workspace = TempDir::new().unwrap();
    let mut engine = MockSearchEngine::new();
    engine
        .expect_execute()
        .times(sift_core::Language::CODE.len())
        .returning(|_, _, options, _| {
            if options.globs.iter().any(|g| g == "*.h") {
                Ok(vec![raw("include/parse.h", 3, "int parse(const char *s)", 4, 9)])
            } else {
                Ok(Vec::new())
            }
        });

    let query = SearchQuery::symbol("parse").build().unwrap();
    let results = searcher(engine, workspace.path())
        .search_in(workspace.path(), &query)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].symbol_role, Some(SymbolRole::Definition));
}

#[tokio::test]
async fn test_symbol_file_pattern_filters_results() {
    let workspace = TempDir::new().unwrap();
    let mut engine = MockSearchEngine::new();
    engine.expect_execute().returning(|_, _, _, _| {
        Ok(vec![
            raw("api/auth.py", 1, "def login():", 4, 9),
            raw("scripts/tool.py", 1, "def login():", 4, 9),
        ])
    });

    let query = SearchQuery::symbol("login")
        .language(Some(sift_core::Language::Python))
        .file_pattern("api/*")
        .build()
        .unwrap();
    let results = searcher(engine, workspace.path())
        .search_in(workspace.path(), &query)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_path, "api/auth.py");
}

/// Engine that honours the match cap in path order, as ripgrep does
fn capped_engine(hits: Vec<RawMatch>) -> MockSearchEngine {
    let mut engine = MockSearchEngine::new();
    engine.expect_execute().returning(move |_, _, options, _| {
        Ok(hits.iter().take(options.max_matches).cloned().collect())
    });
    engine
}

#[tokio::test]
async fn test_symbol_file_pattern_sees_matches_past_the_cap() {
    let workspace = TempDir::new().unwrap();
    let mut hits: Vec<RawMatch> = (0..20)
        .map(|i| raw(&format!("a_scripts/tool{:02}.py", i), 1, "    login()", 4, 9))
        .collect();
    hits.push(raw("src/api/auth.py", 3, "def login():", 4, 9));

    let query = SearchQuery::symbol("login")
        .language(Some(sift_core::Language::Python))
        .file_pattern("src/**")
        .max_results(5)
        .build()
        .unwrap();
    let results = searcher(capped_engine(hits), workspace.path())
        .search_in(workspace.path(), &query)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_path, "src/api/auth.py");
    assert_eq!(results[0].symbol_role, Some(SymbolRole::Definition));
}

#[tokio::test]
async fn test_text_language_filter_sees_matches_past_the_cap() {
    let workspace = TempDir::new().unwrap();
    let mut hits: Vec<RawMatch> = (0..20)
        .map(|i| raw(&format!("src/a{:02}.md", i), 1, "TODO: write docs", 0, 4))
        .collect();
    hits.push(raw("src/z.py", 7, "# TODO: handle retries", 2, 6));

    let query = SearchQuery::text("TODO")
        .language(Some(sift_core::Language::Python))
        .file_pattern("src/*")
        .max_results(5)
        .build()
        .unwrap();
    let results = searcher(capped_engine(hits), workspace.path())
        .search_in(workspace.path(), &query)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_path, "src/z.py");
    assert_eq!(results[0].line_number, 7);
}

#[tokio::test]
async fn test_unfiltered_search_keeps_engine_cap() {
    let workspace = TempDir::new().unwrap();
    let mut engine = MockSearchEngine::new();
    engine
        .expect_execute()
        .withf(|_, _, options, _| options.max_matches == 15)
        .times(1)
        .returning(|_, _, _, _| Ok(Vec::new()));

    let query = SearchQuery::text("TODO")
        .language(Some(sift_core::Language::Python))
        .max_results(5)
        .build()
        .unwrap();
    searcher(engine, workspace.path())
        .search_in(workspace.path(), &query)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_repository_search_runs_in_working_copy() {
    let workspace = TempDir::new().unwrap();
    let mut engine = MockSearchEngine::new();
    let expected_root = workspace.path().to_path_buf();
    engine
        .expect_execute()
        .withf(move |root: &Path, _, _, _| {
            root.starts_with(&expected_root) && root != expected_root.as_path()
        })
        .times(1)
        .returning(|_, _, _, _| Ok(Vec::new()));

    let searcher = searcher(engine, workspace.path());
    let repo = RepositoryRef::new("acme/api", "https://example.com/acme/api.git");
    let query = SearchQuery::text("TODO").build().unwrap();
    searcher.search(&repo, &query).await.unwrap();

    let entry = searcher.cache().get("acme/api").unwrap();
    assert!(entry.path.is_dir());
}

#[tokio::test]
async fn test_mode_mismatch_rejected() {
    let workspace = TempDir::new().unwrap();
    let searcher = searcher(MockSearchEngine::new(), workspace.path());
    let repo = RepositoryRef::new("r", "https://example.com/r.git");

    let symbol = SearchQuery::symbol("run").build().unwrap();
    assert!(matches!(
        searcher.search(&repo, &symbol).await,
        Err(SearchError::InvalidQuery(_))
    ));
    let text = SearchQuery::text("run").build().unwrap();
    assert!(matches!(
        searcher.find_symbol(&repo, &text).await,
        Err(SearchError::InvalidQuery(_))
    ));
    assert!(searcher.cache().entries().is_empty());
}

#[test]
fn test_glob_matches_basename_and_path() {
    let pattern = glob::Pattern::new("*.py").unwrap();
    assert!(super::glob_matches(&pattern, "src/app.py"));
    assert!(!super::glob_matches(&pattern, "src/app.rs"));
    let nested = glob::Pattern::new("src/**/*.rs").unwrap();
    assert!(super::glob_matches(&nested, "src/engine/mod.rs"));
    assert!(!super::glob_matches(&nested, "tests/mod.rs"));
}
