//! Runs the adapter against a real `rg`; each test returns early when the
//! binary is not installed.

use std::fs;
use std::path::Path;
use std::time::Duration;

use sift_core::SearchError;
use sift_core::config::EngineConfig;
use sift_search::engine::{EngineOptions, RipgrepEngine, SearchEngine};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

async fn engine() -> Option<RipgrepEngine> {
    match RipgrepEngine::new(&EngineConfig::default()).await {
        Ok(engine) => Some(engine),
        Err(err) => {
            eprintln!("skipping: {}", err);
            None
        }
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_matches_with_context_in_path_order() {
    let Some(engine) = engine().await else { return };
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.py", "one\ntwo\nneedle here\nthree\n");
    write(dir.path(), "a.py", "needle first\nafter\n");

    let options = EngineOptions {
        context_lines: 1,
        ..Default::default()
    };
    let matches = engine
        .execute(dir.path(), "needle", &options, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].file_path, "a.py");
    assert_eq!(matches[0].line_number, 1);
    assert!(matches[0].context_before.is_empty());
    assert_eq!(matches[0].context_after, vec!["after"]);

    assert_eq!(matches[1].file_path, "b.py");
    assert_eq!(matches[1].line_number, 3);
    assert_eq!(matches[1].line_content, "needle here");
    assert_eq!(matches[1].context_before, vec!["two"]);
    assert_eq!(matches[1].context_after, vec!["three"]);
    assert_eq!(matches[1].matched_text(), Some("needle"));
}

#[tokio::test]
async fn test_default_excludes_and_globs() {
    let Some(engine) = engine().await else { return };
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.rs", "// marker\n");
    write(dir.path(), "src/util.py", "# marker\n");
    write(dir.path(), "node_modules/pkg/index.js", "// marker\n");

    let matches = engine
        .execute(
            dir.path(),
            "marker",
            &EngineOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| !m.file_path.contains("node_modules")));

    let only_rust = EngineOptions::default().with_globs(vec!["*.rs".to_string()]);
    let matches = engine
        .execute(dir.path(), "marker", &only_rust, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].file_path, "src/main.rs");
}

#[tokio::test]
async fn test_cap_stops_early() {
    let Some(engine) = engine().await else { return };
    let dir = TempDir::new().unwrap();
    let body: String = (0..200).map(|i| format!("TODO item {}\n", i)).collect();
    write(dir.path(), "notes.txt", &body);

    let options = EngineOptions {
        max_matches: 7,
        context_lines: 0,
        ..Default::default()
    };
    let matches = engine
        .execute(dir.path(), "TODO", &options, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(matches.len(), 7);
    assert_eq!(matches[6].line_number, 7);
}

#[tokio::test]
async fn test_invalid_pattern_is_an_error() {
    let Some(engine) = engine().await else { return };
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "(\n");

    let err = engine
        .execute(
            dir.path(),
            "(",
            &EngineOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidPattern { .. }), "{err:?}");
}

#[tokio::test]
async fn test_no_matches_is_empty_success() {
    let Some(engine) = engine().await else { return };
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "nothing to see\n");

    let matches = engine
        .execute(
            dir.path(),
            "absent_token",
            &EngineOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let Some(engine) = engine().await else { return };
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "x\n");

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = engine
        .execute(dir.path(), "x", &EngineOptions::default(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Cancelled));
}

#[tokio::test]
async fn test_tiny_timeout_reports_search_timeout() {
    let Some(engine) = engine().await else { return };
    let engine = engine.with_timeout(Duration::from_nanos(1));
    let dir = TempDir::new().unwrap();
    let body: String = (0..5000).map(|i| format!("line {}\n", i)).collect();
    for i in 0..20 {
        write(dir.path(), &format!("f{}.txt", i), &body);
    }

    let options = EngineOptions {
        max_matches: usize::MAX,
        ..Default::default()
    };
    let result = engine
        .execute(dir.path(), "line", &options, &CancellationToken::new())
        .await;
    match result {
        Err(SearchError::SearchTimeout { .. }) => {}
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_root_rejected() {
    let Some(engine) = engine().await else { return };
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone");
    assert!(
        engine
            .execute(
                &missing,
                "x",
                &EngineOptions::default(),
                &CancellationToken::new()
            )
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_execute_text_is_literal() {
    let Some(engine) = engine().await else { return };
    let dir = TempDir::new().unwrap();
    write(dir.path(), "calc.py", "total = a.b * (c + d)\nab = 1\n");

    let matches = engine
        .execute_text(
            dir.path(),
            "a.b * (c",
            &EngineOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].line_number, 1);
    assert_eq!(matches[0].matched_text(), Some("a.b * (c"));
}
