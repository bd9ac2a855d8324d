//! Search command implementation

use std::path::PathBuf;

use sift_core::{ScoredResult, SearchError, SearchMode, SearchQuery, SiftConfig, SiftResult};
use sift_search::{CodeSearcher, RepositoryRef, SearchRequest};
use tokio_util::sync::CancellationToken;

use crate::args::SearchArgs;
use crate::console::CliConsole;

pub async fn run(args: SearchArgs, config: &SiftConfig, console: &CliConsole) -> SiftResult<()> {
    let json = args.json;
    let target = Target::from_args(&args)?;
    let query = request_from_args(args).into_query(&config.search)?;

    let searcher = CodeSearcher::from_config(config).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let results = target.search(&searcher, &query, &cancel).await?;

    if json {
        let body = serde_json::to_string_pretty(&results)
            .map_err(|e| SearchError::Io(std::io::Error::other(e)))?;
        println!("{}", body);
    } else {
        console.print_results(&results, &query);
    }
    Ok(())
}

fn request_from_args(args: SearchArgs) -> SearchRequest {
    SearchRequest {
        query: args.query,
        search_type: Some(SearchMode::from(args.mode).to_string()),
        file_pattern: args.glob,
        exclude: args.exclude,
        case_sensitive: Some(args.case_sensitive),
        whole_word: Some(args.whole_word),
        context_lines: args.context,
        max_results: args.max_results,
        symbol_type: args.symbol_type,
        language: args.language,
        exact_match: Some(!args.fuzzy),
    }
}

enum Target {
    Local(PathBuf),
    Remote(RepositoryRef),
}

impl Target {
    fn from_args(args: &SearchArgs) -> SiftResult<Self> {
        match (&args.repo, &args.path) {
            (Some(url), _) => {
                let id = args.repo_id.clone().unwrap_or_else(|| url.clone());
                Ok(Target::Remote(
                    RepositoryRef::new(id, url.clone()).refreshed(args.refresh),
                ))
            }
            (None, Some(path)) => Ok(Target::Local(path.clone())),
            (None, None) => Ok(Target::Local(std::env::current_dir()?)),
        }
    }

    async fn search(
        &self,
        searcher: &CodeSearcher,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> SiftResult<Vec<ScoredResult>> {
        match self {
            Target::Local(root) => searcher.search_in_with_cancel(root, query, cancel).await,
            Target::Remote(repo) if query.mode() == SearchMode::Symbol => {
                searcher.find_symbol_with_cancel(repo, query, cancel).await
            }
            Target::Remote(repo) => searcher.search_with_cancel(repo, query, cancel).await,
        }
    }
}
