//! Sift: ranked code search and symbol lookup over shallow repository mirrors
//!
//! ```no_run
//! # async fn demo() -> sift::SiftResult<()> {
//! use sift::{CodeSearcher, SearchQuery, SiftConfig};
//!
//! let searcher = CodeSearcher::from_config(&SiftConfig::default()).await?;
//! let query = SearchQuery::symbol("authenticate").build()?;
//! for hit in searcher.search_in(std::path::Path::new("."), &query).await? {
//!     println!("{}:{} {:.2}", hit.file_path, hit.line_number, hit.relevance_score);
//! }
//! # Ok(())
//! # }
//! ```

pub use sift_core::*;
pub use sift_search::{
    CacheEntry, CodeSearcher, EngineOptions, GitCli, GitTransport, Ranker, RepositoryCache,
    RepositoryRef, RipgrepEngine, SearchEngine, SearchRequest, TransportError, render_results,
};

pub mod search {
    pub use sift_search::*;
}
