//! Search machinery for Sift
//!
//! Shallow repository caching, the ripgrep process adapter, symbol
//! pattern resolution, relevance ranking and the query façade tying them
//! together.

pub mod cache;
pub mod engine;
pub mod ranking;
pub mod request;
pub mod searcher;
pub mod symbols;

pub use cache::{CacheEntry, GitCli, GitTransport, RepositoryCache, TransportError};
pub use engine::{EngineOptions, RipgrepEngine, SearchEngine};
pub use ranking::Ranker;
pub use request::{SearchRequest, render_results};
pub use searcher::{CodeSearcher, RepositoryRef};
