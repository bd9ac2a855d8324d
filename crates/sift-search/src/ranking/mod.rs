//! Relevance ranking

mod ranker;
pub mod signals;

pub use ranker::{Ranker, dedup_ranked};
