//! Local shallow mirrors of remote repositories

mod entry;
mod git;
mod manager;

pub use entry::CacheEntry;
pub use git::{GitCli, GitTransport, TransportError};
pub use manager::RepositoryCache;
