//! CLI argument definitions using clap
//!
//! - sift search <QUERY> --path DIR        # search a local tree
//! - sift search <QUERY> --repo URL        # search a cached shallow clone
//! - sift check                            # verify ripgrep is usable

use clap::{Args, Parser, Subcommand, ValueEnum};
use sift_core::SearchMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Sift - ranked code search and symbol lookup backed by ripgrep")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "SIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging (overrides the configured level)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a directory or repository
    Search(SearchArgs),

    /// Check that the search engine is installed and runnable
    Check,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Text, regular expression or symbol name to search for
    pub query: String,

    /// Directory to search
    #[arg(long, conflicts_with = "repo")]
    pub path: Option<PathBuf>,

    /// Remote repository URL; cloned shallowly on first use
    #[arg(long)]
    pub repo: Option<String>,

    /// Cache key for --repo (defaults to the URL)
    #[arg(long, requires = "repo")]
    pub repo_id: Option<String>,

    /// Update the cached clone before searching
    #[arg(long, requires = "repo")]
    pub refresh: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub mode: ModeArg,

    /// Only search files matching this glob
    #[arg(long)]
    pub glob: Option<String>,

    /// Exclude files matching this glob (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    #[arg(long)]
    pub case_sensitive: bool,

    #[arg(long)]
    pub whole_word: bool,

    /// Context lines before and after each match
    #[arg(long)]
    pub context: Option<usize>,

    #[arg(long)]
    pub max_results: Option<usize>,

    /// Symbol kind (function, class, import, variable; aliases accepted)
    #[arg(long)]
    pub symbol_type: Option<String>,

    /// Restrict to one language
    #[arg(long)]
    pub language: Option<String>,

    /// Match symbol names containing the query instead of equal to it
    #[arg(long)]
    pub fuzzy: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Text,
    Regex,
    Symbol,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Text => SearchMode::Text,
            ModeArg::Regex => SearchMode::Regex,
            ModeArg::Symbol => SearchMode::Symbol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol_search() {
        let cli = Cli::try_parse_from([
            "sift",
            "search",
            "authenticate",
            "--path",
            "/tmp/repo",
            "--mode",
            "symbol",
            "--symbol-type",
            "method",
            "--fuzzy",
        ])
        .unwrap();
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query, "authenticate");
        assert_eq!(args.mode, ModeArg::Symbol);
        assert_eq!(args.symbol_type.as_deref(), Some("method"));
        assert!(args.fuzzy);
        assert!(!args.json);
    }

    #[test]
    fn test_path_conflicts_with_repo() {
        let parsed = Cli::try_parse_from([
            "sift",
            "search",
            "x",
            "--path",
            ".",
            "--repo",
            "https://example.com/r.git",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_refresh_requires_repo() {
        assert!(Cli::try_parse_from(["sift", "search", "x", "--refresh"]).is_err());
    }
}
