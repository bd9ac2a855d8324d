//! CLI console utilities

use colored::*;
use sift_core::{ScoredResult, SearchQuery, SymbolRole};

/// Console for formatted terminal output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn info(&self, message: &str) {
        if self.verbose {
            eprintln!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print ranked results with highlighted match spans
    pub fn print_results(&self, results: &[ScoredResult], query: &SearchQuery) {
        if results.is_empty() {
            println!("{} {}", "No matches for".dimmed(), query.query().bold());
            return;
        }

        for result in results {
            let location = format!("{}:{}", result.file_path, result.line_number);
            let mut header = format!("{}", location.cyan().bold());
            if let (Some(kind), Some(role)) = (result.symbol_type, result.symbol_role) {
                let tag = format!("[{} {}]", kind, role);
                let tag = match role {
                    SymbolRole::Definition => tag.green(),
                    SymbolRole::Usage => tag.yellow(),
                };
                header = format!("{} {}", header, tag);
            }
            println!(
                "{} {}",
                header,
                format!("{:.2}", result.relevance_score).dimmed()
            );

            for line in &result.context_before {
                println!("  {}", line.dimmed());
            }
            println!("  {}", highlight(result));
            for line in &result.context_after {
                println!("  {}", line.dimmed());
            }
            println!();
        }

        self.info(&format!("{} result(s)", results.len()));
    }
}

fn highlight(result: &ScoredResult) -> String {
    let line = &result.line_content;
    match (
        line.get(..result.match_start),
        line.get(result.match_start..result.match_end),
        line.get(result.match_end..),
    ) {
        (Some(before), Some(matched), Some(after)) => {
            format!("{}{}{}", before, matched.red().bold(), after)
        }
        _ => line.clone(),
    }
}
