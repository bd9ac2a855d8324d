//! Individual relevance signals
//!
//! Each function returns one bounded, additive contribution.

use sift_core::{FileCategory, RankingWeights, RawMatch, SymbolRole};

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The match span widened to the identifier it sits in
fn enclosing_token(line: &str, start: usize, end: usize) -> Option<(usize, &str)> {
    let matched = line.get(start..end)?;
    let (first, last) = match (matched.chars().next(), matched.chars().next_back()) {
        (Some(first), Some(last)) => (first, last),
        _ => return None,
    };
    let token_start = if is_word(first) {
        line[..start]
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_word(*c))
            .last()
            .map(|(i, _)| i)
            .unwrap_or(start)
    } else {
        start
    };
    let token_end = if is_word(last) {
        line[end..]
            .char_indices()
            .find(|(_, c)| !is_word(*c))
            .map(|(i, _)| end + i)
            .unwrap_or(line.len())
    } else {
        end
    };
    Some((token_start, &line[token_start..token_end]))
}

/// How well the matched text agrees with what was asked for
///
/// `needle` is the literal text or symbol name; `None` for regex queries,
/// which are judged by whether the match covers a whole token.
pub fn match_quality(raw: &RawMatch, needle: Option<&str>, weights: &RankingWeights) -> f64 {
    let Some((token_start, token)) =
        enclosing_token(&raw.line_content, raw.match_start, raw.match_end)
    else {
        return 0.0;
    };

    match needle {
        Some(needle) => {
            if token == needle {
                weights.exact
            } else if token.starts_with(needle) {
                weights.prefix
            } else if token.contains(needle) {
                weights.substring
            } else if token.to_lowercase().contains(&needle.to_lowercase()) {
                weights.case_insensitive
            } else {
                0.0
            }
        }
        None => {
            if token.len() == raw.match_end - raw.match_start {
                weights.exact
            } else if token_start == raw.match_start {
                weights.prefix
            } else {
                weights.substring
            }
        }
    }
}

/// Definition vs usage, plus the symbol-path bonus
pub fn role(role: Option<SymbolRole>, weights: &RankingWeights) -> f64 {
    match role {
        Some(SymbolRole::Definition) => weights.definition + weights.symbol_bonus,
        Some(SymbolRole::Usage) => weights.usage + weights.symbol_bonus,
        None => 0.0,
    }
}

pub fn category(category: FileCategory, weights: &RankingWeights) -> f64 {
    match category {
        FileCategory::Source => weights.source,
        FileCategory::Test => weights.test,
        FileCategory::Documentation => weights.documentation,
        FileCategory::Configuration => weights.configuration,
        FileCategory::Other => weights.other,
    }
}

/// Earlier in the line is better; indentation does not count
pub fn position(raw: &RawMatch, weights: &RankingWeights) -> f64 {
    if weights.position_window == 0 {
        return 0.0;
    }
    let indent = raw.line_content.len() - raw.line_content.trim_start().len();
    let offset = raw.match_start.saturating_sub(indent) as f64;
    let window = weights.position_window as f64;
    weights.position * (1.0 - offset / window).max(0.0)
}

/// Zero up to the threshold, then a step penalty growing towards the cap
pub fn line_length(raw: &RawMatch, weights: &RankingWeights) -> f64 {
    let chars = raw.line_content.chars().count();
    if chars <= weights.long_line_threshold {
        return 0.0;
    }
    let span = weights
        .very_long_line
        .saturating_sub(weights.long_line_threshold)
        .max(1) as f64;
    let excess = (chars - weights.long_line_threshold) as f64;
    -(weights.long_line_penalty + weights.long_line_extra_penalty * (excess / span).min(1.0))
}

/// Shallower paths score slightly higher
pub fn path_depth(file_path: &str, weights: &RankingWeights) -> f64 {
    let depth = file_path.matches('/').count() as f64;
    weights.path_depth / (1.0 + depth)
}
