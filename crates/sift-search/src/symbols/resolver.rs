//! Symbol pattern resolution and classification

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use sift_core::{Language, RawMatch, SearchError, SiftResult, SymbolKind, SymbolOccurrence, SymbolRole};

use super::templates;

/// One concrete regex for a symbol, tagged with what a hit means
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolPattern {
    pub language: Language,
    pub kind: SymbolKind,
    pub role: SymbolRole,
    pub regex: String,
}

/// Expand a symbol name into concrete patterns
///
/// Without a language every language with templates is covered; without a
/// kind every kind in the table is covered. Definition patterns come before
/// the usage pattern of each language.
pub fn resolve(
    name: &str,
    kind: Option<SymbolKind>,
    language: Option<Language>,
    exact_match: bool,
) -> Vec<SymbolPattern> {
    let languages: Vec<Language> = match language {
        Some(language) => vec![language],
        None => Language::CODE.to_vec(),
    };

    let mut patterns = Vec::new();
    for language in languages {
        let definitions = templates::definitions(language);
        if definitions.is_empty() {
            continue;
        }
        for template in definitions
            .iter()
            .filter(|t| kind.is_none_or(|k| k == t.kind))
        {
            patterns.push(SymbolPattern {
                language,
                kind: template.kind,
                role: SymbolRole::Definition,
                regex: templates::render(template.pattern, name, exact_match),
            });
        }
        patterns.push(SymbolPattern {
            language,
            kind: kind.unwrap_or(SymbolKind::Unknown),
            role: SymbolRole::Usage,
            regex: templates::render(templates::usage(kind), name, exact_match),
        });
    }
    patterns
}

/// All patterns for one language, run as a single engine invocation
#[derive(Debug, Clone)]
pub struct SearchPlan {
    pub language: Language,
    pub patterns: Vec<SymbolPattern>,
}

impl SearchPlan {
    /// Group resolved patterns by language, keeping first-seen order
    pub fn group(patterns: Vec<SymbolPattern>) -> Vec<SearchPlan> {
        let mut plans: Vec<SearchPlan> = Vec::new();
        for pattern in patterns {
            match plans.iter_mut().find(|p| p.language == pattern.language) {
                Some(plan) => plan.patterns.push(pattern),
                None => plans.push(SearchPlan {
                    language: pattern.language,
                    patterns: vec![pattern],
                }),
            }
        }
        plans
    }

    /// Alternation of every pattern in the plan
    pub fn combined_regex(&self) -> String {
        self.patterns
            .iter()
            .map(|p| format!("(?:{})", p.regex))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// File globs restricting the engine to this language
    pub fn globs(&self) -> Vec<String> {
        self.language.globs().iter().map(|g| g.to_string()).collect()
    }
}

/// Decides which pattern a returned line satisfies
#[derive(Debug)]
pub struct Classifier {
    patterns: Vec<(SymbolPattern, Regex)>,
    name: Regex,
}

impl Classifier {
    pub fn new(
        name: &str,
        patterns: &[SymbolPattern],
        exact_match: bool,
        case_sensitive: bool,
    ) -> SiftResult<Self> {
        let compile = |source: &str| {
            RegexBuilder::new(source)
                .case_insensitive(!case_sensitive)
                .build()
                .map_err(|e| SearchError::InvalidPattern {
                    pattern: source.to_string(),
                    diagnostic: e.to_string(),
                })
        };

        let mut compiled = Vec::with_capacity(patterns.len());
        let definitions = patterns.iter().filter(|p| p.role == SymbolRole::Definition);
        let usages = patterns.iter().filter(|p| p.role == SymbolRole::Usage);
        for pattern in definitions.chain(usages) {
            compiled.push((pattern.clone(), compile(&pattern.regex)?));
        }

        let name_source = templates::render(r"\b{name}\b", name, exact_match);
        Ok(Self {
            patterns: compiled,
            name: compile(&name_source)?,
        })
    }

    /// Classify a raw match; definitions win over usages
    ///
    /// The returned occurrence's span points at the symbol name.
    pub fn classify(&self, raw: RawMatch) -> Option<SymbolOccurrence> {
        let (pattern, found) = self
            .patterns
            .iter()
            .find_map(|(pattern, regex)| regex.find(&raw.line_content).map(|m| (pattern, m)))?;

        let (start, end) = self
            .name
            .find_at(&raw.line_content, found.start())
            .filter(|m| m.start() < found.end())
            .or_else(|| self.name.find(&raw.line_content))
            .map(|m| (m.start(), m.end()))
            .unwrap_or((found.start(), found.end()));

        Some(SymbolOccurrence {
            kind: pattern.kind,
            role: pattern.role,
            raw: RawMatch {
                match_start: start,
                match_end: end,
                ..raw
            },
        })
    }
}
