//! Regex-based symbol lookup
//!
//! Approximate by construction: a symbol is found by matching per-language
//! definition templates and a generic usage pattern, never by parsing.

mod resolver;
mod templates;

pub use resolver::{Classifier, SearchPlan, SymbolPattern, resolve};
