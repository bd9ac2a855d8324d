//! Definition templates per language
//!
//! `{name}` is replaced with the escaped symbol name (exact) or
//! `\w*name\w*` (fuzzy). Templates must stay within the syntax shared by the
//! `regex` crate and ripgrep's default engine: no look-around, no
//! backreferences.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use sift_core::{Language, SymbolKind};

/// Placeholder substituted with the symbol name
pub const NAME: &str = "{name}";

/// A single definition template
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub kind: SymbolKind,
    pub pattern: &'static str,
}

const fn t(kind: SymbolKind, pattern: &'static str) -> Template {
    Template { kind, pattern }
}

use SymbolKind::{Class, Function, Import, Variable};

const PYTHON: &[Template] = &[
    t(Function, r"^\s*(?:async\s+)?def\s+{name}\s*\("),
    t(Class, r"^\s*class\s+{name}\s*[:(]"),
    t(Import, r"^\s*(?:from\s+\S+\s+)?import\s+.*\b{name}\b"),
    t(Variable, r"^{name}\s*(?::[^=]+)?=[^=]"),
];

const JAVASCRIPT: &[Template] = &[
    t(
        Function,
        r"(?:\bfunction\s*\*?\s*{name}\s*\(|\b(?:const|let|var)\s+{name}\s*=\s*(?:async\s*)?(?:function\b|\([^)]*\)\s*=>|\w+\s*=>))",
    ),
    t(Class, r"\bclass\s+{name}\b"),
    t(
        Import,
        r"(?:^\s*import\b.*\b{name}\b|\b{name}\b.*=\s*require\s*\()",
    ),
    t(Variable, r"\b(?:const|let|var)\s+{name}\s*="),
];

const TYPESCRIPT: &[Template] = &[
    t(
        Function,
        r"(?:\bfunction\s*\*?\s*{name}\s*[<(]|\b(?:const|let|var)\s+{name}\s*(?::[^=]+)?=\s*(?:async\s*)?(?:function\b|\([^)]*\)\s*(?::[^=]+)?=>|\w+\s*=>))",
    ),
    t(Class, r"\b(?:class|interface|enum|type)\s+{name}\b"),
    t(Import, r"^\s*import\b.*\b{name}\b"),
    t(Variable, r"\b(?:const|let|var)\s+{name}\s*[:=]"),
];

const GO: &[Template] = &[
    t(Function, r"^\s*func\s+(?:\([^)]*\)\s*)?{name}\s*[\[(]"),
    t(Class, r"\btype\s+{name}\s+\S"),
    t(Import, r#"^\s*(?:import\s+)?(?:\w+\s+)?"(?:[^"]*/)?{name}""#),
    t(Variable, r"(?:\b(?:var|const)\s+{name}\b|\b{name}\s*:=)"),
];

const JAVA: &[Template] = &[
    t(
        Function,
        r"^\s*(?:(?:public|private|protected|static|final|abstract|synchronized|native|default)\s+)+[\w<>\[\],.?]+\s+{name}\s*\(",
    ),
    t(Class, r"(?:\b(?:class|interface|enum|record)|@interface)\s+{name}\b"),
    t(Import, r"^\s*import\s+(?:static\s+)?[\w.]*\b{name}\b"),
    t(Variable, r"\bfinal\s+[\w<>\[\],.?]+\s+{name}\s*="),
];

const RUST: &[Template] = &[
    t(Function, r"\bfn\s+{name}\s*[<(]"),
    t(Class, r"\b(?:struct|enum|trait|union|type)\s+{name}\b"),
    t(Import, r"^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+.*\b{name}\b"),
    t(
        Variable,
        r"\b(?:let(?:\s+mut)?|const|static(?:\s+mut)?)\s+{name}\b",
    ),
];

const CSHARP: &[Template] = &[
    t(
        Function,
        r"^\s*(?:(?:public|private|protected|internal|static|virtual|override|abstract|async|sealed|extern|new|partial)\s+)+[\w<>\[\],.?]+\s+{name}\s*[<(]",
    ),
    t(Class, r"\b(?:class|interface|struct|enum|record)\s+{name}\b"),
    t(Import, r"^\s*using\s+(?:static\s+)?[\w.]*\b{name}\b"),
    t(Variable, r"\b(?:const|readonly)\s+[\w<>\[\],.?]+\s+{name}\b"),
];

const C: &[Template] = &[
    t(Function, r"^\w[\w\s*]*?\b{name}\s*\([^;]*$"),
    t(
        Class,
        r"(?:\b(?:struct|union|enum)\s+{name}\b|\btypedef\b.*\b{name}\s*;)",
    ),
    t(Import, r#"^\s*#\s*include\s*[<"][^>"]*\b{name}\b"#),
    t(
        Variable,
        r"(?:^\s*#\s*define\s+{name}\b|\b(?:const|static|extern)\s+[\w\s*]+\b{name}\s*[=;\[])",
    ),
];

const CPP: &[Template] = &[
    t(Function, r"^\w[\w\s*&:<>,]*?\b{name}\s*\([^;]*$"),
    t(
        Class,
        r"(?:\b(?:class|struct|union|namespace|enum(?:\s+class)?)\s+{name}\b|\busing\s+{name}\s*=)",
    ),
    t(Import, r#"^\s*#\s*include\s*[<"][^>"]*\b{name}\b"#),
    t(
        Variable,
        r"(?:^\s*#\s*define\s+{name}\b|\b(?:const|constexpr|static|extern)\s+[\w\s*&:<>]+\b{name}\s*[=;\[{])",
    ),
];

const RUBY: &[Template] = &[
    t(Function, r"^\s*def\s+(?:self\.)?{name}\b"),
    t(Class, r"^\s*(?:class|module)\s+(?:\w+::)*{name}\b"),
    t(
        Import,
        r#"^\s*require(?:_relative)?\s*\(?\s*['"][^'"]*\b{name}\b"#,
    ),
    t(Variable, r"^\s*(?:@@?)?{name}\s*=[^=~]"),
];

const PHP: &[Template] = &[
    t(Function, r"\bfunction\s+&?\s*{name}\s*\("),
    t(Class, r"\b(?:class|interface|trait|enum)\s+{name}\b"),
    t(
        Import,
        r"^\s*(?:use|require(?:_once)?|include(?:_once)?)\b.*\b{name}\b",
    ),
    t(
        Variable,
        r#"(?:\bconst\s+{name}\b|\bdefine\s*\(\s*['"]{name}['"])"#,
    ),
];

const KOTLIN: &[Template] = &[
    t(Function, r"\bfun\s+(?:<[^>]*>\s*)?(?:[\w.]+\.)?{name}\s*\("),
    t(Class, r"\b(?:class|interface|object|typealias)\s+{name}\b"),
    t(Import, r"^\s*import\s+[\w.]*\b{name}\b"),
    t(Variable, r"\b(?:val|var)\s+{name}\b"),
];

static TEMPLATES: Lazy<HashMap<Language, &'static [Template]>> = Lazy::new(|| {
    HashMap::from([
        (Language::Python, PYTHON),
        (Language::JavaScript, JAVASCRIPT),
        (Language::TypeScript, TYPESCRIPT),
        (Language::Go, GO),
        (Language::Java, JAVA),
        (Language::Rust, RUST),
        (Language::CSharp, CSHARP),
        (Language::C, C),
        (Language::Cpp, CPP),
        (Language::Ruby, RUBY),
        (Language::Php, PHP),
        (Language::Kotlin, KOTLIN),
    ])
});

/// Definition templates for `language`; empty when it has none
pub fn definitions(language: Language) -> &'static [Template] {
    TEMPLATES.get(&language).copied().unwrap_or(&[])
}

/// Usage template for a symbol of `kind`
pub fn usage(kind: Option<SymbolKind>) -> &'static str {
    match kind {
        Some(SymbolKind::Function) => r"\b{name}\s*\(",
        _ => r"\b{name}\b",
    }
}

/// Substitute the symbol name into a template
pub fn render(template: &str, name: &str, exact: bool) -> String {
    let escaped = regex::escape(name);
    let replacement = if exact {
        escaped
    } else {
        format!(r"\w*{}\w*", escaped)
    };
    template.replace(NAME, &replacement)
}
