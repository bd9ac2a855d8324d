//! Symbol kinds and roles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of code symbol a line was recognised as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Function or method
    Function,
    /// Class, struct, interface, trait or type alias
    Class,
    /// Import, include or use statement
    Import,
    /// Variable or constant
    Variable,
    Unknown,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Import => "import",
            SymbolKind::Variable => "variable",
            SymbolKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "function" | "func" | "fn" | "method" => Ok(SymbolKind::Function),
            "class" | "type" | "struct" | "interface" | "enum" | "trait" => Ok(SymbolKind::Class),
            "import" | "include" | "use" => Ok(SymbolKind::Import),
            "variable" | "var" | "constant" | "const" => Ok(SymbolKind::Variable),
            "unknown" => Ok(SymbolKind::Unknown),
            other => Err(format!("Unknown symbol type: {}", other)),
        }
    }
}

/// Whether an occurrence defines the symbol or refers to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolRole {
    Definition,
    Usage,
}

impl SymbolRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolRole::Definition => "definition",
            SymbolRole::Usage => "usage",
        }
    }
}

impl fmt::Display for SymbolRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_aliases() {
        assert_eq!("method".parse::<SymbolKind>().unwrap(), SymbolKind::Function);
        assert_eq!("Interface".parse::<SymbolKind>().unwrap(), SymbolKind::Class);
        assert_eq!("constant".parse::<SymbolKind>().unwrap(), SymbolKind::Variable);
        assert_eq!("include".parse::<SymbolKind>().unwrap(), SymbolKind::Import);
        assert!("macro".parse::<SymbolKind>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&SymbolKind::Function).unwrap(),
            "\"function\""
        );
        assert_eq!(
            serde_json::to_string(&SymbolRole::Definition).unwrap(),
            "\"definition\""
        );
    }
}
