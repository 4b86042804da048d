//! Language taxonomy and helpers.
//!
//! A compact enum for the languages whose import declarations we can scan,
//! plus file-extension based detection. Grammar selection lives in
//! `languages::typescript`, not here.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Languages with a syntax-tree import scanner.
///
/// TSX gets its own variant because it needs a distinct grammar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageKind {
    JavaScript,
    TypeScript,
    Tsx,
}

impl Display for LanguageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LanguageKind::JavaScript => "javascript",
            LanguageKind::TypeScript => "typescript",
            LanguageKind::Tsx => "tsx",
        })
    }
}

impl LanguageKind {
    /// Best-effort detection by file extension.
    ///
    /// Returns `None` for unsupported extensions; callers fall back to the
    /// regex scanner.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let e = ext.to_ascii_lowercase();
        match e.as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension() {
        assert_eq!(
            LanguageKind::from_extension("JSX"),
            Some(LanguageKind::JavaScript)
        );
        assert_eq!(LanguageKind::from_extension("tsx"), Some(LanguageKind::Tsx));
        assert_eq!(
            LanguageKind::from_extension("ts"),
            Some(LanguageKind::TypeScript)
        );
        assert_eq!(LanguageKind::from_extension("json"), None);
    }
}
