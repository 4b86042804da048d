//! Import-declaration discovery.
//!
//! Only dependency declarations are visited; everything else in the file is
//! ignored. Supported grammars go through a Tree-sitter scan, which is immune
//! to import-looking text inside strings, templates and comments. Files in an
//! unsupported language, or whose parse yields nothing usable, go through a
//! regex fallback instead.

mod fallback_regex;
pub mod typescript;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::core::normalize::detect_language;

/// How a dependency was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// `import x from "./x"` / `import "./x"` / `import x = require("./x")`
    Import,
    /// `export { x } from "./x"` / `export * from "./x"`
    ReExport,
    /// `require("./x")`
    Require,
    /// `import("./x")`
    Dynamic,
}

/// One declared dependency, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Module specifier with quotes removed.
    pub specifier: String,
    pub kind: ImportKind,
    /// 1-based line of the declaration.
    pub line: usize,
}

/// Collect import declarations from `code`, in declaration order.
pub fn scan_imports(path: &Path, code: &str) -> Vec<ImportSpec> {
    if let Some(lang) = detect_language(path) {
        match typescript::collect_imports(code, lang) {
            Some(found) if !found.imports.is_empty() || !found.had_errors => {
                return found.imports;
            }
            Some(_) => {
                debug!(path = %path.display(), "imports: parse had errors and found nothing, using regex");
            }
            None => {
                debug!(path = %path.display(), %lang, "imports: parser unavailable, using regex");
            }
        }
    }
    fallback_regex::scan_imports_by_regex(code)
}

/// Remove one layer of matching single, double or back quotes.
pub(crate) fn strip_quotes(s: &str) -> String {
    let t = s.trim();
    let quoted = t.len() >= 2
        && ((t.starts_with('"') && t.ends_with('"'))
            || (t.starts_with('\'') && t.ends_with('\''))
            || (t.starts_with('`') && t.ends_with('`')));
    if quoted {
        t[1..t.len() - 1].to_string()
    } else {
        t.to_string()
    }
}

/// 1-based line number of byte offset `pos`.
pub(crate) fn line_of(code: &str, pos: usize) -> usize {
    code[..pos.min(code.len())].bytes().filter(|b| *b == b'\n').count() + 1
}
