//! Regex fallback for import discovery.
//!
//! Used for unsupported extensions and for sources the parser could not make
//! sense of. Patterns are line-anchored where possible; unlike the syntax-tree
//! scan they will match import-looking text inside template literals.

use regex::Regex;
use std::sync::OnceLock;

use crate::languages::{ImportKind, ImportSpec, line_of};

struct Patterns {
    import: Regex,
    reexport: Regex,
    require: Regex,
    dynamic: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        import: Regex::new(r#"(?m)^\s*import\s+(?:type\s+)?(?:[^'";]*?\s+from\s+)?['"]([^'"\n]+)['"]"#)
            .unwrap(),
        reexport: Regex::new(r#"(?m)^\s*export\s+[^'";]*?\s+from\s+['"]([^'"\n]+)['"]"#).unwrap(),
        require: Regex::new(r#"\brequire\(\s*['"]([^'"\n]+)['"]\s*\)"#).unwrap(),
        dynamic: Regex::new(r#"\bimport\(\s*['"]([^'"\n]+)['"]\s*\)"#).unwrap(),
    })
}

/// Scan `code` for import declarations, returned in source order.
pub fn scan_imports_by_regex(code: &str) -> Vec<ImportSpec> {
    let p = patterns();
    let mut found: Vec<(usize, ImportSpec)> = Vec::new();

    for (re, kind) in [
        (&p.import, ImportKind::Import),
        (&p.reexport, ImportKind::ReExport),
        (&p.require, ImportKind::Require),
        (&p.dynamic, ImportKind::Dynamic),
    ] {
        for cap in re.captures_iter(code) {
            let (Some(whole), Some(spec)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            found.push((
                spec.start(),
                ImportSpec {
                    specifier: spec.as_str().to_string(),
                    kind,
                    line: line_of(code, whole.start() + leading_ws(whole.as_str())),
                },
            ));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.dedup_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, s)| s).collect()
}

fn leading_ws(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_all_declaration_styles_in_order() {
        let code = r#"import React from "react";
import {
  a,
  b
} from './ab';
import './side-effect';
export { c } from "./c";
const d = require('./d');
const e = () => import("./e");
"#;
        let got: Vec<(String, ImportKind, usize)> = scan_imports_by_regex(code)
            .into_iter()
            .map(|s| (s.specifier, s.kind, s.line))
            .collect();
        assert_eq!(
            got,
            vec![
                ("react".into(), ImportKind::Import, 1),
                ("./ab".into(), ImportKind::Import, 2),
                ("./side-effect".into(), ImportKind::Import, 6),
                ("./c".into(), ImportKind::ReExport, 7),
                ("./d".into(), ImportKind::Require, 8),
                ("./e".into(), ImportKind::Dynamic, 9),
            ]
        );
    }

    #[test]
    fn nothing_found_in_plain_code() {
        assert!(scan_imports_by_regex("const x = 1;\nfunction f() {}\n").is_empty());
    }
}
