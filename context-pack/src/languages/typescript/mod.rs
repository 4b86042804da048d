//! TypeScript / TSX / JavaScript import collector.
//!
//! A declaration-only visitor over the Tree-sitter tree. It captures:
//! - `import_statement` (`source` field, or `import x = require(...)`);
//! - `export_statement` with a `source` field (re-exports);
//! - `call_expression` of `require(...)` or dynamic `import(...)` whose first
//!   argument is a plain string literal.
//!
//! Strings, template strings, comments and regex literals are never descended
//! into, so import-looking text inside them is ignored. Multi-line import
//! lists are a single node and need no special handling.

use tree_sitter::{Language, Node, Parser};

use crate::languages::{ImportKind, ImportSpec, strip_quotes};
use crate::model::language::LanguageKind;

/// Result of one syntax-tree scan.
#[derive(Debug, Clone, Default)]
pub struct ScannedImports {
    /// Declarations in source order.
    pub imports: Vec<ImportSpec>,
    /// Whether the tree contains `ERROR`/`MISSING` nodes.
    pub had_errors: bool,
}

fn grammar(lang: LanguageKind) -> Language {
    match lang {
        LanguageKind::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        LanguageKind::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        LanguageKind::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

/// Parse `code` and collect its dependency declarations.
///
/// Returns `None` only if the grammar cannot be loaded or parsing is aborted.
pub fn collect_imports(code: &str, lang: LanguageKind) -> Option<ScannedImports> {
    let mut parser = Parser::new();
    parser.set_language(&grammar(lang)).ok()?;
    let tree = parser.parse(code, None)?;
    let root = tree.root_node();

    let mut imports = Vec::new();
    // Pre-order walk; children are pushed reversed so they pop in source order.
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match node.kind() {
            "import_statement" => {
                if let Some(src) = import_source(node) {
                    push(&mut imports, code, src, ImportKind::Import, node);
                }
                continue;
            }
            "export_statement" => {
                if let Some(src) = node.child_by_field_name("source") {
                    push(&mut imports, code, src, ImportKind::ReExport, node);
                    continue;
                }
            }
            "call_expression" => {
                if let Some((kind, arg)) = call_target(node, code) {
                    push(&mut imports, code, arg, kind, node);
                }
            }
            "string" | "template_string" | "comment" | "regex" => continue,
            _ => {}
        }

        let mut w = node.walk();
        let children: Vec<Node> = node.children(&mut w).collect();
        stack.extend(children.into_iter().rev());
    }

    Some(ScannedImports {
        imports,
        had_errors: root.has_error(),
    })
}

fn import_source(node: Node) -> Option<Node> {
    if let Some(src) = node.child_by_field_name("source") {
        return Some(src);
    }
    let mut w = node.walk();
    let found = node
        .children(&mut w)
        .find(|ch| ch.kind() == "import_require_clause")
        .and_then(|clause| clause.child_by_field_name("source"));
    found
}

fn call_target<'t>(node: Node<'t>, code: &str) -> Option<(ImportKind, Node<'t>)> {
    let function = node.child_by_field_name("function")?;
    let kind = match function.kind() {
        "import" => ImportKind::Dynamic,
        "identifier" if &code[function.byte_range()] == "require" => ImportKind::Require,
        _ => return None,
    };
    let args = node.child_by_field_name("arguments")?;
    let first = args.named_child(0)?;
    (first.kind() == "string").then_some((kind, first))
}

fn push(out: &mut Vec<ImportSpec>, code: &str, literal: Node, kind: ImportKind, decl: Node) {
    if literal.kind() != "string" {
        return;
    }
    let specifier = strip_quotes(&code[literal.byte_range()]);
    if specifier.is_empty() {
        return;
    }
    out.push(ImportSpec {
        specifier,
        kind,
        line: decl.start_position().row + 1,
    });
}
