//! Shared-state references declared by a behavior descriptor.
//!
//! A descriptor lists identifiers in a string array (`uses = ["authState"]`),
//! at top level or inside any table. The first such field found depth-first
//! (keys in lexical order) wins. Text that is not valid TOML is scanned with a
//! regex for the same field.
//!
//! Descriptors may also name state files directly through a table of tables
//! (`[state.auth] path = "src/state/auth.js"`); see [`state_table_paths`].

use regex::Regex;
use tracing::debug;

/// Identifiers named by the first `field = [ ... ]` list in `text`.
pub fn state_identifiers(text: &str, field: &str) -> Vec<String> {
    let ids = match text.parse::<toml::Table>() {
        Ok(table) => find_string_list(&table, field).unwrap_or_default(),
        Err(err) => {
            debug!(error = %err, "behavior: descriptor is not valid TOML, scanning by regex");
            scan_list_by_regex(text, field)
        }
    };
    ids.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `path` values of every `[<table>.<name>]` entry, in lexical name order.
///
/// Entries without a string `path` are skipped; text that is not valid TOML
/// has no such entries.
pub fn state_table_paths(text: &str, table: &str) -> Vec<String> {
    let Ok(root) = text.parse::<toml::Table>() else {
        return Vec::new();
    };
    let Some(toml::Value::Table(entries)) = root.get(table) else {
        return Vec::new();
    };
    entries
        .values()
        .filter_map(|v| v.get("path").and_then(toml::Value::as_str))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn find_string_list(table: &toml::Table, field: &str) -> Option<Vec<String>> {
    if let Some(toml::Value::Array(items)) = table.get(field) {
        return Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        );
    }
    for value in table.values() {
        let found = match value {
            toml::Value::Table(inner) => find_string_list(inner, field),
            toml::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_table())
                .find_map(|t| find_string_list(t, field)),
            _ => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn scan_list_by_regex(text: &str, field: &str) -> Vec<String> {
    let pattern = format!(r"(?m)\b{}\s*=\s*\[([^\]]*)\]", regex::escape(field));
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };
    let Some(inner) = re.captures(text).and_then(|c| c.get(1)) else {
        return Vec::new();
    };
    inner
        .as_str()
        .split(',')
        .map(|s| s.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string())
        .collect()
}
