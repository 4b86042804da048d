//! Normalization helpers for paths, language detection, and glob handling.
//!
//! Paths in a context package are absolute and canonical so that the same
//! file reached through different relative specifiers deduplicates. Paths
//! shown to humans (banners, snapshot headers) are made repository-relative
//! with `/` separators.

use crate::model::language::LanguageKind;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// Canonical absolute form of `p`, or `p` unchanged if it cannot be resolved.
pub fn canonical_or_same(p: &Path) -> PathBuf {
    dunce::canonicalize(p).unwrap_or_else(|_| p.to_path_buf())
}

/// Path of `p` relative to `root`, with stable `/` separators.
///
/// Falls back to the full path when `p` is outside `root`.
///
/// # Example
/// ```
/// use std::path::Path;
/// use context_pack::core::normalize::repo_rel_str;
///
/// let rel = repo_rel_str(Path::new("/repo"), Path::new("/repo/src/App.tsx"));
/// assert_eq!(rel, "src/App.tsx");
/// ```
pub fn repo_rel_str(root: &Path, p: &Path) -> String {
    let root_abs = canonical_or_same(root);
    let abs = if p.is_absolute() {
        canonical_or_same(p)
    } else {
        canonical_or_same(&root_abs.join(p))
    };
    let rel = abs
        .strip_prefix(&root_abs)
        .or_else(|_| p.strip_prefix(root))
        .unwrap_or(&abs);
    to_unix_sep(rel.to_string_lossy())
}

/// Replace OS-specific separators with `/`.
///
/// # Example
/// ```
/// use context_pack::core::normalize::to_unix_sep;
///
/// assert_eq!(to_unix_sep("src\\components\\Button.jsx"), "src/components/Button.jsx");
/// ```
pub fn to_unix_sep<S: AsRef<str>>(s: S) -> String {
    s.as_ref().replace('\\', "/")
}

/// Detect the import-scanning language from the file extension.
///
/// # Example
/// ```
/// use std::path::Path;
/// use context_pack::core::normalize::detect_language;
/// use context_pack::model::language::LanguageKind;
///
/// assert_eq!(detect_language(Path::new("App.tsx")), Some(LanguageKind::Tsx));
/// assert_eq!(detect_language(Path::new("notes.md")), None);
/// ```
pub fn detect_language(path: &Path) -> Option<LanguageKind> {
    let ext = path.extension()?.to_str()?;
    LanguageKind::from_extension(ext)
}

/// Build a [`GlobSet`] from patterns, skipping invalid or empty ones.
///
/// Returns `None` if the input list is empty or all patterns are invalid.
pub fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    let mut added = 0usize;
    for pat in patterns {
        if pat.trim().is_empty() {
            continue;
        }
        if let Ok(g) = Glob::new(pat) {
            builder.add(g);
            added += 1;
        }
    }
    if added == 0 {
        return None;
    }
    builder.build().ok()
}

/// Return `true` if a path matches the ignore glob set.
///
/// # Example
/// ```
/// use std::path::Path;
/// use context_pack::core::normalize::{build_globset, is_ignored_by};
///
/// let gs = build_globset(&vec!["**/dist/**".to_string()]);
/// assert!(is_ignored_by(Path::new("web/dist/bundle.js"), gs.as_ref()));
/// assert!(!is_ignored_by(Path::new("web/src/main.js"), gs.as_ref()));
/// ```
pub fn is_ignored_by(path: &Path, set: Option<&GlobSet>) -> bool {
    set.is_some_and(|gs| gs.is_match(to_unix_sep(path.to_string_lossy())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_rel_for_missing_files_still_strips_root() {
        let rel = repo_rel_str(Path::new("/nonexistent/repo"), Path::new("/nonexistent/repo/a/b.ts"));
        assert_eq!(rel, "a/b.ts");
    }

    #[test]
    fn empty_or_invalid_globs_yield_none() {
        assert!(build_globset(&[]).is_none());
        assert!(build_globset(&["  ".to_string()]).is_none());
    }
}
