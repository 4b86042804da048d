//! Filesystem scanning for repository snapshots.

use crate::{
    config::model::ContextConfig,
    core::normalize::{build_globset, is_ignored_by, repo_rel_str},
};
use anyhow::{Result, bail};
use globset::GlobSet;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Absolute path.
    pub path: PathBuf,
    /// Root-relative path with `/` separators.
    pub rel: String,
}

#[derive(Debug, Clone)]
pub struct ScanResult {
    pub root: PathBuf,
    /// Files in root-relative lexical order.
    pub files: Vec<ScannedFile>,
}

/// Collect snapshot candidates under `root`.
///
/// Skips `.git` and vendor directories, configured ignore globs, and (when
/// enabled) entries from the root `.gitignore`. Only files whose extension is
/// listed in `filters.snapshot_extensions` are kept.
pub fn scan_repo(root: &Path, cfg: &ContextConfig) -> Result<ScanResult> {
    if !root.is_dir() {
        bail!("fs_scan: root is not a directory: {}", root.display());
    }
    let root = dunce::canonicalize(root)?;

    info!("fs_scan: start -> {}", root.display());

    let ignore_globs: Option<GlobSet> = build_globset(&cfg.filters.ignore_globs);
    let gitignore: Option<GlobSet> = if cfg.filters.respect_gitignore {
        build_globset(&gitignore_globs(&root))
    } else {
        None
    };
    let vendor_dirs = &cfg.resolve.vendor_dirs;

    let mut skipped_ignored = 0usize;
    let mut files = Vec::<ScannedFile>::new();

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| keep_entry(e, vendor_dirs));

    for entry in walker.filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = repo_rel_str(&root, path);

        let rel_path = Path::new(&rel);
        if is_ignored_by(rel_path, ignore_globs.as_ref())
            || is_ignored_by(rel_path, gitignore.as_ref())
        {
            skipped_ignored += 1;
            debug!("fs_scan: ignore {}", rel);
            continue;
        }

        if !has_snapshot_extension(path, &cfg.filters.snapshot_extensions) {
            continue;
        }

        files.push(ScannedFile {
            path: path.to_path_buf(),
            rel,
        });
    }

    info!(
        "fs_scan: done, total={} (ignored={})",
        files.len(),
        skipped_ignored
    );

    Ok(ScanResult { root, files })
}

/// Coarse directory filter to avoid descending into vendor folders.
fn keep_entry(entry: &DirEntry, vendor_dirs: &[String]) -> bool {
    if entry.depth() > 0 && entry.file_type().is_dir() {
        if let Some(name) = entry.file_name().to_str() {
            return name != ".git" && !vendor_dirs.iter().any(|v| v == name);
        }
    }
    true
}

fn has_snapshot_extension(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| exts.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Translate root `.gitignore` lines into root-relative globs.
///
/// Each entry ignores the path itself and everything below it. Negations
/// (`!pattern`) are not supported and are skipped.
fn gitignore_globs(root: &Path) -> Vec<String> {
    let Ok(text) = fs::read_to_string(root.join(".gitignore")) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for line in text.lines() {
        let t = line.trim();
        if t.is_empty() || t.starts_with('#') || t.starts_with('!') {
            continue;
        }
        let pat = t.trim_start_matches('/').trim_end_matches('/');
        if pat.is_empty() {
            continue;
        }
        out.push(pat.to_string());
        out.push(format!("{pat}/**"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, body).unwrap();
    }

    #[test]
    fn honours_gitignore_vendor_dirs_and_extensions() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, ".gitignore", "# build output\n/dist/\nsecret.json\n");
        write(root, "src/App.tsx", "export {}");
        write(root, "src/util.js", "export {}");
        write(root, "src/readme.md", "docs");
        write(root, "dist/bundle.js", "x");
        write(root, "secret.json", "{}");
        write(root, "package.json", "{}");
        write(root, "node_modules/react/index.js", "x");

        let res = scan_repo(root, &ContextConfig::default()).unwrap();
        let rels: Vec<&str> = res.files.iter().map(|f| f.rel.as_str()).collect();
        assert_eq!(rels, vec!["package.json", "src/App.tsx", "src/util.js"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_repo(&tmp.path().join("nope"), &ContextConfig::default()).is_err());
    }
}
