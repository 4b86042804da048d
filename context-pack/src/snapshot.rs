//! Whole-repository snapshot for broad-context prompts.
//!
//! Collects every snapshot-eligible source file under a root (see
//! [`crate::core::fs_scan`]) and renders them as one text blob with
//! `=== <relative path> ===` headers, alongside a size estimate the caller
//! can compare against its context limit.

use crate::{
    config::model::ContextConfig,
    core::{
        fs_scan,
        traits::{SizeEstimator, WhitespaceEstimator},
    },
};
use anyhow::Result;
use serde::Serialize;
use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotFile {
    /// Root-relative path with `/` separators.
    pub rel: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoSnapshot {
    pub root: PathBuf,
    pub files: Vec<SnapshotFile>,
    pub estimated_tokens: usize,
}

impl RepoSnapshot {
    /// Concatenate files as `\n\n=== rel ===\n\n<content>` blocks.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for f in &self.files {
            let _ = write!(out, "\n\n=== {} ===\n\n{}", f.rel, f.content);
        }
        out
    }

    /// `true` if the estimate fits within `limit`.
    pub fn fits(&self, limit: usize) -> bool {
        self.estimated_tokens <= limit
    }
}

/// Snapshot `root` using the default whitespace estimator.
#[tracing::instrument(level = "info", skip_all, fields(root = %root.display()))]
pub fn snapshot_repo(root: &Path, cfg: &ContextConfig) -> Result<RepoSnapshot> {
    snapshot_repo_with(root, cfg, &WhitespaceEstimator)
}

/// Snapshot `root`, sizing content with `estimator`.
///
/// Unreadable (e.g. non UTF-8) files are skipped with a warning.
pub fn snapshot_repo_with<E: SizeEstimator>(
    root: &Path,
    cfg: &ContextConfig,
    estimator: &E,
) -> Result<RepoSnapshot> {
    let scan = fs_scan::scan_repo(root, cfg)?;

    let mut files = Vec::with_capacity(scan.files.len());
    let mut estimated_tokens = 0usize;
    for f in scan.files {
        match fs::read_to_string(&f.path) {
            Ok(content) => {
                estimated_tokens += estimator.estimate_size(&content);
                files.push(SnapshotFile {
                    rel: f.rel,
                    content,
                });
            }
            Err(err) => warn!(path = %f.path.display(), error = %err, "snapshot: unreadable"),
        }
    }

    if estimated_tokens > cfg.limits.context_limit {
        warn!(
            estimated_tokens,
            limit = cfg.limits.context_limit,
            "snapshot: exceeds context limit"
        );
    }
    info!(files = files.len(), estimated_tokens, "snapshot: done");

    Ok(RepoSnapshot {
        root: scan.root,
        files,
        estimated_tokens,
    })
}
