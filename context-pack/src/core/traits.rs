//! Seams used across the pipeline.
//!
//! These traits decouple size estimation and import resolution from traversal
//! and rendering, so either side can be swapped (e.g. a sub-word tokenizer in
//! place of the whitespace heuristic) without touching the other.

use std::path::{Path, PathBuf};

/// Approximate length of a text, in "tokens".
pub trait SizeEstimator {
    /// Size estimate of `text`.
    fn estimate_size(&self, text: &str) -> usize;

    /// Cut `text` down so that its estimate is at most `budget`.
    ///
    /// The default keeps the first `budget` whitespace-delimited tokens,
    /// re-joined with single spaces; this may cut mid-statement.
    fn truncate_to_budget(&self, text: &str, budget: usize) -> String {
        text.split_whitespace()
            .take(budget)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Whitespace-delimited token count.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceEstimator;

impl SizeEstimator for WhitespaceEstimator {
    fn estimate_size(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

/// Resolves an import specifier as seen from `src_file` into a local file.
pub trait ImportResolver {
    /// `None` means external or not found; never an error.
    fn resolve(&self, src_file: &Path, specifier: &str) -> Option<PathBuf>;
}
