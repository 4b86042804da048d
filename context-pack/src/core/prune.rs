//! Content pruning: comment stripping and size-budget truncation.
//!
//! Comment removal is pattern based. It can corrupt comment-like sequences
//! inside string or template literals (`"http://x"` loses its tail). That is
//! acceptable for a reasoning context window; the output is never meant to be
//! compiled or written back. A real lexer is the fix if that ever changes.

use regex::Regex;
use std::sync::OnceLock;

use crate::core::traits::{SizeEstimator, WhitespaceEstimator};

static COMMENT_RE: OnceLock<Regex> = OnceLock::new();

fn comment_re() -> &'static Regex {
    // Block comments first in the alternation so `/* // */` goes as one unit.
    COMMENT_RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").unwrap())
}

/// Remove `//` line-trailing comments and `/* */` block comments, then trim.
pub fn strip_comments(raw: &str) -> String {
    comment_re().replace_all(raw, "").trim().to_string()
}

/// Strips comments and enforces a per-file size budget.
#[derive(Debug, Clone, Default)]
pub struct Pruner<E = WhitespaceEstimator> {
    estimator: E,
}

impl<E: SizeEstimator> Pruner<E> {
    pub fn new(estimator: E) -> Self {
        Self { estimator }
    }

    /// Cleaned text if it fits `budget`, otherwise the truncated form.
    pub fn prune(&self, raw: &str, budget: usize) -> String {
        let cleaned = strip_comments(raw);
        if self.estimator.estimate_size(&cleaned) <= budget {
            cleaned
        } else {
            self.estimator.truncate_to_budget(&cleaned, budget)
        }
    }
}

/// [`Pruner::prune`] with the whitespace estimator.
pub fn prune(raw: &str, budget: usize) -> String {
    Pruner::new(WhitespaceEstimator).prune(raw, budget)
}
