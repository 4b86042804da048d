//! Change-review batch collection.
//!
//! For every changed file: render its chunks, attach its behavior descriptor
//! (if any), estimate the size of both, and keep a running total so the batch
//! stays under the context limit.

use context_pack::behavior::BehaviorLinker;
use context_pack::config::model::{BehaviorConfig, ContextConfig};
use context_pack::core::traits::{SizeEstimator, WhitespaceEstimator};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::git::DiffSource;
use crate::render_review_chunks_with;

/// Everything the prompt layer needs about one changed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReviewInput {
    pub path: PathBuf,
    /// Repository-relative path shown in the banner.
    pub display_path: String,
    /// Rendered, annotated chunks.
    pub chunks: String,
    /// Behavior descriptor text, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
    pub estimated_tokens: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOptions {
    pub base_ref: String,
    pub window_radius: usize,
    pub context_limit: usize,
    pub include_behavior: bool,
    /// Descriptor layout used to find each file's behavior.
    pub behavior: BehaviorConfig,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self::from_config(&ContextConfig::default())
    }
}

impl ReviewOptions {
    pub fn from_config(cfg: &ContextConfig) -> Self {
        Self {
            base_ref: cfg.review.base_ref.clone(),
            window_radius: cfg.review.window_radius,
            context_limit: cfg.limits.context_limit,
            include_behavior: cfg.behavior.include_behavior,
            behavior: cfg.behavior.clone(),
        }
    }
}

/// Review input for one file, or `None` if it renders nothing.
pub fn prepare_file_input<S: DiffSource>(
    source: &S,
    file: &Path,
    opts: &ReviewOptions,
) -> Option<FileReviewInput> {
    let rendered = render_review_chunks_with(source, file, &opts.base_ref, opts.window_radius);
    if rendered.chunks.is_empty() {
        debug!(path = %file.display(), "review: nothing to render");
        return None;
    }

    let behavior = if opts.include_behavior {
        BehaviorLinker::from_config(&opts.behavior)
            .descriptor_for_file(file)
            .and_then(|d| fs::read_to_string(&d).ok())
            .map(|t| t.trim().to_string())
    } else {
        None
    };

    let est = WhitespaceEstimator;
    let estimated_tokens = est.estimate_size(&rendered.chunks)
        + behavior.as_deref().map_or(0, |b| est.estimate_size(b));

    Some(FileReviewInput {
        path: file.to_path_buf(),
        display_path: rendered.display_path,
        chunks: rendered.chunks,
        behavior,
        estimated_tokens,
    })
}

/// Keep inputs in order while the running total fits `limit`.
///
/// A file that would overflow is skipped; later, smaller files may still fit.
pub fn apply_context_limit(inputs: Vec<FileReviewInput>, limit: usize) -> Vec<FileReviewInput> {
    let mut total = 0usize;
    let mut kept = Vec::with_capacity(inputs.len());
    for input in inputs {
        if total + input.estimated_tokens > limit {
            warn!(
                path = %input.display_path,
                tokens = input.estimated_tokens,
                total,
                limit,
                "review: skipped, would exceed context limit"
            );
            continue;
        }
        total += input.estimated_tokens;
        kept.push(input);
    }
    info!(files = kept.len(), total, "review: batch ready");
    kept
}

/// Render every changed file and apply the context limit.
///
/// A failing changed-file listing yields an empty batch.
#[tracing::instrument(level = "debug", skip_all, fields(base = %opts.base_ref))]
pub fn collect_review_inputs<S: DiffSource>(source: &S, opts: &ReviewOptions) -> Vec<FileReviewInput> {
    let files = match source.changed_files(&opts.base_ref) {
        Ok(f) => f,
        Err(err) => {
            warn!(error = %err, "review: cannot list changed files");
            return Vec::new();
        }
    };
    debug!(changed = files.len(), "review: changed files listed");

    let inputs: Vec<FileReviewInput> = files
        .iter()
        .filter_map(|f| prepare_file_input(source, f, opts))
        .collect();
    apply_context_limit(inputs, opts.context_limit)
}
