//! Configuration data structures for context assembly and change review.
//!
//! Groups:
//! - [`ContextConfig`] : top-level container for all config groups
//! - [`Limits`]        : file-count and size-estimate ceilings
//! - [`ResolveConfig`] : module resolution (extensions, index files, vendor dirs)
//! - [`BehaviorConfig`]: behavior descriptor and shared-state layout
//! - [`ReviewConfig`]  : diff baseline and window radius
//! - [`Filters`]       : snapshot inclusion/exclusion rules
//!
//! All structs are `serde`-friendly so they can be loaded from TOML/JSON.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Size ceilings applied to assembled packages and review batches.
    pub limits: Limits,
    /// How relative import specifiers are turned into files.
    pub resolve: ResolveConfig,
    /// Behavior descriptor discovery and shared-state references.
    pub behavior: BehaviorConfig,
    /// Change-review settings.
    pub review: ReviewConfig,
    /// Repository snapshot filters.
    pub filters: Filters,
}

impl ContextConfig {
    /// Validate config sanity (no degenerate or absurd values).
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_files == 0 {
            return Err(anyhow!("`max_files` must be greater than 0"));
        }
        if self.limits.max_tokens_per_file == 0 {
            return Err(anyhow!("`max_tokens_per_file` must be greater than 0"));
        }
        if self.limits.context_limit == 0 {
            return Err(anyhow!("`context_limit` must be greater than 0"));
        }
        if self.review.window_radius > 50 {
            return Err(anyhow!(
                "`window_radius` too large: {}",
                self.review.window_radius
            ));
        }
        if self.resolve.extensions.is_empty() {
            return Err(anyhow!("`resolve.extensions` must not be empty"));
        }
        if self.behavior.descriptor_suffix.is_empty() {
            return Err(anyhow!("`behavior.descriptor_suffix` must not be empty"));
        }
        if self.review.base_ref.trim().is_empty() {
            return Err(anyhow!("`review.base_ref` must not be empty"));
        }
        Ok(())
    }
}

/// Ceilings for assembly and review.
///
/// Budgets are enforced purely by counts and size estimates, never by time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of source files in one context package.
    pub max_files: usize,
    /// Per-file size ceiling, in estimator units.
    pub max_tokens_per_file: usize,
    /// Total size ceiling for one change-review batch.
    pub context_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_tokens_per_file: 1000,
            context_limit: 128_000,
        }
    }
}

/// Module resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Source extensions tried (in order) when a specifier has none.
    pub extensions: Vec<String>,
    /// Base name of directory index files.
    pub index_name: String,
    /// Directory names whose contents are always external.
    pub vendor_dirs: Vec<String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            extensions: ["ts", "tsx", "js", "jsx", "mjs", "cjs"]
                .into_iter()
                .map(String::from)
                .collect(),
            index_name: "index".into(),
            vendor_dirs: vec!["node_modules".into()],
        }
    }
}

/// Behavior descriptor layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suffix that marks a behavior descriptor file.
    pub descriptor_suffix: String,
    /// Directory (beside the descriptor) holding shared-state modules.
    pub state_dir: String,
    /// Extension of shared-state modules.
    pub state_extension: String,
    /// Name of the descriptor list field that names shared-state identifiers.
    pub uses_field: String,
    /// Descriptor table whose `[<table>.<name>] path = "..."` entries name
    /// state files relative to the project root.
    pub state_table: String,
    /// Attach descriptors and state files to packages and review inputs.
    pub include_behavior: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            descriptor_suffix: ".zap.toml".into(),
            state_dir: "state".into(),
            state_extension: "js".into(),
            uses_field: "uses".into(),
            state_table: "state".into(),
            include_behavior: true,
        }
    }
}

/// Change-review settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Baseline ref the working tree is diffed against.
    pub base_ref: String,
    /// Lines of context on each side of a changed line.
    pub window_radius: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            base_ref: "origin/main".into(),
            window_radius: 5,
        }
    }
}

/// Snapshot filtering rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Glob patterns for files to ignore.
    pub ignore_globs: Vec<String>,
    /// File extensions included in a repository snapshot.
    pub snapshot_extensions: Vec<String>,
    /// Whether to honour the root `.gitignore`.
    pub respect_gitignore: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            ignore_globs: vec![
                "**/.git/**".into(),
                "**/node_modules/**".into(),
                "**/dist/**".into(),
                "**/target/**".into(),
            ],
            snapshot_extensions: ["js", "ts", "jsx", "tsx", "json"]
                .into_iter()
                .map(String::from)
                .collect(),
            respect_gitignore: true,
        }
    }
}
