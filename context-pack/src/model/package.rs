//! The bounded bundle handed to the prompt layer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::model::ContextConfig;

/// Ordered `path -> content` map; insertion order is traversal order.
pub type FileMap = IndexMap<PathBuf, String>;

/// Source text, plus optional behavior/state text, assembled for one request.
///
/// Invariants upheld by the assembler:
/// - `files.len() <= max_files`;
/// - every value fits `max_tokens_per_file` under the active estimator;
/// - `entry_file` is a key of `files` whenever it was readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPackage {
    /// Absolute path of the file the walk started from.
    pub entry_file: PathBuf,
    /// Entry file and its local dependencies, depth-first in declaration order.
    pub files: FileMap,
    /// Pruned behavior descriptor text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior_file: Option<String>,
    /// Shared-state modules named by the descriptor and not already in `files`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_files: Option<FileMap>,
}

impl ContextPackage {
    pub fn new(entry_file: PathBuf) -> Self {
        Self {
            entry_file,
            ..Default::default()
        }
    }

    /// `true` if `path` was gathered either as a source file or a state file.
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self
                .state_files
                .as_ref()
                .is_some_and(|s| s.contains_key(path))
    }

    /// Number of source plus state files.
    pub fn gathered_count(&self) -> usize {
        self.files.len() + self.state_files.as_ref().map_or(0, |s| s.len())
    }
}

/// Caller-level knobs for one `assemble` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembleOptions {
    pub max_files: usize,
    pub max_tokens_per_file: usize,
    pub include_behavior: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self::from_config(&ContextConfig::default())
    }
}

impl AssembleOptions {
    pub fn from_config(cfg: &ContextConfig) -> Self {
        Self {
            max_files: cfg.limits.max_files,
            max_tokens_per_file: cfg.limits.max_tokens_per_file,
            include_behavior: cfg.behavior.include_behavior,
        }
    }
}
