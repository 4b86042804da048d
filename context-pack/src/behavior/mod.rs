//! Behavior descriptor discovery and shared-state linking.
//!
//! A behavior descriptor is a sibling file of a component (`LoginForm.zap.toml`
//! next to `LoginForm.jsx`) declaring intended behavior and the shared-state
//! modules the component relies on. Nothing here fails: a missing descriptor
//! or state file is simply absent from the result.

pub mod state;

use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::config::model::BehaviorConfig;
use crate::core::normalize::canonical_or_same;

/// Finds descriptors and resolves their state references.
#[derive(Debug, Clone)]
pub struct BehaviorLinker {
    suffix: String,
    state_dir: String,
    state_extension: String,
    uses_field: String,
    state_table: String,
}

impl Default for BehaviorLinker {
    fn default() -> Self {
        Self::from_config(&BehaviorConfig::default())
    }
}

impl BehaviorLinker {
    pub fn from_config(cfg: &BehaviorConfig) -> Self {
        Self {
            suffix: cfg.descriptor_suffix.clone(),
            state_dir: cfg.state_dir.clone(),
            state_extension: cfg.state_extension.trim_start_matches('.').to_string(),
            uses_field: cfg.uses_field.clone(),
            state_table: cfg.state_table.clone(),
        }
    }

    /// Sibling descriptor whose base name matches the component.
    ///
    /// The base name is the descriptor file name minus the suffix, compared
    /// case-insensitively against both the component stem (`LoginForm`) and
    /// its full file name (`LoginForm.jsx`). Siblings are examined in file-name
    /// order; the first match wins.
    pub fn find_behavior_descriptor(&self, component: &Path) -> Option<PathBuf> {
        let dir = component.parent()?;
        let stem = component.file_stem()?.to_string_lossy().to_lowercase();
        let full = component.file_name()?.to_string_lossy().to_lowercase();

        let mut names: Vec<String> = match fs::read_dir(dir) {
            Ok(rd) => rd
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
                .map(|e| e.file_name().to_string_lossy().to_string())
                .filter(|n| n.ends_with(&self.suffix))
                .collect(),
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "behavior: cannot list directory");
                return None;
            }
        };
        names.sort();

        let hit = names.into_iter().find(|n| {
            let base = n[..n.len() - self.suffix.len()].to_lowercase();
            base == stem || base == full
        })?;
        Some(dir.join(hit))
    }

    /// Descriptor for a changed file: `<file><suffix>` if present, otherwise
    /// the sibling match from [`Self::find_behavior_descriptor`].
    pub fn descriptor_for_file(&self, file: &Path) -> Option<PathBuf> {
        let mut direct = file.as_os_str().to_owned();
        direct.push(&self.suffix);
        let direct = PathBuf::from(direct);
        if direct.is_file() {
            return Some(direct);
        }
        self.find_behavior_descriptor(file)
    }

    /// Existing state files named by the descriptor text.
    ///
    /// Each identifier maps to `<descriptor_dir>/<state_dir>/<id>.<ext>`, with
    /// `<descriptor_dir>/../<state_dir>/<id>.<ext>` as a second candidate.
    /// Identifiers that escape the state directory are rejected; paths that do
    /// not exist are dropped silently.
    ///
    /// `[state.<name>] path = "..."` entries follow the identifiers. Their paths
    /// are relative to the project root: the nearest ancestor of the descriptor
    /// holding `package.json` or `.git`, else the descriptor directory.
    pub fn resolve_state_references(&self, text: &str, descriptor_dir: &Path) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = Vec::new();
        let mut push = |hit: &Path| {
            let hit = canonical_or_same(hit);
            if !out.contains(&hit) {
                out.push(hit);
            }
        };
        for id in state::state_identifiers(text, &self.uses_field) {
            if !is_plain_identifier(&id) {
                debug!(id = %id, "behavior: rejected state identifier");
                continue;
            }
            let file_name = if id.ends_with(&format!(".{}", self.state_extension)) {
                id.clone()
            } else {
                format!("{id}.{}", self.state_extension)
            };
            let candidates = [
                descriptor_dir.join(&self.state_dir).join(&file_name),
                descriptor_dir.join("..").join(&self.state_dir).join(&file_name),
            ];
            match candidates.iter().find(|c| c.is_file()) {
                Some(hit) => push(hit),
                None => debug!(id = %id, "behavior: state file not found"),
            }
        }

        let paths = state::state_table_paths(text, &self.state_table);
        if !paths.is_empty() {
            let root = project_root(descriptor_dir);
            for rel in paths {
                if !is_relative_inside(&rel) {
                    debug!(path = %rel, "behavior: rejected state path");
                    continue;
                }
                let candidate = root.join(&rel);
                if candidate.is_file() {
                    push(&candidate);
                } else {
                    debug!(path = %rel, "behavior: state file not found");
                }
            }
        }
        out
    }
}

/// Nearest ancestor of `dir` (itself included) that looks like a project root.
fn project_root(dir: &Path) -> PathBuf {
    dir.ancestors()
        .find(|d| d.join("package.json").is_file() || d.join(".git").exists())
        .unwrap_or(dir)
        .to_path_buf()
}

fn is_relative_inside(rel: &str) -> bool {
    let p = Path::new(rel);
    !p.is_absolute()
        && p.components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn is_plain_identifier(id: &str) -> bool {
    let p = Path::new(id);
    !p.is_absolute() && p.components().all(|c| matches!(c, Component::Normal(_)))
}
