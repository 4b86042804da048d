//! Module resolution for relative import specifiers.
//!
//! Heuristics:
//! - Only `./`, `../`, `.` and `..` specifiers are local; bare names are packages.
//! - Candidates, in order: the literal path, the path with each extension
//!   appended, then `<path>/index.<ext>` for each extension.
//! - Anything with a vendor directory component (`node_modules`) is external.
//! - No tsconfig `paths` aliasing.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::config::model::ResolveConfig;
use crate::core::traits::ImportResolver;

/// `true` for specifiers that start with a relative-path marker.
pub fn is_relative_specifier(spec: &str) -> bool {
    spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../")
}

/// Filesystem-backed resolver driven by [`ResolveConfig`].
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    extensions: Vec<String>,
    index_name: String,
    vendor_dirs: Vec<String>,
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::from_config(&ResolveConfig::default())
    }
}

impl ModuleResolver {
    pub fn from_config(cfg: &ResolveConfig) -> Self {
        Self {
            extensions: cfg
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            index_name: cfg.index_name.clone(),
            vendor_dirs: cfg.vendor_dirs.clone(),
        }
    }

    /// Candidate paths in priority order (no filesystem access).
    pub fn candidates(&self, base_file: &Path, spec: &str) -> Vec<PathBuf> {
        let base_dir = base_file.parent().unwrap_or(Path::new(""));
        let joined = base_dir.join(spec);

        let mut out = Vec::with_capacity(1 + self.extensions.len() * 2);
        out.push(joined.clone());
        for ext in &self.extensions {
            // Append rather than replace: `./Button.styles` -> `Button.styles.ts`.
            let mut s = joined.clone().into_os_string();
            s.push(".");
            s.push(ext);
            out.push(PathBuf::from(s));
        }
        for ext in &self.extensions {
            out.push(joined.join(format!("{}.{}", self.index_name, ext)));
        }
        out
    }

    fn is_vendored(&self, p: &Path) -> bool {
        p.components().any(|c| match c {
            Component::Normal(name) => self
                .vendor_dirs
                .iter()
                .any(|v| name.to_string_lossy() == v.as_str()),
            _ => false,
        })
    }
}

impl ImportResolver for ModuleResolver {
    fn resolve(&self, src_file: &Path, spec: &str) -> Option<PathBuf> {
        if !is_relative_specifier(spec) || self.is_vendored(Path::new(spec)) {
            return None;
        }
        let hit = self
            .candidates(src_file, spec)
            .into_iter()
            .find(|c| c.is_file())?;
        if self.is_vendored(&hit) {
            debug!(spec, path = %hit.display(), "resolve: vendored target treated as external");
            return None;
        }
        Some(dunce::canonicalize(&hit).unwrap_or(hit))
    }
}
