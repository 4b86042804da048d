//! Import-graph walker.
//!
//! Discovers the local (same-tree) dependencies of an entry file and loads
//! each one as pruned text into an ordered result map.
//!
//! Cap policy: **pre-order**. A file's own content is inserted before any of
//! its imports are followed, so when `max_files` is reached mid-walk the files
//! closest to the entry along the depth-first path are the ones kept, and the
//! entry itself is always kept. Key order is depth-first, in source
//! declaration order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::prune::Pruner;
use crate::core::traits::{ImportResolver, SizeEstimator};
use crate::languages::scan_imports;
use crate::model::package::FileMap;

/// Traversal-scoped state for one top-level invocation.
///
/// Owned by the caller and passed by `&mut` down the walk; never shared
/// between concurrent invocations.
#[derive(Debug, Clone)]
pub struct Traversal {
    visited: HashSet<PathBuf>,
    max_files: usize,
}

impl Traversal {
    pub fn new(max_files: usize) -> Self {
        Self {
            visited: HashSet::new(),
            max_files,
        }
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn is_visited(&self, p: &Path) -> bool {
        self.visited.contains(p)
    }

    /// Mark `p` visited; `false` if it already was.
    pub fn mark(&mut self, p: &Path) -> bool {
        self.visited.insert(p.to_path_buf())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

/// Walks imports with a resolver and a pruner.
pub struct ImportWalker<'a, R, E> {
    resolver: &'a R,
    pruner: &'a Pruner<E>,
    max_tokens_per_file: usize,
}

impl<'a, R: ImportResolver, E: SizeEstimator> ImportWalker<'a, R, E> {
    pub fn new(resolver: &'a R, pruner: &'a Pruner<E>, max_tokens_per_file: usize) -> Self {
        Self {
            resolver,
            pruner,
            max_tokens_per_file,
        }
    }

    /// Walk from `file`, appending pruned contents to `files`.
    ///
    /// Missing or unreadable files add nothing. Reaching `max_files` stops
    /// further additions without error.
    pub fn walk(&self, file: &Path, traversal: &mut Traversal, files: &mut FileMap) {
        // Explicit stack instead of recursion; popping in reverse-pushed order
        // reproduces recursive pre-order exactly.
        let mut stack: Vec<PathBuf> = vec![file.to_path_buf()];

        while let Some(current) = stack.pop() {
            if traversal.is_visited(&current) {
                continue;
            }
            if files.len() >= traversal.max_files() {
                debug!(
                    path = %current.display(),
                    max_files = traversal.max_files(),
                    "walk: file cap reached, stopping"
                );
                break;
            }
            traversal.mark(&current);

            let raw = match fs::read_to_string(&current) {
                Ok(s) => s,
                Err(err) => {
                    debug!(path = %current.display(), error = %err, "walk: unreadable, skipped");
                    continue;
                }
            };

            files.insert(
                current.clone(),
                self.pruner.prune(&raw, self.max_tokens_per_file),
            );

            let local: Vec<PathBuf> = scan_imports(&current, &raw)
                .into_iter()
                .filter_map(|imp| self.resolver.resolve(&current, &imp.specifier))
                .collect();
            debug!(
                path = %current.display(),
                local = local.len(),
                "walk: file added"
            );

            stack.extend(
                local
                    .into_iter()
                    .rev()
                    .filter(|p| !traversal.is_visited(p)),
            );
        }
    }
}
