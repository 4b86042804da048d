//! Bounded context assembly for JavaScript/TypeScript component trees.
//!
//! Starting from one entry file, the crate gathers the entry and its local
//! imports (depth-first, capped by `max_files`), prunes each file to a token
//! budget, and optionally attaches a behavior descriptor plus the shared-state
//! modules that descriptor names. The result is a [`ContextPackage`] suitable
//! for a prompt.
//!
//! Module map:
//! - [`core`]: module resolution, comment pruning, size estimation, fs scanning
//! - [`languages`]: import extraction (Tree-sitter, with a regex fallback)
//! - [`graph`]: the capped import walker
//! - [`behavior`]: descriptor discovery and state linking
//! - [`assemble`]: composition into a [`ContextPackage`]
//! - [`snapshot`]: whole-repository text snapshot
//! - [`config`]: limits and knobs, loaded from the environment

pub mod assemble;
pub mod behavior;
pub mod config;
pub mod core;
pub mod graph;
pub mod languages;
pub mod model;
pub mod snapshot;

pub use assemble::{Assembler, assemble};
pub use config::model::ContextConfig;
pub use core::prune::{Pruner, prune};
pub use core::resolve::ModuleResolver;
pub use core::traits::{ImportResolver, SizeEstimator, WhitespaceEstimator};
pub use model::package::{AssembleOptions, ContextPackage, FileMap};
pub use snapshot::{RepoSnapshot, snapshot_repo};
