//! Local dependency graph traversal.

pub mod walker;

pub use walker::{ImportWalker, Traversal};
