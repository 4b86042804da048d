//! Building blocks shared by the assembler and the snapshot: seams, pruning,
//! module resolution, path normalization and filesystem scanning.

pub mod fs_scan;
pub mod normalize;
pub mod prune;
pub mod resolve;
pub mod traits;
