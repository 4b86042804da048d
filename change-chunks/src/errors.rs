//! Crate-wide error hierarchy for change-chunks.
//!
//! These errors stay inside the crate and its `try_*` functions. The public
//! render/collect entry points log them and degrade to an empty result.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type ChunksResult<T> = Result<T, Error>;

/// Root error type for the change-chunks crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Version-control command failure.
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// Unified diff parsing failure.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Reading the changed file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the diff-producing collaborator.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The program could not be started at all.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited non-zero.
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Output was not valid UTF-8.
    #[error("non utf-8 output from `{0}`")]
    InvalidOutput(String),

    /// Working directory is not inside a repository.
    #[error("not a repository: {0}")]
    NotARepository(String),
}

/// Unified diff parser errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid hunk header: {0}")]
    InvalidHunkHeader(String),

    #[error("integer overflow in hunk header: {0}")]
    Overflow(String),
}
