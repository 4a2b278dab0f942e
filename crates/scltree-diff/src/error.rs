//! Error types for the diff crate.

use std::fmt;

use scltree_index::IndexError;

/// Which input of a comparison an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The first (old) tree.
    Source,
    /// The second (new) tree.
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// Errors that can occur during a diff.
///
/// Fingerprint collisions are never errors; they are resolved structurally.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// One of the trees could not be indexed.
    #[error("cannot index {side} tree: {source}")]
    Index { side: Side, source: IndexError },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
