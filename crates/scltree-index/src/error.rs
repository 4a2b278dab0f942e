//! Error types for the index crate.

use scltree_hash::HashError;

/// Errors that abort building a fingerprint index.
///
/// A failed traversal never yields a partial index.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    /// The tree is empty, malformed, or exceeds a configured guard.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A node could not be fingerprinted.
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] HashError),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
