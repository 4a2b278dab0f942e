//! Error types for the hashing crate.

/// Errors from fingerprint computation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HashError {
    /// The canonical byte string of a node exceeds the configured limit.
    #[error("canonical form of <{tag}> is {len} bytes, limit is {max}")]
    CanonicalTooLarge { tag: String, len: usize, max: usize },
}

/// Convenience alias for hashing results.
pub type HashResult<T> = Result<T, HashError>;
