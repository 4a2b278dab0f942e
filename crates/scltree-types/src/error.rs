use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid digest width: expected 1..={max}, got {actual}")]
    InvalidWidth { max: usize, actual: usize },
}
