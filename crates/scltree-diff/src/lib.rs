//! Structural diff engine for scltree.
//!
//! Compares two element trees through their fingerprint indexes, tolerating
//! sibling reordering and treating `Private` extension subtrees as opaque.
//!
//! # Key Types
//!
//! - [`TreeDiffer`] / [`diff`] -- Classify the nodes of two trees
//! - [`DiffReport`] -- Matched / removed / added / changed buckets
//! - [`StructuralMatcher`] -- Order-insensitive equality and identity checks
//! - [`DiffConfig`] -- Index settings, Private tag, verification, parallelism

pub mod config;
pub mod differ;
pub mod error;
pub mod matcher;
pub mod report;

pub use config::DiffConfig;
pub use differ::{diff, TreeDiffer};
pub use error::{DiffError, DiffResult, Side};
pub use matcher::{is_in_private, StructuralMatcher, PRIVATE_TAG};
pub use report::{DiffReport, DiffSummary};
