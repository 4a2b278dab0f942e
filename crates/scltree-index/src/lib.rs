//! Subtree fingerprinting and indexing for scltree.
//!
//! One post-order traversal of a tree assigns every node an *effective*
//! fingerprint covering its whole subtree and files the node under it.
//!
//! # Key Types
//!
//! - [`SubtreeAggregator`] -- Runs the traversal and builds the index
//! - [`FingerprintIndex`] -- Fingerprint to nodes multimap (insertion ordered)
//! - [`NodeFingerprints`] -- Own and effective fingerprint of one node
//! - [`IndexConfig`] -- Digest choice and resource guards

pub mod aggregator;
pub mod config;
pub mod error;
pub mod fingerprint_index;

pub use aggregator::{aggregate, SubtreeAggregator};
pub use config::IndexConfig;
pub use error::{IndexError, IndexResult};
pub use fingerprint_index::{FingerprintIndex, NodeFingerprints};
