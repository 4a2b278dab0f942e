//! Foundation types for scltree.
//!
//! This crate provides the value types and the collaborator interface shared
//! by every other scltree crate. It has no knowledge of how fingerprints are
//! computed or how trees are compared.
//!
//! # Key Types
//!
//! - [`Fingerprint`] -- Fixed-capacity digest of a node or a rolled-up subtree
//! - [`DigestKind`] -- Which digest backs a fingerprint (configuration)
//! - [`TreeView`] -- Read-only view over an externally built element tree

pub mod digest;
pub mod error;
pub mod fingerprint;
pub mod tree;

pub use digest::DigestKind;
pub use error::TypeError;
pub use fingerprint::Fingerprint;
pub use tree::{local_name, TreeView};
