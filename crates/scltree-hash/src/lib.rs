//! Node content fingerprinting for scltree.
//!
//! A node's own fingerprint covers its tag, its attributes (sorted by name),
//! and its trimmed direct text. Descendants, siblings, and position never
//! contribute. Rolled-up subtree fingerprints are produced with
//! [`NodeHasher::combine`] under a separate domain tag, so a node digest and a
//! subtree digest can never be confused for one another.

pub mod canonical;
pub mod error;
pub mod hasher;

pub use canonical::canonical_form;
pub use error::{HashError, HashResult};
pub use hasher::NodeHasher;
