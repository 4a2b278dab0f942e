use serde::{Deserialize, Serialize};

use scltree_hash::NodeHasher;
use scltree_types::DigestKind;

/// Configuration for building a [`FingerprintIndex`](crate::FingerprintIndex).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Digest used for node and subtree fingerprints.
    pub digest: DigestKind,
    /// Deepest level (root = 0) a traversal will descend to.
    pub max_depth: usize,
    /// Maximum number of nodes fingerprinted per tree.
    pub max_nodes: usize,
    /// Maximum canonical byte length of a single node.
    pub max_canonical_len: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            digest: DigestKind::default(),
            max_depth: 1024,
            max_nodes: 10_000_000,
            max_canonical_len: NodeHasher::DEFAULT_MAX_CANONICAL_LEN,
        }
    }
}

impl IndexConfig {
    /// Default limits with a specific digest.
    pub fn with_digest(digest: DigestKind) -> Self {
        Self {
            digest,
            ..Default::default()
        }
    }

    /// The node hasher described by this configuration.
    pub fn hasher(&self) -> NodeHasher {
        NodeHasher::new(self.digest).with_max_canonical_len(self.max_canonical_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = IndexConfig::default();
        assert_eq!(c.digest, DigestKind::Blake3);
        assert_eq!(c.max_depth, 1024);
        assert_eq!(c.max_nodes, 10_000_000);
        assert_eq!(c.hasher().max_canonical_len(), NodeHasher::DEFAULT_MAX_CANONICAL_LEN);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c: IndexConfig = toml::from_str("digest = \"sha256\"\nmax_depth = 64").unwrap();
        assert_eq!(c.digest, DigestKind::Sha256);
        assert_eq!(c.max_depth, 64);
        assert_eq!(c.max_nodes, IndexConfig::default().max_nodes);
    }

    #[test]
    fn hasher_carries_digest_and_limit() {
        let c = IndexConfig {
            max_canonical_len: 10,
            ..IndexConfig::with_digest(DigestKind::Rapid64)
        };
        let hasher = c.hasher();
        assert_eq!(hasher.digest(), DigestKind::Rapid64);
        assert_eq!(hasher.max_canonical_len(), 10);
    }
}
