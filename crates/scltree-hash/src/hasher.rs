use sha2::{Digest, Sha256};

use scltree_types::{DigestKind, Fingerprint, TreeView};

use crate::canonical::canonical_form;
use crate::error::{HashError, HashResult};

const NODE_DOMAIN: &str = "scltree-node-v1";
const SUBTREE_DOMAIN: &str = "scltree-subtree-v1";

/// Domain-separated fingerprinter for node content and subtree roll-ups.
///
/// Each computation prepends a domain tag (`scltree-node-v1` for a node's own
/// content, `scltree-subtree-v1` for combinations) before digesting with the
/// configured [`DigestKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeHasher {
    digest: DigestKind,
    max_canonical_len: usize,
}

impl Default for NodeHasher {
    fn default() -> Self {
        Self::new(DigestKind::default())
    }
}

impl NodeHasher {
    /// Default upper bound on a node's canonical form (16 MiB).
    pub const DEFAULT_MAX_CANONICAL_LEN: usize = 16 * 1024 * 1024;

    /// Create a hasher for the given digest.
    pub const fn new(digest: DigestKind) -> Self {
        Self {
            digest,
            max_canonical_len: Self::DEFAULT_MAX_CANONICAL_LEN,
        }
    }

    /// Limit the canonical byte length accepted for a single node.
    pub const fn with_max_canonical_len(mut self, max: usize) -> Self {
        self.max_canonical_len = max;
        self
    }

    /// The digest in use.
    pub fn digest(&self) -> DigestKind {
        self.digest
    }

    /// The canonical length limit in bytes.
    pub fn max_canonical_len(&self) -> usize {
        self.max_canonical_len
    }

    /// Fingerprint a node's own content (tag, attributes, direct text).
    pub fn fingerprint<T: TreeView + ?Sized>(&self, tree: &T, node: T::NodeId) -> HashResult<Fingerprint> {
        let canonical = canonical_form(tree, node);
        if canonical.len() > self.max_canonical_len {
            return Err(HashError::CanonicalTooLarge {
                tag: tree.tag(node).to_string(),
                len: canonical.len(),
                max: self.max_canonical_len,
            });
        }
        Ok(self.digest_parts(NODE_DOMAIN, &[canonical.as_bytes()]))
    }

    /// Fingerprint an already canonicalized node string.
    pub fn fingerprint_canonical(&self, canonical: &str) -> Fingerprint {
        self.digest_parts(NODE_DOMAIN, &[canonical.as_bytes()])
    }

    /// Roll `parts` (in order) and `own` into one subtree fingerprint.
    pub fn combine(&self, parts: &[Fingerprint], own: &Fingerprint) -> Fingerprint {
        let mut bytes: Vec<&[u8]> = parts.iter().map(Fingerprint::as_bytes).collect();
        bytes.push(own.as_bytes());
        self.digest_parts(SUBTREE_DOMAIN, &bytes)
    }

    fn digest_parts(&self, domain: &str, parts: &[&[u8]]) -> Fingerprint {
        match self.digest {
            DigestKind::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(domain.as_bytes());
                hasher.update(b":");
                for part in parts {
                    hasher.update(part);
                }
                Fingerprint::from_hash(*hasher.finalize().as_bytes())
            }
            DigestKind::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(domain.as_bytes());
                hasher.update(b":");
                for part in parts {
                    hasher.update(part);
                }
                let mut out = [0u8; 32];
                out.copy_from_slice(&hasher.finalize());
                Fingerprint::from_hash(out)
            }
            DigestKind::Rapid64 => {
                let len = domain.len() + 1 + parts.iter().map(|p| p.len()).sum::<usize>();
                let mut buf = Vec::with_capacity(len);
                buf.extend_from_slice(domain.as_bytes());
                buf.push(b':');
                for part in parts {
                    buf.extend_from_slice(part);
                }
                Fingerprint::from_u64(rapidhash::rapidhash(&buf))
            }
        }
    }
}
