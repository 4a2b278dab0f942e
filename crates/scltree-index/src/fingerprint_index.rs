//! The fingerprint-to-node multimap built by one traversal.
//!
//! [`FingerprintIndex`] keeps a `BTreeMap<Fingerprint, Vec<Id>>`. Keys iterate
//! in fingerprint order and each bucket keeps insertion (post-order) order,
//! so rebuilding the index from an unmodified tree reproduces it exactly.
//! Buckets with more than one node are expected: identical subtrees share a
//! fingerprint, and narrow digests collide.

use std::collections::BTreeMap;

use scltree_types::{DigestKind, Fingerprint};

/// Fingerprints recorded for one node during aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeFingerprints {
    /// Digest of the node's own content.
    pub own: Fingerprint,
    /// Digest of the node's whole subtree (equals `own` for leaves).
    pub effective: Fingerprint,
    /// Depth of the node (root = 0).
    pub depth: usize,
}

/// Multimap from fingerprint to the nodes producing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FingerprintIndex<Id> {
    digest: DigestKind,
    buckets: BTreeMap<Fingerprint, Vec<Id>>,
    nodes: BTreeMap<Id, NodeFingerprints>,
    order: Vec<Id>,
    root: Option<Id>,
}

impl<Id: Copy + Ord> FingerprintIndex<Id> {
    /// Create an empty index for fingerprints of the given digest.
    pub fn new(digest: DigestKind) -> Self {
        Self {
            digest,
            buckets: BTreeMap::new(),
            nodes: BTreeMap::new(),
            order: Vec::new(),
            root: None,
        }
    }

    /// Digest the fingerprints were produced with.
    pub fn digest(&self) -> DigestKind {
        self.digest
    }

    /// Number of distinct fingerprints.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `true` if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of node entries across all buckets.
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    // ---------------------------------------------------------------
    // Build
    // ---------------------------------------------------------------

    /// File `node` under `fingerprint`, after any nodes already there.
    pub fn insert(&mut self, fingerprint: Fingerprint, node: Id) {
        self.buckets.entry(fingerprint).or_default().push(node);
        self.order.push(node);
    }

    /// Insert a node with its full fingerprint record.
    pub(crate) fn record(&mut self, node: Id, fingerprints: NodeFingerprints) {
        self.insert(fingerprints.effective, node);
        self.nodes.insert(node, fingerprints);
    }

    pub(crate) fn set_root(&mut self, root: Id) {
        self.root = Some(root);
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Nodes filed under `fingerprint`, in insertion order. Empty if absent.
    pub fn lookup(&self, fingerprint: &Fingerprint) -> &[Id] {
        self.buckets
            .get(fingerprint)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns `true` if any node carries `fingerprint`.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.buckets.contains_key(fingerprint)
    }

    /// All fingerprints, ascending.
    pub fn keys(&self) -> impl Iterator<Item = &Fingerprint> + '_ {
        self.buckets.keys()
    }

    /// All buckets, ascending by fingerprint.
    pub fn buckets(&self) -> impl Iterator<Item = (&Fingerprint, &[Id])> + '_ {
        self.buckets.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Buckets holding more than one node.
    pub fn collisions(&self) -> impl Iterator<Item = (&Fingerprint, &[Id])> + '_ {
        self.buckets().filter(|(_, nodes)| nodes.len() > 1)
    }

    /// Own and effective fingerprint of a node, if it was aggregated.
    pub fn fingerprints_of(&self, node: Id) -> Option<&NodeFingerprints> {
        self.nodes.get(&node)
    }

    /// Effective fingerprint of a node, if it was aggregated.
    pub fn effective_of(&self, node: Id) -> Option<Fingerprint> {
        self.nodes.get(&node).map(|f| f.effective)
    }

    /// Nodes in the order they were inserted (post-order for aggregated trees).
    pub fn traversal_order(&self) -> &[Id] {
        &self.order
    }

    /// Root of the aggregated tree.
    pub fn root(&self) -> Option<Id> {
        self.root
    }

    /// Effective fingerprint of the root: the fingerprint of the whole tree.
    pub fn root_fingerprint(&self) -> Option<Fingerprint> {
        self.root.and_then(|r| self.effective_of(r))
    }
}
