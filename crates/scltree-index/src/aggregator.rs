//! Post-order subtree aggregation.
//!
//! The traversal keeps one *depth frame* per level on the current
//! root-to-node path. Each visited node appends its effective fingerprint to
//! the frame of its depth. When the traversal climbs back to a shallower
//! level, every deeper frame is closed: its entries are concatenated in
//! traversal order, combined with the current node's own fingerprint, and
//! cleared. The combined value becomes the node's effective fingerprint.
//!
//! # Invariants
//!
//! - Frames exist only for depths on the current path.
//! - A deeper frame is cleared exactly once per ascent past its depth.
//! - A leaf never closes a frame, so its effective fingerprint is its own.
//! - All state lives in a [`Traversal`] owned by one `aggregate` call.

use tracing::{debug, trace};

use scltree_hash::NodeHasher;
use scltree_types::{Fingerprint, TreeView};

use crate::config::IndexConfig;
use crate::error::{IndexError, IndexResult};
use crate::fingerprint_index::{FingerprintIndex, NodeFingerprints};

/// Builds a [`FingerprintIndex`] from a tree in one post-order traversal.
#[derive(Clone, Debug, Default)]
pub struct SubtreeAggregator {
    config: IndexConfig,
}

impl SubtreeAggregator {
    /// Create an aggregator with the given configuration.
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Fingerprint every node of `tree` and index it under its effective
    /// fingerprint.
    ///
    /// Fails with [`IndexError::InvalidInput`] if the tree has no root or
    /// breaks a depth/node guard, and with [`IndexError::Fingerprint`] if a
    /// node cannot be hashed. No partial index is returned on failure.
    pub fn aggregate<T: TreeView + ?Sized>(&self, tree: &T) -> IndexResult<FingerprintIndex<T::NodeId>> {
        let root = tree
            .root()
            .ok_or_else(|| IndexError::InvalidInput("tree has no root element".into()))?;

        let hasher = self.config.hasher();
        let mut traversal = Traversal::new(&hasher, &self.config);
        traversal.visit(tree, root, 0)?;

        let mut index = traversal.index;
        index.set_root(root);

        debug!(
            digest = %self.config.digest,
            nodes = index.node_count(),
            keys = index.len(),
            collisions = index.collisions().count(),
            root = %index.root_fingerprint().map(|f| f.short_hex()).unwrap_or_default(),
            "aggregated tree"
        );
        Ok(index)
    }
}

/// Aggregate a tree with the default configuration.
pub fn aggregate<T: TreeView + ?Sized>(tree: &T) -> IndexResult<FingerprintIndex<T::NodeId>> {
    SubtreeAggregator::default().aggregate(tree)
}

/// Per-call traversal state.
struct Traversal<'a, Id> {
    hasher: &'a NodeHasher,
    config: &'a IndexConfig,
    /// `frames[d]`: fingerprints accumulated at depth `d` since it was last closed.
    frames: Vec<Vec<Fingerprint>>,
    previous_depth: Option<usize>,
    visited: usize,
    index: FingerprintIndex<Id>,
}

impl<'a, Id: Copy + Ord> Traversal<'a, Id> {
    fn new(hasher: &'a NodeHasher, config: &'a IndexConfig) -> Self {
        Self {
            hasher,
            config,
            frames: Vec::new(),
            previous_depth: None,
            visited: 0,
            index: FingerprintIndex::new(config.digest),
        }
    }

    fn visit<T>(&mut self, tree: &T, node: Id, depth: usize) -> IndexResult<()>
    where
        T: TreeView<NodeId = Id> + ?Sized,
    {
        if depth > self.config.max_depth {
            return Err(IndexError::InvalidInput(format!(
                "tree is deeper than {} levels",
                self.config.max_depth
            )));
        }

        for child in tree.children(node) {
            self.visit(tree, child, depth + 1)?;
        }

        self.visited += 1;
        if self.visited > self.config.max_nodes {
            return Err(IndexError::InvalidInput(format!(
                "tree has more than {} nodes",
                self.config.max_nodes
            )));
        }

        let own = self.hasher.fingerprint(tree, node)?;
        let effective = match self.previous_depth {
            Some(previous) if previous > depth => {
                let pending = self.close_frames_below(depth);
                self.hasher.combine(&pending, &own)
            }
            _ => own,
        };

        self.frame_at(depth).push(effective);
        self.index.record(
            node,
            NodeFingerprints {
                own,
                effective,
                depth,
            },
        );
        self.previous_depth = Some(depth);

        trace!(depth, own = %own.short_hex(), effective = %effective.short_hex(), "fingerprinted node");
        Ok(())
    }

    /// Drain every frame deeper than `depth`, shallowest first.
    fn close_frames_below(&mut self, depth: usize) -> Vec<Fingerprint> {
        let start = (depth + 1).min(self.frames.len());
        self.frames.drain(start..).flatten().collect()
    }

    fn frame_at(&mut self, depth: usize) -> &mut Vec<Fingerprint> {
        if self.frames.len() <= depth {
            self.frames.resize_with(depth + 1, Vec::new);
        }
        &mut self.frames[depth]
    }
}
