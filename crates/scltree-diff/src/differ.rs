//! Tree diff: classify every node of two trees as matched, removed, added
//! or changed.
//!
//! Both trees are indexed by subtree fingerprint. Nodes are then paired in
//! three passes:
//!
//! 1. **Buckets.** Nodes sharing an effective fingerprint are paired. A
//!    bucket with one node per side is trusted unless verification is on or
//!    the pair is Private-scoped; larger buckets are partitioned with the
//!    structural matcher.
//! 2. **Reorder.** Leftover source nodes that structurally equal a leftover
//!    target node (sibling order aside) are matched.
//! 3. **Correspondence.** Walking the source top-down, a leftover node whose
//!    parent is paired is paired with the first leftover child of the
//!    parent's counterpart that has the same identity. Equal own content
//!    makes the pair matched; otherwise it is changed.
//!
//! Whatever remains is removed (source) or added (target).

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use scltree_index::{FingerprintIndex, SubtreeAggregator};
use scltree_types::{Fingerprint, TreeView};

use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult, Side};
use crate::matcher::StructuralMatcher;
use crate::report::DiffReport;

/// Compares element trees according to a [`DiffConfig`].
#[derive(Clone, Debug, Default)]
pub struct TreeDiffer {
    config: DiffConfig,
}

impl TreeDiffer {
    /// Create a differ with the given configuration.
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Index both trees and classify their nodes.
    ///
    /// Fails if either tree cannot be indexed (no root, guard exceeded).
    pub fn diff<A, B>(&self, source: &A, target: &B) -> DiffResult<DiffReport<A::NodeId, B::NodeId>>
    where
        A: TreeView + Sync + ?Sized,
        B: TreeView + Sync + ?Sized,
    {
        let (source_index, target_index) = self.index_both(source, target)?;
        Ok(self.diff_indexed(source, &source_index, target, &target_index))
    }

    /// Classify nodes using indexes built beforehand.
    ///
    /// Both indexes must come from the given trees with the same digest.
    pub fn diff_indexed<A, B>(
        &self,
        source: &A,
        source_index: &FingerprintIndex<A::NodeId>,
        target: &B,
        target_index: &FingerprintIndex<B::NodeId>,
    ) -> DiffReport<A::NodeId, B::NodeId>
    where
        A: TreeView + ?Sized,
        B: TreeView + ?Sized,
    {
        let matcher = StructuralMatcher::new(source, target).with_private_tag(&self.config.private_tag);
        let mut classifier = Classifier {
            matcher,
            source,
            target,
            source_index,
            target_index,
            verify: self.config.needs_verification(),
            pairs: BTreeMap::new(),
            matched: Vec::new(),
            changed: Vec::new(),
            removed: BTreeSet::new(),
            added: BTreeSet::new(),
        };

        classifier.pair_buckets();
        debug!(
            matched = classifier.matched.len(),
            changed = classifier.changed.len(),
            removed = classifier.removed.len(),
            added = classifier.added.len(),
            "bucket pass"
        );
        classifier.pair_reordered();
        classifier.pair_corresponding();

        let report = classifier.finish();
        debug!(summary = %report.summary(), "diff complete");
        report
    }

    fn index_both<A, B>(
        &self,
        source: &A,
        target: &B,
    ) -> DiffResult<(FingerprintIndex<A::NodeId>, FingerprintIndex<B::NodeId>)>
    where
        A: TreeView + Sync + ?Sized,
        B: TreeView + Sync + ?Sized,
    {
        let aggregator = SubtreeAggregator::new(self.config.index.clone());
        let (left, right) = if self.config.parallel {
            rayon::join(|| aggregator.aggregate(source), || aggregator.aggregate(target))
        } else {
            (aggregator.aggregate(source), aggregator.aggregate(target))
        };

        let left = left.map_err(|source| DiffError::Index {
            side: Side::Source,
            source,
        })?;
        let right = right.map_err(|source| DiffError::Index {
            side: Side::Target,
            source,
        })?;
        Ok((left, right))
    }
}

/// Diff two trees with the default configuration.
pub fn diff<A, B>(source: &A, target: &B) -> DiffResult<DiffReport<A::NodeId, B::NodeId>>
where
    A: TreeView + Sync + ?Sized,
    B: TreeView + Sync + ?Sized,
{
    TreeDiffer::default().diff(source, target)
}

/// Working state of one diff.
struct Classifier<'a, A: TreeView + ?Sized, B: TreeView + ?Sized> {
    matcher: StructuralMatcher<'a, A, B>,
    source: &'a A,
    target: &'a B,
    source_index: &'a FingerprintIndex<A::NodeId>,
    target_index: &'a FingerprintIndex<B::NodeId>,
    verify: bool,
    /// Source node -> its matched or changed counterpart.
    pairs: BTreeMap<A::NodeId, B::NodeId>,
    matched: Vec<(A::NodeId, B::NodeId)>,
    changed: Vec<(A::NodeId, B::NodeId)>,
    /// Unpaired source nodes.
    removed: BTreeSet<A::NodeId>,
    /// Unpaired target nodes.
    added: BTreeSet<B::NodeId>,
}

impl<'a, A: TreeView + ?Sized, B: TreeView + ?Sized> Classifier<'a, A, B> {
    // ---------------------------------------------------------------
    // Pass 1: fingerprint buckets
    // ---------------------------------------------------------------

    fn pair_buckets(&mut self) {
        let source_index = self.source_index;
        let target_index = self.target_index;

        let mut seen: BTreeSet<Fingerprint> = BTreeSet::new();
        for &node in source_index.traversal_order() {
            let Some(key) = source_index.effective_of(node) else {
                continue;
            };
            if !seen.insert(key) {
                continue;
            }
            let left = source_index.lookup(&key);
            let right = target_index.lookup(&key);
            match (left, right) {
                (_, []) => self.removed.extend(left.iter().copied()),
                ([a], [b]) => {
                    // Private content is compared verbatim; fingerprints trim text.
                    let check = self.verify || self.matcher.is_private_pair(*a, *b);
                    if !check || self.matcher.is_structurally_equal(*a, *b) {
                        self.record_matched(*a, *b);
                    } else {
                        self.record_changed(*a, *b);
                    }
                }
                _ => self.partition(left, right),
            }
        }

        for &node in target_index.traversal_order() {
            let shared = target_index
                .effective_of(node)
                .is_some_and(|key| source_index.contains(&key));
            if !shared {
                self.added.insert(node);
            }
        }
    }

    /// Greedily pair nodes of one shared bucket by structural equality.
    fn partition(&mut self, left: &[A::NodeId], right: &[B::NodeId]) {
        let mut claimed = vec![false; right.len()];
        for &a in left {
            let found = (0..right.len()).find(|&i| !claimed[i] && self.matcher.is_structurally_equal(a, right[i]));
            match found {
                Some(i) => {
                    claimed[i] = true;
                    self.record_matched(a, right[i]);
                }
                None => {
                    self.removed.insert(a);
                }
            }
        }
        for (i, &b) in right.iter().enumerate() {
            if !claimed[i] {
                self.added.insert(b);
            }
        }
    }

    // ---------------------------------------------------------------
    // Pass 2: reordered subtrees
    // ---------------------------------------------------------------

    fn pair_reordered(&mut self) {
        if self.removed.is_empty() || self.added.is_empty() {
            return;
        }
        let sources: Vec<A::NodeId> = self.ordered_removed();
        let targets: Vec<B::NodeId> = self.ordered_added();

        for a in sources {
            let found = targets
                .iter()
                .copied()
                .find(|b| self.added.contains(b) && self.matcher.is_structurally_equal(a, *b));
            if let Some(b) = found {
                self.removed.remove(&a);
                self.added.remove(&b);
                self.record_matched(a, b);
            }
        }
    }

    // ---------------------------------------------------------------
    // Pass 3: identity correspondence under paired parents
    // ---------------------------------------------------------------

    fn pair_corresponding(&mut self) {
        let Some(root) = self.source.root() else {
            return;
        };

        let mut stack = vec![root];
        while let Some(a) = stack.pop() {
            if self.removed.contains(&a) {
                if let Some(b) = self.counterpart(a) {
                    self.removed.remove(&a);
                    self.added.remove(&b);
                    if self.own_equal(a, b) && !self.matcher.is_private_pair(a, b) {
                        self.record_matched(a, b);
                    } else {
                        self.record_changed(a, b);
                    }
                }
            }
            let mut children: Vec<A::NodeId> = self.source.children(a).collect();
            children.reverse();
            stack.extend(children);
        }
    }

    /// Unpaired target node corresponding to `a`, preferring equal own content.
    fn counterpart(&self, a: A::NodeId) -> Option<B::NodeId> {
        let candidates: Vec<B::NodeId> = match self.source.parent(a) {
            Some(parent) => match self.pairs.get(&parent) {
                Some(&counterpart) => self.target.children(counterpart).collect(),
                None => return None,
            },
            None => self.target.root().into_iter().collect(),
        };

        let mut same_identity = candidates
            .into_iter()
            .filter(|b| self.added.contains(b) && self.matcher.is_same_identity(a, *b))
            .peekable();
        let first = *same_identity.peek()?;
        Some(same_identity.find(|b| self.own_equal(a, *b)).unwrap_or(first))
    }

    fn own_equal(&self, a: A::NodeId, b: B::NodeId) -> bool {
        let own_a = self.source_index.fingerprints_of(a).map(|f| f.own);
        let own_b = self.target_index.fingerprints_of(b).map(|f| f.own);
        own_a.is_some() && own_a == own_b
    }

    // ---------------------------------------------------------------
    // Bookkeeping
    // ---------------------------------------------------------------

    fn record_matched(&mut self, a: A::NodeId, b: B::NodeId) {
        self.pairs.insert(a, b);
        self.matched.push((a, b));
    }

    fn record_changed(&mut self, a: A::NodeId, b: B::NodeId) {
        self.pairs.insert(a, b);
        self.changed.push((a, b));
    }

    fn ordered_removed(&self) -> Vec<A::NodeId> {
        self.source_index
            .traversal_order()
            .iter()
            .copied()
            .filter(|a| self.removed.contains(a))
            .collect()
    }

    fn ordered_added(&self) -> Vec<B::NodeId> {
        self.target_index
            .traversal_order()
            .iter()
            .copied()
            .filter(|b| self.added.contains(b))
            .collect()
    }

    fn finish(self) -> DiffReport<A::NodeId, B::NodeId> {
        let removed = self.ordered_removed();
        let added = self.ordered_added();
        DiffReport::new(self.matched, removed, added, self.changed)
    }
}
