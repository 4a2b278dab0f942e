use std::fmt;

use serde::Serialize;

/// Classification of every node of two compared trees.
///
/// Each source node appears exactly once among `matched`, `changed` (left
/// side) and `removed`; each target node exactly once among `matched`,
/// `changed` (right side) and `added`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffReport<A, B = A> {
    matched: Vec<(A, B)>,
    removed: Vec<A>,
    added: Vec<B>,
    changed: Vec<(A, B)>,
}

impl<A, B> DiffReport<A, B> {
    pub(crate) fn new(matched: Vec<(A, B)>, removed: Vec<A>, added: Vec<B>, changed: Vec<(A, B)>) -> Self {
        Self {
            matched,
            removed,
            added,
            changed,
        }
    }

    /// Pairs considered the same element with equivalent content.
    pub fn matched(&self) -> &[(A, B)] {
        &self.matched
    }

    /// Source nodes with no counterpart in the target.
    pub fn removed(&self) -> &[A] {
        &self.removed
    }

    /// Target nodes with no counterpart in the source.
    pub fn added(&self) -> &[B] {
        &self.added
    }

    /// Pairs that correspond to each other but whose content differs.
    pub fn changed(&self) -> &[(A, B)] {
        &self.changed
    }

    /// Returns `true` if nothing was removed, added or changed.
    pub fn is_identical(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.changed.is_empty()
    }

    /// Bucket sizes.
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            matched: self.matched.len(),
            removed: self.removed.len(),
            added: self.added.len(),
            changed: self.changed.len(),
        }
    }
}

/// Bucket sizes of a [`DiffReport`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub matched: usize,
    pub removed: usize,
    pub added: usize,
    pub changed: usize,
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} matched, {} removed, {} added, {} changed",
            self.matched, self.removed, self.added, self.changed
        )
    }
}
