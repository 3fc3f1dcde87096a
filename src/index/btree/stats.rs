//! Structural event counters.

use std::fmt;

/// Counts of the rebalancing work the tree has done.
///
/// Every mutation goes through `&mut BTree`, so plain counters are enough;
/// callers get a copy from [`BTree::stats`](crate::BTree::stats).
///
/// # Example
/// ```
/// use rangemap_btree::BTree;
///
/// let mut tree = BTree::new();
/// for k in [10, 20, 30, 40] {
///     tree.add(k, k);
/// }
/// assert_eq!(tree.stats().root_splits, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Node splits on insert, including root splits.
    pub splits: u64,

    /// Splits of the root, each of which grew the tree by one level.
    pub root_splits: u64,

    /// Entries borrowed from a sibling on delete.
    pub borrows: u64,

    /// Sibling merges on delete.
    pub merges: u64,

    /// Times an emptied root was replaced by its only child.
    pub root_collapses: u64,
}

impl TreeStats {
    /// Create a stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of rebalancing operations.
    pub fn total(&self) -> u64 {
        self.splits + self.borrows + self.merges + self.root_collapses
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ splits: {}, root_splits: {}, borrows: {}, merges: {}, root_collapses: {} }}",
            self.splits, self.root_splits, self.borrows, self.merges, self.root_collapses
        )
    }
}
