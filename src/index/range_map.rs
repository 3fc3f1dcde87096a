//! The ordered-map contract offered to collaborators.

use std::borrow::Borrow;

use crate::common::Result;
use crate::index::btree::BTree;

/// An ordered map with a date-stepping range lookup.
///
/// This is the narrow surface a wrapper, driver or test harness programs
/// against. `lookup_range` assumes keys render as `YYYY-MM-DD`; see
/// [`BTree::lookup_range`] for the stepping rules.
///
/// # Example
/// ```
/// use rangemap_btree::{BTree, RangeMap};
///
/// fn record<M: RangeMap<String, u32>>(map: &mut M) {
///     map.add("2024-05-01".to_string(), 7);
///     map.add("2024-05-02".to_string(), 8);
/// }
///
/// let mut tree = BTree::new();
/// record(&mut tree);
///
/// assert_eq!(RangeMap::size(&tree), 2);
/// let from = "2024-05-01".to_string();
/// let to = "2024-05-02".to_string();
/// assert_eq!(RangeMap::lookup_range(&tree, &from, &to).unwrap(), vec![&7, &8]);
/// assert!(RangeMap::remove(&mut tree, &from));
/// assert!(!RangeMap::remove(&mut tree, &from));
/// ```
pub trait RangeMap<K, V> {
    /// Number of distinct keys.
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Insert, or overwrite the value of an existing key.
    fn add(&mut self, key: K, value: V);

    fn contains(&self, key: &K) -> bool;

    /// Value stored under `key`, or `None` if absent.
    fn lookup(&self, key: &K) -> Option<&V>;

    /// Values for the keys from `from` to `to`, inclusive, in key order.
    fn lookup_range(&self, from: &K, to: &K) -> Result<Vec<&V>>;

    /// Remove `key`. Returns whether a key was actually removed.
    fn remove(&mut self, key: &K) -> bool;
}

impl<K, V> RangeMap<K, V> for BTree<K, V>
where
    K: Ord + Borrow<str>,
{
    fn size(&self) -> usize {
        self.len()
    }

    fn is_empty(&self) -> bool {
        BTree::is_empty(self)
    }

    fn add(&mut self, key: K, value: V) {
        BTree::add(self, key, value);
    }

    fn contains(&self, key: &K) -> bool {
        BTree::contains::<K>(self, key)
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        BTree::lookup::<K>(self, key)
    }

    fn lookup_range(&self, from: &K, to: &K) -> Result<Vec<&V>> {
        let from: &str = from.borrow();
        let to: &str = to.borrow();
        BTree::lookup_range(self, from, to)
    }

    fn remove(&mut self, key: &K) -> bool {
        BTree::remove::<K>(self, key).is_some()
    }
}
