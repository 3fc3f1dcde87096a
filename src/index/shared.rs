//! Lock-guarded tree for multi-threaded callers.

use std::borrow::Borrow;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::Result;
use crate::index::btree::BTree;

/// A [`BTree`] behind a single reader-writer lock.
///
/// Split and merge break invariants mid-operation, so every mutation takes
/// the write lock for its whole duration. Lookups share the read lock and
/// only ever see a complete tree.
///
/// # Thread Safety
/// - `tree`: `RwLock`: many readers, one writer
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use rangemap_btree::SharedBTree;
///
/// let shared = Arc::new(SharedBTree::<u32, u32>::default());
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let shared = Arc::clone(&shared);
///         thread::spawn(move || {
///             for k in 0..100 {
///                 shared.add(t * 100 + k, k);
///             }
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
/// assert_eq!(shared.len(), 400);
/// ```
pub struct SharedBTree<K, V> {
    tree: RwLock<BTree<K, V>>,
}

impl<K, V> SharedBTree<K, V> {
    /// Wrap an existing tree.
    pub fn new(tree: BTree<K, V>) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    /// Shared access for several reads against one consistent tree.
    pub fn read(&self) -> RwLockReadGuard<'_, BTree<K, V>> {
        self.tree.read()
    }

    /// Exclusive access for a batch of mutations.
    pub fn write(&self) -> RwLockWriteGuard<'_, BTree<K, V>> {
        self.tree.write()
    }

    pub fn into_inner(self) -> BTree<K, V> {
        self.tree.into_inner()
    }
}

impl<K: Ord, V> SharedBTree<K, V> {
    pub fn add(&self, key: K, value: V) -> Option<V> {
        self.tree.write().add(key, value)
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.write().remove(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.read().contains(key)
    }

    /// Copy of the value under `key`.
    ///
    /// The read lock is released on return, so the value is cloned out.
    pub fn lookup<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
        V: Clone,
    {
        self.tree.read().lookup(key).cloned()
    }
}

impl<K, V> SharedBTree<K, V>
where
    K: Ord + Borrow<str>,
    V: Clone,
{
    /// See [`BTree::lookup_range`]. Values are cloned out of the read lock.
    ///
    /// # Errors
    /// Same as [`BTree::lookup_range`].
    pub fn lookup_range(&self, from: &str, to: &str) -> Result<Vec<V>> {
        let tree = self.tree.read();
        let values = tree.lookup_range(from, to)?;
        Ok(values.into_iter().cloned().collect())
    }
}

impl<K, V> Default for SharedBTree<K, V> {
    fn default() -> Self {
        Self::new(BTree::new())
    }
}

impl<K, V> From<BTree<K, V>> for SharedBTree<K, V> {
    fn from(tree: BTree<K, V>) -> Self {
        Self::new(tree)
    }
}
