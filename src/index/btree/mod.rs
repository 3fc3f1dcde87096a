//! B-tree index implementation.
//!
//! An in-memory B-tree of fixed order `m`:
//! - every node holds at most `m` entries,
//! - every non-root node holds at least `floor(m / 2)`,
//! - all leaves are at the same depth.
//!
//! # Components
//! - [`BTree`] - The tree: search, insert (split), delete (borrow/merge)
//! - [`Node`] - Ordered entries plus child links and a parent link
//! - [`Entry`] - A key/value pair
//! - [`Locator`] - Search result: where a key is or would go
//! - [`DateKey`] - Naive `YYYY-MM-DD` stepping for `lookup_range`
//! - [`TreeStats`] - Split/borrow/merge counters

mod arena;
mod delete;
mod entry;
mod insert;
mod node;
mod range;
mod stats;
mod tree;

pub use entry::Entry;
pub use node::Node;
pub use range::DateKey;
pub use stats::TreeStats;
pub use tree::{BTree, Locator};
