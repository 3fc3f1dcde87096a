//! rangemap-btree - A fixed-order B-tree index for ordered key-value data.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Collaborators                               │
//! │        wrapper / driver / test harness  (out of scope)          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │            Map Contract (index::RangeMap)                │   │
//! │  │  size · add · contains · lookup · lookupRange · remove   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │        Locking (index::SharedBTree)  [optional]          │   │
//! │  │         one RwLock: writers exclusive, readers shared    │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               B-tree Core (index::btree)                 │   │
//! │  │   locate → insert + split  |  remove + borrow/merge      │   │
//! │  │        Node arena · Entry · Locator · TreeStats          │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`index`] - The B-tree, its map contract and the locked wrapper
//!
//! # Quick Start
//! ```
//! use rangemap_btree::BTree;
//!
//! let mut tree = BTree::new();
//! tree.add("2024-01-29".to_string(), 10);
//! tree.add("2024-01-30".to_string(), 20);
//! tree.add("2024-02-01".to_string(), 40);
//!
//! assert_eq!(tree.lookup("2024-01-30"), Some(&20));
//! assert_eq!(
//!     tree.lookup_range("2024-01-29", "2024-02-01").unwrap(),
//!     vec![&10, &20, &40]
//! );
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_ORDER, MIN_ORDER};
pub use common::{BTreeConfig, Error, NodeId, Result};

pub use index::btree::{BTree, DateKey, Entry, Locator, Node, TreeStats};
pub use index::{RangeMap, SharedBTree};
