//! Index layer.
//!
//! - [`btree`] - The B-tree itself
//! - [`RangeMap`] - The map contract collaborators program against
//! - [`SharedBTree`] - A tree behind one reader-writer lock

pub mod btree;
mod range_map;
mod shared;

pub use range_map::RangeMap;
pub use shared::SharedBTree;
