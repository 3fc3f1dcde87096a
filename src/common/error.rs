//! Error types for the B-tree index.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All recoverable errors surfaced by the index.
///
/// Absent keys are not errors: `lookup` returns `None` and `remove`
/// returns `None`/`false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The tree was configured with an order too small to rebalance.
    #[error("Invalid order {order}: must be at least {min}")]
    InvalidOrder { order: usize, min: usize },

    /// A range bound did not parse as `YYYY-MM-DD`.
    #[error("Malformed date key: {0:?}")]
    MalformedDateKey(String),

    /// Forward day-stepping from `from` never reaches `to`.
    #[error("Range end {to} is not reachable from {from}")]
    RangeUnreachable { from: String, to: String },

    /// The range would take more steps than the configured bound.
    #[error("Range spans {steps} steps, limit is {limit}")]
    RangeTooWide { steps: usize, limit: usize },

    /// A structural invariant does not hold.
    ///
    /// Only produced by `BTree::validate`. Seeing this indicates a bug.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}
