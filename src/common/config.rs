//! Configuration constants and tree configuration.

use crate::common::{Error, Result};

/// Order used by [`BTreeConfig::default`].
///
/// A node may hold at most `order` entries before it must split.
pub const DEFAULT_ORDER: usize = 3;

/// Smallest order for which split and merge keep every node within its band.
///
/// With `m = 1` the minimum key count `floor(m / 2)` would be zero and a
/// non-root node could be left empty.
pub const MIN_ORDER: usize = 2;

/// Days per month assumed by the date-stepping range lookup.
///
/// This is deliberately not a real calendar: every month has 31 days.
pub const DAYS_PER_MONTH: u32 = 31;

/// Months per year assumed by the date-stepping range lookup.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Days per year under the naive calendar (12 × 31).
pub const DAYS_PER_YEAR: u32 = DAYS_PER_MONTH * MONTHS_PER_YEAR;

/// Default upper bound on the number of synthesized keys per range lookup.
///
/// 100 naive years, i.e. 37,200 point lookups.
pub const DEFAULT_MAX_RANGE_STEPS: usize = 100 * DAYS_PER_YEAR as usize;

/// Construction parameters for a [`BTree`](crate::BTree).
///
/// # Example
/// ```
/// use rangemap_btree::BTreeConfig;
///
/// let config = BTreeConfig::default().with_order(5).with_max_range_steps(1_000);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.min_keys(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BTreeConfig {
    /// Maximum number of entries per node.
    pub order: usize,

    /// Maximum number of day steps a single `lookup_range` may take.
    pub max_range_steps: usize,
}

impl BTreeConfig {
    /// Create a configuration with the given order and default range bound.
    pub fn new(order: usize) -> Self {
        Self {
            order,
            max_range_steps: DEFAULT_MAX_RANGE_STEPS,
        }
    }

    /// Set the order.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Set the range step bound.
    pub fn with_max_range_steps(mut self, steps: usize) -> Self {
        self.max_range_steps = steps;
        self
    }

    /// Minimum number of entries a non-root node must hold.
    #[inline]
    pub fn min_keys(&self) -> usize {
        self.order / 2
    }

    /// Check that the configuration describes a usable tree.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < MIN_ORDER`
    pub fn validate(&self) -> Result<()> {
        if self.order < MIN_ORDER {
            return Err(Error::InvalidOrder {
                order: self.order,
                min: MIN_ORDER,
            });
        }
        Ok(())
    }
}

impl Default for BTreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_per_year() {
        assert_eq!(DAYS_PER_YEAR, 372);
        assert_eq!(DEFAULT_MAX_RANGE_STEPS, 37_200);
    }

    #[test]
    fn test_default_config() {
        let config = BTreeConfig::default();
        assert_eq!(config.order, DEFAULT_ORDER);
        assert_eq!(config.min_keys(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_keys_rounds_down() {
        assert_eq!(BTreeConfig::new(2).min_keys(), 1);
        assert_eq!(BTreeConfig::new(4).min_keys(), 2);
        assert_eq!(BTreeConfig::new(7).min_keys(), 3);
    }

    #[test]
    fn test_invalid_order() {
        for order in 0..MIN_ORDER {
            match BTreeConfig::new(order).validate() {
                Err(Error::InvalidOrder { order: o, min }) => {
                    assert_eq!(o, order);
                    assert_eq!(min, MIN_ORDER);
                }
                other => panic!("Expected InvalidOrder, got {:?}", other),
            }
        }
    }
}
