//! Date-stepping range lookup over `YYYY-MM-DD` keys.
//!
//! This is not an ordered range scan. It synthesizes every date between the
//! two bounds on a naive calendar (31-day months, 12-month years) and does a
//! point lookup for each one. Days such as `2024-02-30` are visited; real
//! calendar rules are not.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::common::config::{DAYS_PER_MONTH, DAYS_PER_YEAR, MONTHS_PER_YEAR};
use crate::common::{Error, Result};
use crate::index::btree::BTree;

/// A `YYYY-MM-DD` date on the naive 31-day-month calendar.
///
/// # Example
/// ```
/// use rangemap_btree::DateKey;
///
/// let day: DateKey = "2024-01-31".parse().unwrap();
/// assert_eq!(day.next_day().to_string(), "2024-02-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    year: u32,
    month: u32,
    day: u32,
}

impl DateKey {
    /// Parse a key of the exact form `YYYY-MM-DD`.
    ///
    /// # Errors
    /// - `Error::MalformedDateKey` if the text is not ten characters of
    ///   that form, or month/day are outside `01..=12` / `01..=31`
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || Error::MalformedDateKey(text.to_string());

        let bytes = text.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(malformed());
        }
        let digits = |range: std::ops::Range<usize>| -> Result<u32> {
            let part = &text[range];
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse().map_err(|_| malformed())
        };

        let year = digits(0..4)?;
        let month = digits(5..7)?;
        let day = digits(8..10)?;
        if !(1..=MONTHS_PER_YEAR).contains(&month) || !(1..=DAYS_PER_MONTH).contains(&day) {
            return Err(malformed());
        }
        Ok(Self { year, month, day })
    }

    #[inline]
    pub fn year(&self) -> u32 {
        self.year
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }

    #[inline]
    pub fn day(&self) -> u32 {
        self.day
    }

    /// The following day. Day 31 rolls into the next month, month 12 into
    /// the next year.
    pub fn next_day(self) -> Self {
        let Self { mut year, mut month, mut day } = self;
        day += 1;
        if day > DAYS_PER_MONTH {
            day = 1;
            month += 1;
        }
        if month > MONTHS_PER_YEAR {
            month = 1;
            year += 1;
        }
        Self { year, month, day }
    }

    /// Day number on the naive calendar.
    fn ordinal(&self) -> u64 {
        u64::from(self.year) * u64::from(DAYS_PER_YEAR)
            + u64::from(self.month - 1) * u64::from(DAYS_PER_MONTH)
            + u64::from(self.day - 1)
    }

    /// Number of `next_day` steps from `self` to `end`, or `None` if `end`
    /// lies before `self`.
    pub fn steps_until(&self, end: &DateKey) -> Option<usize> {
        end.ordinal()
            .checked_sub(self.ordinal())
            .and_then(|steps| usize::try_from(steps).ok())
    }
}

impl FromStr for DateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DateKey::parse(s)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl<K, V> BTree<K, V>
where
    K: Ord + Borrow<str>,
{
    /// Values of every key from `from` to `to` (inclusive), stepping one
    /// naive day at a time and doing a point lookup per day.
    ///
    /// Results come back in date order. Days without a key are skipped.
    ///
    /// # Errors
    /// - `Error::MalformedDateKey` if either bound is not `YYYY-MM-DD`
    /// - `Error::RangeUnreachable` if `to` comes before `from`
    /// - `Error::RangeTooWide` if the range needs more steps than
    ///   `BTreeConfig::max_range_steps`
    ///
    /// # Example
    /// ```
    /// use rangemap_btree::BTree;
    ///
    /// let mut tree = BTree::new();
    /// tree.add("2024-01-31".to_string(), 1.5);
    /// tree.add("2024-02-01".to_string(), 2.5);
    /// tree.add("2024-03-01".to_string(), 9.0);
    ///
    /// let values = tree.lookup_range("2024-01-30", "2024-02-01").unwrap();
    /// assert_eq!(values, vec![&1.5, &2.5]);
    /// ```
    pub fn lookup_range(&self, from: &str, to: &str) -> Result<Vec<&V>> {
        let start = DateKey::parse(from)?;
        let end = DateKey::parse(to)?;

        let steps = start.steps_until(&end).ok_or_else(|| Error::RangeUnreachable {
            from: from.to_string(),
            to: to.to_string(),
        })?;
        let limit = self.config.max_range_steps;
        if steps > limit {
            return Err(Error::RangeTooWide { steps, limit });
        }
        debug!(from, to, steps, "date-stepping range lookup");

        let mut values = Vec::new();
        let mut day = start;
        for _ in 0..=steps {
            if let Some(value) = self.lookup(day.to_string().as_str()) {
                values.push(value);
            }
            day = day.next_day();
        }
        Ok(values)
    }
}
