//! Closed intervals of addresses.

use std::{fmt, ops::RangeInclusive};

use crate::addr::{to_ipv4, Addr};

/// A closed interval of addresses.
///
/// An interval with `low > high` is empty. The parser can produce these from reversed dashed
/// ranges, and they are covered by any set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    /// The lowest address in the interval.
    pub low: Addr,
    /// The highest address in the interval.
    pub high: Addr,
}

impl Interval {
    /// The whole address space.
    pub const FULL: Interval = Interval::new(0, Addr::MAX);

    /// Returns a new interval.
    pub const fn new(low: Addr, high: Addr) -> Self {
        Self { low, high }
    }

    /// Returns an interval containing a single address.
    pub const fn single(addr: Addr) -> Self {
        Self::new(addr, addr)
    }

    /// Returns `true` if the interval contains no addresses.
    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }

    /// Returns `true` if the interval contains the given address.
    pub fn contains(&self, addr: &Addr) -> bool {
        self.low <= *addr && *addr <= self.high
    }

    /// Returns the number of addresses in the interval.
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            u64::from(self.high - self.low) + 1
        }
    }

    /// Returns an iterator over the addresses in the interval.
    pub fn addrs(&self) -> RangeInclusive<Addr> {
        self.low..=self.high
    }
}

impl From<RangeInclusive<Addr>> for Interval {
    fn from(range: RangeInclusive<Addr>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}

impl From<Interval> for RangeInclusive<Addr> {
    fn from(interval: Interval) -> Self {
        interval.addrs()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", to_ipv4(self.low))
        } else {
            write!(f, "{}-{}", to_ipv4(self.low), to_ipv4(self.high))
        }
    }
}
