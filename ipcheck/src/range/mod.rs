//! Sets of address intervals.

mod merge;
mod subset;

pub use subset::{Subset, Uncovered};

use crate::{Addr, Interval};

/// An ordered sequence of intervals, as parsed from an input.
///
/// Intervals are kept in input order and are neither deduplicated nor merged. Duplicate,
/// overlapping and empty intervals are all allowed.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RangeSet {
    intervals: Vec<Interval>,
}

impl RangeSet {
    /// Returns a new set of the given intervals.
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    /// Returns the intervals of the set.
    pub fn into_inner(self) -> Vec<Interval> {
        self.intervals
    }

    /// Returns an iterator over the intervals of the set, in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Returns the number of intervals in the set.
    pub fn len_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the set covers no addresses.
    pub fn is_empty(&self) -> bool {
        self.intervals.iter().all(Interval::is_empty)
    }

    /// Returns `true` if any interval of the set contains the given address.
    pub fn contains(&self, addr: &Addr) -> bool {
        self.intervals.iter().any(|interval| interval.contains(addr))
    }

    /// Returns the merged form of the set.
    pub fn merged(&self) -> MergedSet {
        MergedSet::from(self)
    }
}

impl From<Vec<Interval>> for RangeSet {
    fn from(intervals: Vec<Interval>) -> Self {
        Self::new(intervals)
    }
}

impl<const N: usize> From<[Interval; N]> for RangeSet {
    fn from(intervals: [Interval; N]) -> Self {
        Self::new(Vec::from(intervals))
    }
}

impl FromIterator<Interval> for RangeSet {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A set of addresses represented using merged intervals.
///
/// # Invariants
///
/// `MergedSet` enforces the following invariants on the intervals it contains:
///
/// - The intervals are sorted.
/// - The intervals are non-adjacent.
/// - The intervals are non-intersecting.
/// - The intervals are non-empty.
///
/// This is enforced in the constructor.
///
/// # Examples
///
/// ```
/// use ipcheck::{Interval, MergedSet, RangeSet};
///
/// let set = RangeSet::from([
///     Interval::new(30, 40),
///     Interval::new(10, 20),
///     Interval::new(21, 25),
///     Interval::new(35, 50),
/// ]);
///
/// let merged = set.merged();
/// assert_eq!(
///     merged.into_inner(),
///     vec![Interval::new(10, 25), Interval::new(30, 50)]
/// );
/// ```
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<Interval>", into = "Vec<Interval>")
)]
pub struct MergedSet {
    /// The intervals of the set.
    ///
    /// The intervals *MUST* be sorted, non-adjacent, non-intersecting, and non-empty.
    intervals: Vec<Interval>,
}

impl MergedSet {
    /// Returns the intervals of the set.
    pub fn into_inner(self) -> Vec<Interval> {
        self.intervals
    }

    /// Returns an iterator over the intervals of the set, in ascending order.
    pub fn iter_intervals(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Returns the number of intervals in the set.
    pub fn len_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// Returns the number of addresses in the set.
    pub fn len(&self) -> u64 {
        self.intervals.iter().map(Interval::len).sum()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns `true` if the set contains the given address.
    pub fn contains(&self, addr: &Addr) -> bool {
        self.position(addr).is_some()
    }

    /// Returns the minimum address in the set, or `None` if the set is empty.
    pub fn min(&self) -> Option<Addr> {
        self.intervals.first().map(|interval| interval.low)
    }

    /// Returns the maximum address in the set, or `None` if the set is empty.
    pub fn max(&self) -> Option<Addr> {
        self.intervals.last().map(|interval| interval.high)
    }

    /// Returns the index of the interval containing the given address.
    fn position(&self, addr: &Addr) -> Option<usize> {
        let idx = self
            .intervals
            .partition_point(|interval| interval.high < *addr);

        self.intervals
            .get(idx)
            .filter(|interval| interval.low <= *addr)
            .map(|_| idx)
    }
}

impl From<&RangeSet> for MergedSet {
    fn from(set: &RangeSet) -> Self {
        set.iter().copied().collect()
    }
}

impl From<RangeSet> for MergedSet {
    fn from(set: RangeSet) -> Self {
        set.into_inner().into_iter().collect()
    }
}

impl From<Vec<Interval>> for MergedSet {
    fn from(intervals: Vec<Interval>) -> Self {
        intervals.into_iter().collect()
    }
}

impl From<MergedSet> for Vec<Interval> {
    fn from(set: MergedSet) -> Self {
        set.into_inner()
    }
}

/// Asserts that the intervals of the given set are sorted, non-adjacent, non-intersecting, and
/// non-empty.
#[cfg(test)]
pub(crate) fn assert_invariants(set: &MergedSet) {
    assert!(set.intervals.iter().all(|interval| !interval.is_empty()));
    assert!(set
        .intervals
        .windows(2)
        .all(|w| w[0].high < w[1].low && w[0].high + 1 < w[1].low));
}
