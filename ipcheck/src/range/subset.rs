#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    range::{MergedSet, RangeSet},
    Addr, Interval,
};

/// The first address of a set found missing from another set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uncovered {
    /// The uncovered address.
    pub address: Addr,
    /// The interval of the checked set which contains the address.
    pub interval: Interval,
}

/// Containment of one set of addresses in another.
pub trait Subset<Rhs> {
    /// Returns the first address of `self` which is not in `other`, or `None` if `self` is a
    /// subset of `other`.
    ///
    /// Addresses are visited in the order of the intervals of `self`, then ascending within an
    /// interval.
    #[must_use]
    fn first_uncovered(&self, other: &Rhs) -> Option<Uncovered>;

    /// Returns `true` if `self` is a subset of `other`.
    #[must_use]
    fn is_subset(&self, other: &Rhs) -> bool {
        self.first_uncovered(other).is_none()
    }
}

impl Subset<Interval> for Interval {
    fn first_uncovered(&self, other: &Interval) -> Option<Uncovered> {
        let address = if self.is_empty() {
            // empty interval is subset of any interval
            return None;
        } else if other.is_empty() || self.low < other.low || self.low > other.high {
            self.low
        } else if self.high > other.high {
            other.high + 1
        } else {
            return None;
        };

        Some(Uncovered {
            address,
            interval: *self,
        })
    }
}

impl Subset<MergedSet> for Interval {
    fn first_uncovered(&self, other: &MergedSet) -> Option<Uncovered> {
        if self.is_empty() {
            return None;
        }

        // The merged interval ending at or after `low`, which is the only one which can
        // contain it.
        let idx = other
            .intervals
            .partition_point(|interval| interval.high < self.low);

        match other.intervals.get(idx) {
            // As merged intervals are non-adjacent, the address after this interval is a gap.
            Some(covering) if covering.low <= self.low => self.first_uncovered(covering),
            _ => Some(Uncovered {
                address: self.low,
                interval: *self,
            }),
        }
    }
}

impl Subset<MergedSet> for RangeSet {
    fn first_uncovered(&self, other: &MergedSet) -> Option<Uncovered> {
        // The earliest interval wins regardless of which thread finds it first.
        #[cfg(feature = "parallel")]
        let uncovered = self
            .intervals
            .par_iter()
            .find_map_first(|interval| interval.first_uncovered(other));
        #[cfg(not(feature = "parallel"))]
        let uncovered = self
            .intervals
            .iter()
            .find_map(|interval| interval.first_uncovered(other));

        uncovered
    }
}

impl Subset<RangeSet> for RangeSet {
    fn first_uncovered(&self, other: &RangeSet) -> Option<Uncovered> {
        self.first_uncovered(&other.merged())
    }
}

impl Subset<MergedSet> for MergedSet {
    fn first_uncovered(&self, other: &MergedSet) -> Option<Uncovered> {
        let mut j = 0;

        for a in &self.intervals {
            // skip the intervals of other which are leftward of a
            while j < other.intervals.len() && other.intervals[j].high < a.low {
                j += 1;
            }

            match other.intervals.get(j) {
                Some(b) if b.low <= a.low => {
                    if let Some(uncovered) = a.first_uncovered(b) {
                        return Some(uncovered);
                    }
                }
                _ => {
                    return Some(Uncovered {
                        address: a.low,
                        interval: *a,
                    })
                }
            }
        }

        None
    }
}
