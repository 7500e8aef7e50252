use crate::{range::MergedSet, Interval};

impl FromIterator<Interval> for MergedSet {
    /// Merges the given intervals, in any order.
    ///
    /// Empty intervals are dropped, and overlapping or adjacent intervals are joined.
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        let mut intervals: Vec<Interval> = iter
            .into_iter()
            .filter(|interval| !interval.is_empty())
            .collect();

        intervals.sort_unstable_by_key(|interval| interval.low);

        let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
        for interval in intervals {
            match merged.last_mut() {
                // Overlapping or adjacent. An interval ending at the top of the address space
                // absorbs everything after it.
                Some(last) if interval.low <= last.high.saturating_add(1) => {
                    last.high = last.high.max(interval.high);
                }
                _ => merged.push(interval),
            }
        }

        MergedSet { intervals: merged }
    }
}
