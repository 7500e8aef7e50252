use libfuzzer_sys::arbitrary::{Arbitrary, Result, Unstructured};

use ipcheck::{Interval, MergedSet, RangeSet};

/// A set of at most 8 intervals over a small slice of the address space.
///
/// Bounds are drawn from `u8` so that the direct algorithm can enumerate every address.
#[derive(Debug)]
pub struct SmallSet {
    pub intervals: Vec<Interval>,
}

impl From<SmallSet> for RangeSet {
    fn from(s: SmallSet) -> Self {
        RangeSet::from(s.intervals)
    }
}

impl<'a> Arbitrary<'a> for SmallSet {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let count = u8::arbitrary(u)? % 8;

        let mut intervals = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let low = u8::arbitrary(u)?;
            let high = u8::arbitrary(u)?;
            intervals.push(Interval::new(u32::from(low), u32::from(high)));
        }

        Ok(SmallSet { intervals })
    }

    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        // Maximum of 1 byte for `count` and 8 intervals which are 2 bytes each.
        (1, Some(1 + 8 * 2))
    }
}

/// Asserts that the intervals of the given set are sorted, non-adjacent, non-intersecting, and non-empty.
pub fn assert_invariants(set: MergedSet) {
    let intervals = set.into_inner();

    assert!(intervals.iter().all(|interval| !interval.is_empty()));
    assert!(intervals
        .windows(2)
        .all(|w| w[0].high < w[1].low && w[0].high + 1 < w[1].low));
}
