#![no_main]

use std::collections::HashSet;

use libfuzzer_sys::fuzz_target;

use ipcheck::RangeSet;
use ipcheck_fuzz::{assert_invariants, SmallSet};

fuzz_target!(|r: SmallSet| {
    let set: RangeSet = r.into();
    let merged = set.merged();

    let expected: HashSet<u32> = set.iter().flat_map(|interval| interval.addrs()).collect();

    assert_eq!(merged.len(), expected.len() as u64);
    assert!(expected.iter().all(|addr| merged.contains(addr)));

    assert_invariants(merged);
});
