#![no_main]

use libfuzzer_sys::fuzz_target;

use ipcheck::{check, Algorithm, NoProgress, RangeSet};
use ipcheck_fuzz::SmallSet;

fuzz_target!(|r: (SmallSet, SmallSet)| {
    let a: RangeSet = r.0.into();
    let b: RangeSet = r.1.into();

    let expected = a
        .iter()
        .flat_map(|interval| interval.addrs())
        .find(|addr| !b.contains(addr));

    let merge = check(&a, &b, Algorithm::Merge, &NoProgress);
    let direct = check(&a, &b, Algorithm::Direct, &NoProgress);

    assert_eq!(merge.counterexample(), expected);
    assert_eq!(merge, direct);
});
