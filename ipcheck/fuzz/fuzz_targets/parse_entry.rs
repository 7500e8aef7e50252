#![no_main]

use libfuzzer_sys::fuzz_target;

use ipcheck::parse::{Entry, ParseOptions};
use ipcheck::{CidrPolicy, Subset};

fuzz_target!(|data: &str| {
    for cidr in [CidrPolicy::Strict, CidrPolicy::Normalize] {
        let Ok(entry) = Entry::parse(data, &ParseOptions { cidr }) else {
            continue;
        };

        let interval = entry.to_interval();
        if let Entry::Cidr { .. } | Entry::Address(_) = entry {
            assert!(!interval.is_empty());
        }

        assert!(interval.is_subset(&interval));
    }
});
