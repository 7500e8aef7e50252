//! Containment checks over sets of IPv4 address ranges.
//!
//! Entries are parsed from text (single addresses, dashed ranges or CIDR blocks) into closed
//! intervals over the 32-bit address space, and one set of intervals is then checked for
//! containment in another without ever enumerating the addresses a range covers.
//!
//! # Examples
//!
//! ```
//! use ipcheck::{check_lines, NoProgress, Options};
//!
//! let desired = ["192.168.1.1", "10.0.0.0-10.0.0.255"];
//! let total = ["192.168.1.0/24", "10.0.0.0/16"];
//!
//! let verdict = check_lines(&desired, &total, &Options::default(), &NoProgress).unwrap();
//! assert!(verdict.is_match());
//!
//! let verdict = check_lines(&["192.168.2.1"], &total, &Options::default(), &NoProgress).unwrap();
//! assert_eq!(verdict.counterexample(), Some(3232236033));
//! ```

pub mod addr;
mod check;
mod interval;
pub mod parse;
mod progress;
pub mod range;

pub use addr::Addr;
pub use check::{check, check_lines, is_subset, Algorithm, Options, Verdict};
pub use interval::Interval;
pub use parse::{
    parse, parse_all, CidrPolicy, EntryError, ParseError, ParseErrors, ParseOptions, SourceLine,
};
pub use progress::{NoProgress, Progress};
pub use range::{MergedSet, RangeSet, Subset, Uncovered};
