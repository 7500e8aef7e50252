use tracing::{debug, instrument};

use crate::{
    parse, Addr, NoProgress, ParseError, ParseOptions, Progress, RangeSet, SourceLine, Subset,
    Uncovered,
};

/// The algorithm used to check containment.
///
/// Both algorithms return the same verdict and counterexample for any input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    /// Merges the intervals of the containing set, then checks each interval with a binary
    /// search.
    #[default]
    Merge,
    /// Checks each address against every interval of the containing set.
    ///
    /// This visits every address covered by the checked set, which is only viable for small
    /// inputs.
    Direct,
}

/// Options for a containment check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Options {
    /// Options for parsing entries.
    pub parse: ParseOptions,
    /// The checking algorithm.
    pub algorithm: Algorithm,
}

/// The outcome of a containment check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Verdict {
    /// Every address of the checked set is covered.
    Match,
    /// An address of the checked set is not covered.
    NoMatch(Uncovered),
}

impl Verdict {
    /// Returns `true` if every address was covered.
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }

    /// Returns the first uncovered address, if any.
    pub fn counterexample(&self) -> Option<Addr> {
        self.uncovered().map(|uncovered| uncovered.address)
    }

    /// Returns the first uncovered address and its interval, if any.
    pub fn uncovered(&self) -> Option<&Uncovered> {
        match self {
            Verdict::Match => None,
            Verdict::NoMatch(uncovered) => Some(uncovered),
        }
    }

    /// Returns the verdict as a flag and an optional counterexample.
    pub fn into_parts(self) -> (bool, Option<Addr>) {
        (self.is_match(), self.counterexample())
    }
}

impl From<Option<Uncovered>> for Verdict {
    fn from(uncovered: Option<Uncovered>) -> Self {
        uncovered.map_or(Verdict::Match, Verdict::NoMatch)
    }
}

/// Checks whether every address covered by `a` is covered by `b`.
///
/// On a mismatch the first uncovered address is reported, in the order of the intervals of `a`
/// then ascending within an interval. Empty intervals of `a` are always covered.
#[instrument(
    level = "debug",
    skip_all,
    fields(a = a.len_intervals(), b = b.len_intervals(), algorithm = ?algorithm)
)]
pub fn check(
    a: &RangeSet,
    b: &RangeSet,
    algorithm: Algorithm,
    progress: &dyn Progress,
) -> Verdict {
    let uncovered = match algorithm {
        Algorithm::Merge => {
            progress.message(&format!("Merging {} intervals.", b.len_intervals()));
            let merged = b.merged();
            debug!(merged = merged.len_intervals(), "merged intervals");

            progress.message(&format!("Checking {} intervals.", a.len_intervals()));
            a.first_uncovered(&merged)
        }
        Algorithm::Direct => {
            progress.message(&format!("Checking {} intervals.", a.len_intervals()));
            scan(a, b, progress)
        }
    };

    debug!(?uncovered, "checked containment");

    Verdict::from(uncovered)
}

/// Checks every address of `a` against every interval of `b`.
fn scan(a: &RangeSet, b: &RangeSet, progress: &dyn Progress) -> Option<Uncovered> {
    progress.start(a.len_intervals() as u64);

    let uncovered = a.iter().find_map(|interval| {
        let uncovered = interval
            .addrs()
            .find(|addr| !b.contains(addr))
            .map(|address| Uncovered {
                address,
                interval: *interval,
            });
        progress.inc(1);
        uncovered
    });

    progress.finish();

    uncovered
}

/// Returns whether every address covered by `a` is covered by `b`, along with the first
/// uncovered address on a mismatch.
pub fn is_subset(a: &RangeSet, b: &RangeSet) -> (bool, Option<Addr>) {
    check(a, b, Algorithm::default(), &NoProgress).into_parts()
}

/// Parses the `desired` and `total` entries, then checks whether `desired` is contained in
/// `total`.
pub fn check_lines<S>(
    desired: &[S],
    total: &[S],
    options: &Options,
    progress: &dyn Progress,
) -> Result<Verdict, ParseError>
where
    S: SourceLine,
{
    progress.message("Parsing the desired IPs.");
    let desired = parse(desired, &options.parse, progress)?;
    progress.message("Parsing the total IPs.");
    let total = parse(total, &options.parse, progress)?;

    progress.message("Checking if list A is in list B.");
    Ok(check(&desired, &total, options.algorithm, progress))
}
