//! Parsing of textual entries into intervals.
//!
//! Each entry is one of:
//!
//! - a single address, `10.0.0.1`
//! - a dashed range, `10.0.0.1-10.0.0.9`
//! - a CIDR block, `10.0.0.0/24`
//!
//! and maps to exactly one [`Interval`]. Only the bounds of an entry are computed, the addresses
//! it covers are never enumerated.

use std::{net::Ipv4Addr, str::FromStr};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::{
    addr::{parse_addr, prefix_mask, to_ipv4, Addr},
    Interval, Progress, RangeSet,
};

/// How CIDR blocks with host bits set, e.g. `10.0.0.5/24`, are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CidrPolicy {
    /// Reject the entry.
    #[default]
    Strict,
    /// Mask off the host bits, treating the entry as its network address.
    Normalize,
}

/// Options for parsing entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseOptions {
    /// Handling of CIDR blocks with host bits set.
    pub cidr: CidrPolicy,
}

/// Why a CIDR block was rejected.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CidrError {
    #[error("malformed network address")]
    Address,
    #[error("malformed prefix length")]
    Prefix,
    #[error("prefix length {0} is greater than 32")]
    PrefixOutOfRange(u32),
    #[error("host bits are set, the network address is {0}")]
    HostBitsSet(Ipv4Addr),
}

/// A malformed entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The entry is not a valid dotted-quad address.
    #[error("invalid address `{0}`")]
    InvalidAddressFormat(String),
    /// The entry is not two dotted-quad addresses separated by a single `-`.
    #[error("invalid range `{0}`")]
    InvalidRangeFormat(String),
    /// The entry is not a valid CIDR block.
    #[error("invalid CIDR block `{entry}`: {reason}")]
    InvalidCidrFormat {
        /// The rejected entry.
        entry: String,
        /// Why the entry was rejected.
        reason: CidrError,
    },
}

/// A malformed entry, along with its line in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// The 1-based line number of the entry.
    pub line: usize,
    /// What is wrong with the entry.
    pub kind: EntryError,
}

/// Every malformed entry of an input, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} malformed entries{}", .0.len(), indented(.0))]
pub struct ParseErrors(pub Vec<ParseError>);

fn indented(errors: &[ParseError]) -> String {
    errors.iter().map(|err| format!("\n  {err}")).collect()
}

/// A line of input holding an entry.
///
/// Lines without a known line number are numbered by their position in the input.
pub trait SourceLine: Sync {
    /// Returns the text of the line.
    fn text(&self) -> &str;

    /// Returns the 1-based line number of the line in its source, if known.
    fn line(&self) -> Option<usize> {
        None
    }
}

impl SourceLine for &str {
    fn text(&self) -> &str {
        self
    }
}

impl SourceLine for String {
    fn text(&self) -> &str {
        self
    }
}

impl<S: SourceLine> SourceLine for (usize, S) {
    fn text(&self) -> &str {
        self.1.text()
    }

    fn line(&self) -> Option<usize> {
        Some(self.0)
    }
}

/// A parsed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// A single address.
    Address(Addr),
    /// A dashed range. The bounds are not required to be in order.
    Range {
        /// The left-hand address.
        start: Addr,
        /// The right-hand address.
        end: Addr,
    },
    /// A CIDR block.
    Cidr {
        /// The address given with the block.
        addr: Addr,
        /// The prefix length, at most 32.
        prefix: u32,
    },
}

impl Entry {
    /// Parses an entry, trimming surrounding whitespace.
    ///
    /// An entry containing a `-` is a dashed range, otherwise an entry containing a `/` is a CIDR
    /// block, otherwise it is a single address. An entry containing both is rejected as a
    /// malformed range.
    pub fn parse(entry: &str, options: &ParseOptions) -> Result<Self, EntryError> {
        let entry = entry.trim();

        match (entry.contains('-'), entry.contains('/')) {
            (true, true) => Err(EntryError::InvalidRangeFormat(entry.to_string())),
            (true, false) => parse_range(entry),
            (false, true) => parse_cidr(entry, options.cidr),
            (false, false) => parse_addr(entry)
                .map(Entry::Address)
                .ok_or_else(|| EntryError::InvalidAddressFormat(entry.to_string())),
        }
    }

    /// Returns the interval covered by the entry.
    pub fn to_interval(&self) -> Interval {
        match *self {
            Entry::Address(addr) => Interval::single(addr),
            Entry::Range { start, end } => Interval::new(start, end),
            Entry::Cidr { addr, prefix } => {
                let mask = prefix_mask(prefix);
                let network = addr & mask;

                Interval::new(network, network | !mask)
            }
        }
    }
}

impl FromStr for Entry {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Entry::parse(s, &ParseOptions::default())
    }
}

fn parse_range(entry: &str) -> Result<Entry, EntryError> {
    let invalid = || EntryError::InvalidRangeFormat(entry.to_string());

    let mut parts = entry.split('-');
    let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let start = parse_addr(start.trim()).ok_or_else(invalid)?;
    let end = parse_addr(end.trim()).ok_or_else(invalid)?;

    Ok(Entry::Range { start, end })
}

fn parse_cidr(entry: &str, policy: CidrPolicy) -> Result<Entry, EntryError> {
    let invalid = |reason| EntryError::InvalidCidrFormat {
        entry: entry.to_string(),
        reason,
    };

    let (addr, prefix) = entry
        .split_once('/')
        .ok_or_else(|| invalid(CidrError::Prefix))?;

    let addr = parse_addr(addr).ok_or_else(|| invalid(CidrError::Address))?;

    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(CidrError::Prefix));
    }
    let prefix: u32 = prefix.parse().map_err(|_| invalid(CidrError::Prefix))?;
    if prefix > 32 {
        return Err(invalid(CidrError::PrefixOutOfRange(prefix)));
    }

    let network = addr & prefix_mask(prefix);
    if network != addr && policy == CidrPolicy::Strict {
        return Err(invalid(CidrError::HostBitsSet(to_ipv4(network))));
    }

    Ok(Entry::Cidr { addr, prefix })
}

/// Parses every entry, returning one result per entry in input order.
fn parse_entries<S>(
    entries: &[S],
    options: &ParseOptions,
    progress: &dyn Progress,
) -> Vec<Result<Interval, ParseError>>
where
    S: SourceLine,
{
    progress.start(entries.len() as u64);

    let parse_one = |(idx, entry): (usize, &S)| {
        let result = Entry::parse(entry.text(), options)
            .map(|entry| entry.to_interval())
            .map_err(|kind| ParseError {
                line: entry.line().unwrap_or(idx + 1),
                kind,
            });
        progress.inc(1);
        result
    };

    #[cfg(feature = "parallel")]
    let results = entries.par_iter().enumerate().map(parse_one).collect();
    #[cfg(not(feature = "parallel"))]
    let results = entries.iter().enumerate().map(parse_one).collect();

    progress.finish();

    results
}

/// Parses entries into a [`RangeSet`], preserving input order.
///
/// Returns the first malformed entry as an error.
pub fn parse<S>(
    entries: &[S],
    options: &ParseOptions,
    progress: &dyn Progress,
) -> Result<RangeSet, ParseError>
where
    S: SourceLine,
{
    progress.message(&format!("Parsing {} entries.", entries.len()));

    let set = parse_entries(entries, options, progress)
        .into_iter()
        .collect::<Result<RangeSet, _>>()?;

    debug!(intervals = set.len_intervals(), "parsed entries");

    Ok(set)
}

/// Parses entries into a [`RangeSet`], preserving input order.
///
/// Unlike [`parse`], every malformed entry is reported.
pub fn parse_all<S>(
    entries: &[S],
    options: &ParseOptions,
    progress: &dyn Progress,
) -> Result<RangeSet, ParseErrors>
where
    S: SourceLine,
{
    progress.message(&format!("Parsing {} entries.", entries.len()));

    let mut intervals = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();
    for result in parse_entries(entries, options, progress) {
        match result {
            Ok(interval) => intervals.push(interval),
            Err(err) => errors.push(err),
        }
    }

    if !errors.is_empty() {
        debug!(errors = errors.len(), "rejected malformed entries");
        return Err(ParseErrors(errors));
    }

    Ok(RangeSet::from(intervals))
}
