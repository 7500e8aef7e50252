//! Dotted-quad addresses and their numeric encoding.

use std::{net::Ipv4Addr, str::FromStr};

/// An IPv4 address in its big-endian numeric encoding, e.g. `1.2.3.4` is `0x01020304`.
pub type Addr = u32;

/// Parses a dotted-quad literal into its numeric encoding.
///
/// Exactly four decimal octets in `0..=255` are accepted. Octets with a leading zero are rejected
/// since they are ambiguous with octal notation, as is any surrounding whitespace.
pub fn parse_addr(s: &str) -> Option<Addr> {
    Ipv4Addr::from_str(s).ok().map(Addr::from)
}

/// Returns the network mask for the given prefix length.
///
/// # Panics
///
/// Panics if `prefix` is greater than 32.
pub fn prefix_mask(prefix: u32) -> Addr {
    assert!(prefix <= 32, "prefix length is at most 32");

    // A shift by the full width is the empty mask of a /0.
    Addr::MAX.checked_shl(32 - prefix).unwrap_or(0)
}

/// Returns the dotted-quad form of an address.
pub fn to_ipv4(addr: Addr) -> Ipv4Addr {
    Ipv4Addr::from(addr)
}
