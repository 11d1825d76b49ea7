//! Peer endpoint representation and `host:port` text parsing.
//!
//! Peers are addressed as IPv6 socket addresses everywhere; IPv4 peers
//! appear as v4-mapped addresses (`::ffff:a.b.c.d`). The text parsers
//! here handle operator-supplied strings from config files and CLI
//! flags, which is why they are strict: every rejection names what was
//! wrong instead of guessing.

use std::net::{Ipv6Addr, SocketAddrV6};

/// A peer address as carried in keepalives: IPv6 address plus port.
pub type Endpoint = SocketAddrV6;

/// Failure to parse an endpoint from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// No `:port` suffix found
    #[error("missing port")]
    MissingPort,
    /// Nothing before the final `:`
    #[error("empty host")]
    EmptyHost,
    /// Port suffix is not a decimal u16
    #[error("invalid port: {0:?}")]
    InvalidPort(String),
    /// Host part is not an IPv6 address
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
}

/// Parse a decimal port number.
///
/// Strict: no sign, no whitespace, no value above 65535.
///
/// # Errors
///
/// [`AddressError::InvalidPort`] on anything but a plain decimal u16.
pub fn parse_port(text: &str) -> Result<u16, AddressError> {
    if text.starts_with('+') {
        return Err(AddressError::InvalidPort(text.to_owned()));
    }
    text.parse().map_err(|_| AddressError::InvalidPort(text.to_owned()))
}

/// Split `host:port` on the last colon and parse both halves.
///
/// Splitting on the last colon lets bare IPv6 addresses through without
/// bracket syntax: `::1:7075` parses as host `::1`, port `7075`.
///
/// # Errors
///
/// An [`AddressError`] naming the missing or malformed part.
pub fn parse_address_port(text: &str) -> Result<(Ipv6Addr, u16), AddressError> {
    let position = text.rfind(':').ok_or(AddressError::MissingPort)?;
    if position == 0 {
        return Err(AddressError::EmptyHost);
    }
    let port = parse_port(&text[position + 1..])?;
    let address = text[..position]
        .parse()
        .map_err(|_| AddressError::InvalidAddress(text[..position].to_owned()))?;
    Ok((address, port))
}

/// Parse `host:port` text into an [`Endpoint`].
///
/// # Errors
///
/// An [`AddressError`] naming the missing or malformed part.
pub fn parse_endpoint(text: &str) -> Result<Endpoint, AddressError> {
    let (address, port) = parse_address_port(text)?;
    Ok(SocketAddrV6::new(address, port, 0, 0))
}
