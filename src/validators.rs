//! Input validation for rule attributes
//!
//! The builder delegates every value check to this module so that each
//! setter is a validate-then-append pair. Advisory checks
//! ([`check_well_known_port`], [`check_reserved_ip`]) are informational
//! only and never reject input.

use crate::core::error::{Error, Result};
use crate::core::rule::Direction;
use std::fmt;
use std::net::IpAddr;

/// Lowest and highest syslog level accepted by `--log-level`
pub const LOG_LEVEL_RANGE: std::ops::RangeInclusive<i64> = 0..=7;

/// A value that may be read as an integer.
///
/// Implemented for the primitive integers and for strings holding a base-10
/// integer (surrounding whitespace and a leading sign are allowed).
pub trait IntegerLike: fmt::Display {
    /// Returns `None` when the value cannot be read as an `i64`.
    fn to_integer(&self) -> Option<i64>;
}

macro_rules! integer_like {
    ($($t:ty),*) => {
        $(impl IntegerLike for $t {
            fn to_integer(&self) -> Option<i64> {
                i64::try_from(*self).ok()
            }
        })*
    };
}

integer_like!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl IntegerLike for str {
    fn to_integer(&self) -> Option<i64> {
        self.trim().parse().ok()
    }
}

impl IntegerLike for String {
    fn to_integer(&self) -> Option<i64> {
        self.as_str().to_integer()
    }
}

impl<T: IntegerLike + ?Sized> IntegerLike for &T {
    fn to_integer(&self) -> Option<i64> {
        (**self).to_integer()
    }
}

/// Validates an IPv4 or IPv6 address literal.
///
/// Network prefixes (`10.0.0.0/8`) and host names are rejected.
///
/// # Examples
///
/// ```
/// use ironwall::core::rule::Direction;
/// use ironwall::validators::validate_ip;
///
/// assert!(validate_ip("10.0.0.1", Direction::Source).is_ok());
/// assert!(validate_ip("::1", Direction::Source).is_ok());
/// assert!(validate_ip("10.0.0.0/8", Direction::Source).is_err());
/// ```
pub fn validate_ip(value: &str, direction: Direction) -> Result<IpAddr> {
    value.parse().map_err(|_| Error::InvalidAddress {
        direction,
        value: value.to_string(),
    })
}

/// Validates a port given as any integer-like value.
///
/// # Errors
///
/// Returns [`Error::InvalidPort`] if the value is not an integer or lies
/// outside 1-65535.
pub fn validate_port<P: IntegerLike + ?Sized>(port: &P, direction: Direction) -> Result<u16> {
    port.to_integer()
        .and_then(|n| u16::try_from(n).ok())
        .filter(|&n| n != 0)
        .ok_or_else(|| Error::InvalidPort {
            direction,
            value: port.to_string(),
        })
}

/// Validates a syslog level for the LOG target.
pub fn validate_log_level(level: i64) -> Result<u8> {
    if LOG_LEVEL_RANGE.contains(&level) {
        u8::try_from(level).map_err(|_| Error::InvalidLogLevel(level))
    } else {
        Err(Error::InvalidLogLevel(level))
    }
}

/// Validates a text field that must not be empty.
pub fn validate_non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    if value.is_empty() {
        Err(Error::EmptyInput { field })
    } else {
        Ok(value)
    }
}

/// Escapes every double quote so the text stays inside one quoted token.
///
/// No other character is touched.
///
/// ```
/// use ironwall::validators::escape_double_quotes;
///
/// assert_eq!(escape_double_quotes(r#"he said "hi""#), r#"he said \"hi\""#);
/// ```
pub fn escape_double_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Checks if a port is well-known and returns informational message.
///
/// This is informational only and does not block rendering.
pub fn check_well_known_port(port: u16) -> Option<String> {
    let name = match port {
        21 => "FTP",
        22 => "SSH",
        25 => "SMTP",
        53 => "DNS",
        80 => "HTTP",
        443 => "HTTPS",
        1..=1024 => return Some(format!("Privileged port {port} (requires admin)")),
        _ => return None,
    };
    Some(format!("Port {port}: {name}"))
}

/// Checks if an IP is in a reserved range and returns informational warning.
///
/// Helps users notice rules aimed at private or special-purpose addresses.
pub fn check_reserved_ip(ip: IpAddr) -> Option<String> {
    match ip {
        IpAddr::V4(ipv4) => {
            if ipv4.is_private() {
                return Some("Private IP range (RFC 1918) - usually LAN traffic".to_string());
            }
            if ipv4.is_loopback() {
                return Some("Loopback range (127.x) - traffic never leaves the host".to_string());
            }
            if ipv4.is_link_local() {
                return Some("Link-local range (169.254.x.x) - APIPA addresses".to_string());
            }
            None
        }
        IpAddr::V6(ipv6) => {
            if ipv6.is_loopback() {
                return Some("IPv6 loopback (::1) - traffic never leaves the host".to_string());
            }
            if ipv6.is_unicast_link_local() {
                return Some("IPv6 link-local (fe80::/10) - local network only".to_string());
            }
            if ipv6.is_unique_local() {
                return Some("IPv6 unique local (fc00::/7) - private addressing".to_string());
            }
            None
        }
    }
}
