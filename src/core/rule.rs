//! Rule vocabulary: the closed sets a rule is built from
//!
//! Each set is a Rust enum so that statically known values are checked at
//! compile time. String input goes through a single parse per enum:
//!
//! - [`Table`] and [`Chain`] are matched case-sensitively.
//! - [`Action`] is upper-cased and [`Protocol`] lower-cased before matching.
//!
//! # Example
//!
//! ```
//! use ironwall::core::rule::{Action, Protocol, Table};
//!
//! assert_eq!(Table::parse("nat").unwrap(), Table::Nat);
//! assert_eq!(Action::parse("accept").unwrap(), Action::Accept);
//! assert_eq!(Protocol::parse("TCP").unwrap(), Protocol::Tcp);
//! assert!(Table::parse("NAT").is_err());
//! ```

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Which closed set a rejected value was checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum EnumField {
    #[strum(serialize = "table")]
    Table,
    #[strum(serialize = "chain")]
    Chain,
    #[strum(serialize = "action")]
    Action,
    #[strum(serialize = "protocol")]
    Protocol,
}

impl EnumField {
    /// Comma-separated list of the accepted values, in declaration order
    pub fn allowed(self) -> String {
        fn join<T: IntoEnumIterator + AsRef<str>>() -> String {
            T::iter()
                .map(|v| v.as_ref().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }

        match self {
            EnumField::Table => join::<Table>(),
            EnumField::Chain => join::<Chain>(),
            EnumField::Action => join::<Action>(),
            EnumField::Protocol => join::<Protocol>(),
        }
    }
}

/// Firewall table a rule belongs to
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Table {
    #[default]
    Filter,
    Nat,
    Mangle,
    Raw,
    Security,
}

impl Table {
    pub const fn as_str(self) -> &'static str {
        match self {
            Table::Filter => "filter",
            Table::Nat => "nat",
            Table::Mangle => "mangle",
            Table::Raw => "raw",
            Table::Security => "security",
        }
    }

    /// Parses a table name. Matching is case-sensitive.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::InvalidEnumValue {
            field: EnumField::Table,
            value: name.to_string(),
        })
    }
}

/// Built-in chain a rule is appended to
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Chain {
    Input,
    Output,
    Forward,
    Prerouting,
    Postrouting,
}

impl Chain {
    pub const fn as_str(self) -> &'static str {
        match self {
            Chain::Input => "INPUT",
            Chain::Output => "OUTPUT",
            Chain::Forward => "FORWARD",
            Chain::Prerouting => "PREROUTING",
            Chain::Postrouting => "POSTROUTING",
        }
    }

    /// Parses a chain name. Matching is case-sensitive.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::InvalidEnumValue {
            field: EnumField::Chain,
            value: name.to_string(),
        })
    }
}

/// Verdict applied to matching packets
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Action {
    #[default]
    Accept,
    Drop,
    Reject,
    Log,
    Return,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Accept => "ACCEPT",
            Action::Drop => "DROP",
            Action::Reject => "REJECT",
            Action::Log => "LOG",
            Action::Return => "RETURN",
        }
    }

    /// Parses an action in any letter case.
    ///
    /// The error carries the upper-cased value, since that is what was
    /// checked against the set.
    pub fn parse(name: &str) -> Result<Self> {
        let normalized = name.to_uppercase();
        Self::from_str(&normalized).map_err(|_| Error::InvalidEnumValue {
            field: EnumField::Action,
            value: normalized,
        })
    }
}

/// Layer-4 protocol match
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    All,
}

impl Protocol {
    pub const fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Icmp => "icmp",
            Protocol::All => "all",
        }
    }

    /// Parses a protocol in any letter case.
    pub fn parse(name: &str) -> Result<Self> {
        let normalized = name.to_lowercase();
        Self::from_str(&normalized).map_err(|_| Error::InvalidEnumValue {
            field: EnumField::Protocol,
            value: normalized,
        })
    }
}

/// Which end of the connection an address or port match applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Direction {
    #[strum(serialize = "source")]
    Source,
    #[strum(serialize = "destination")]
    Destination,
}

impl Direction {
    pub const fn address_flag(self) -> &'static str {
        match self {
            Direction::Source => "-s",
            Direction::Destination => "-d",
        }
    }

    pub const fn port_flag(self) -> &'static str {
        match self {
            Direction::Source => "--sport",
            Direction::Destination => "--dport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_matches_strum_serialization() {
        for t in Table::iter() {
            assert_eq!(t.as_str(), t.as_ref());
            assert_eq!(t.to_string(), t.as_str());
        }
        for c in Chain::iter() {
            assert_eq!(c.as_str(), c.as_ref());
        }
        for a in Action::iter() {
            assert_eq!(a.as_str(), a.as_ref());
        }
        for p in Protocol::iter() {
            assert_eq!(p.as_str(), p.as_ref());
        }
    }

    #[test]
    fn test_table_is_case_sensitive() {
        assert_eq!(Table::parse("security").unwrap(), Table::Security);
        assert!(matches!(
            Table::parse("Filter"),
            Err(Error::InvalidEnumValue {
                field: EnumField::Table,
                ..
            })
        ));
    }

    #[test]
    fn test_chain_is_case_sensitive() {
        assert_eq!(Chain::parse("POSTROUTING").unwrap(), Chain::Postrouting);
        assert!(Chain::parse("input").is_err());
    }

    #[test]
    fn test_action_normalizes_to_upper() {
        assert_eq!(Action::parse("rEjEcT").unwrap(), Action::Reject);
        let Err(Error::InvalidEnumValue { value, .. }) = Action::parse("allow") else {
            panic!("allow should be rejected");
        };
        assert_eq!(value, "ALLOW");
    }

    #[test]
    fn test_protocol_normalizes_to_lower() {
        assert_eq!(Protocol::parse("ICMP").unwrap(), Protocol::Icmp);
        let Err(Error::InvalidEnumValue { value, .. }) = Protocol::parse("SCTP") else {
            panic!("SCTP should be rejected");
        };
        assert_eq!(value, "sctp");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Table::default(), Table::Filter);
        assert_eq!(Action::default(), Action::Accept);
    }

    #[test]
    fn test_allowed_lists() {
        assert_eq!(
            EnumField::Table.allowed(),
            "filter, nat, mangle, raw, security"
        );
        assert_eq!(
            EnumField::Chain.allowed(),
            "INPUT, OUTPUT, FORWARD, PREROUTING, POSTROUTING"
        );
        assert!(EnumField::Action.allowed().contains("RETURN"));
        assert_eq!(EnumField::Protocol.allowed(), "tcp, udp, icmp, all");
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Chain::Prerouting).unwrap(), "\"PREROUTING\"");
        assert_eq!(serde_json::to_string(&Table::Mangle).unwrap(), "\"mangle\"");
        let p: Protocol = serde_json::from_str("\"udp\"").unwrap();
        assert_eq!(p, Protocol::Udp);
    }

    #[test]
    fn test_direction_flags() {
        assert_eq!(Direction::Source.address_flag(), "-s");
        assert_eq!(Direction::Destination.port_flag(), "--dport");
        assert_eq!(Direction::Destination.to_string(), "destination");
    }
}
