//! Typed rule requests and the canonical call sequence
//!
//! A [`RuleRequest`] is what a front end collects from its user: the four
//! mandatory attributes plus optional match, log and comment clauses. It can
//! be built from CLI flags or deserialized from a batch file:
//!
//! ```json
//! [
//!   { "chain": "INPUT", "protocol": "tcp", "action": "accept", "dest_port": 22 },
//!   { "table": "nat", "chain": "POSTROUTING", "protocol": "all", "action": "return" }
//! ]
//! ```
//!
//! [`RuleRequest::render`] drives a [`RuleBuilder`] in a fixed order so the
//! same request always produces the same command.

use crate::core::builder::{DEFAULT_LOG_LEVEL, RenderedRule, RuleBuilder};
use crate::core::error::{Error, Result};
use crate::core::rule::{Action, Direction, Table};
use crate::validators::{IntegerLike, check_reserved_ip, check_well_known_port};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Port as it appears in a batch file: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortValue::Number(n) => write!(f, "{n}"),
            PortValue::Text(s) => f.write_str(s),
        }
    }
}

impl IntegerLike for PortValue {
    fn to_integer(&self) -> Option<i64> {
        match self {
            PortValue::Number(n) => Some(*n),
            PortValue::Text(s) => s.to_integer(),
        }
    }
}

impl From<u16> for PortValue {
    fn from(port: u16) -> Self {
        PortValue::Number(i64::from(port))
    }
}

/// One rule as supplied by a front end
///
/// Enumerated attributes stay strings until the builder validates them, so
/// a bad value in a batch file is reported like a bad CLI flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRequest {
    #[serde(default = "default_table")]
    pub table: String,
    pub chain: String,
    pub protocol: String,
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<PortValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_port: Option<PortValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_prefix: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: i64,
}

fn default_table() -> String {
    Table::default().as_str().to_string()
}

fn default_action() -> String {
    Action::default().as_str().to_string()
}

fn default_log_level() -> i64 {
    DEFAULT_LOG_LEVEL
}

/// Treats an empty optional string the same as an absent one
fn supplied(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl RuleRequest {
    /// Creates a request with only the mandatory attributes set.
    pub fn new(
        chain: impl Into<String>,
        protocol: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            table: default_table(),
            chain: chain.into(),
            protocol: protocol.into(),
            action: action.into(),
            source_ip: None,
            dest_ip: None,
            source_port: None,
            dest_port: None,
            comment: None,
            state: None,
            log_prefix: None,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }

    /// Resets `builder` and replays this request into it.
    ///
    /// Order: table, chain, protocol, action, then source IP, destination
    /// IP, source port, destination port, comment, state and log, each only
    /// when supplied.
    pub fn render(&self, builder: &mut RuleBuilder) -> Result<RenderedRule> {
        builder
            .reset()
            .table(&self.table)?
            .chain(&self.chain)?
            .protocol(&self.protocol)?
            .action(&self.action)?;

        if let Some(ip) = supplied(self.source_ip.as_ref()) {
            builder.source_ip(ip)?;
        }
        if let Some(ip) = supplied(self.dest_ip.as_ref()) {
            builder.dest_ip(ip)?;
        }
        if let Some(port) = &self.source_port {
            builder.source_port(port)?;
        }
        if let Some(port) = &self.dest_port {
            builder.dest_port(port)?;
        }
        if let Some(text) = supplied(self.comment.as_ref()) {
            builder.comment(text);
        }
        if let Some(states) = supplied(self.state.as_ref()) {
            builder.state(states)?;
        }
        if let Some(prefix) = supplied(self.log_prefix.as_ref()) {
            builder.log(prefix, self.log_level)?;
        }

        builder.render()
    }

    /// Informational notes about ports and addresses in this request.
    ///
    /// Values that fail validation are skipped; [`render`](Self::render)
    /// reports those.
    pub fn advisories(&self) -> Vec<String> {
        let mut notes = Vec::new();

        for (ip, direction) in [
            (&self.source_ip, Direction::Source),
            (&self.dest_ip, Direction::Destination),
        ] {
            if let Some(addr) = supplied(ip.as_ref()).and_then(|s| s.parse().ok())
                && let Some(note) = check_reserved_ip(addr)
            {
                notes.push(format!("{direction} address {addr}: {note}"));
            }
        }

        for (port, direction) in [
            (&self.source_port, Direction::Source),
            (&self.dest_port, Direction::Destination),
        ] {
            if let Some(port) = port
                .as_ref()
                .and_then(IntegerLike::to_integer)
                .and_then(|n| u16::try_from(n).ok())
                && let Some(note) = check_well_known_port(port)
            {
                notes.push(format!("{direction} {note}"));
            }
        }

        notes
    }
}

/// Renders every request through one builder.
///
/// Stops at the first failure, reporting its zero-based position.
pub fn render_all(requests: &[RuleRequest]) -> Result<Vec<RenderedRule>> {
    let mut builder = RuleBuilder::new();
    requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            request.render(&mut builder).map_err(|e| Error::Batch {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}
