//! Rule assembly: validated tokens rendered into one `iptables` command
//!
//! A [`RuleBuilder`] holds an ordered list of command tokens. Every setter
//! validates its input first and then appends exactly one token, so a failed
//! call leaves the builder untouched. Tokens are rendered in the order the
//! setters were called; nothing is reordered or deduplicated.
//!
//! # Example
//!
//! ```
//! use ironwall::core::builder::RuleBuilder;
//!
//! let mut fw = RuleBuilder::new();
//! fw.reset()
//!     .table("filter")?
//!     .chain("INPUT")?
//!     .protocol("TCP")?
//!     .action("accept")?
//!     .dest_port(443)?;
//!
//! assert_eq!(fw.build()?, "iptables -t filter -A INPUT -p tcp -j ACCEPT --dport 443");
//! # Ok::<(), ironwall::Error>(())
//! ```

use crate::core::error::{Error, Result};
use crate::core::rule::{Action, Chain, Direction, Protocol, Table};
use crate::validators::{
    IntegerLike, escape_double_quotes, validate_ip, validate_log_level, validate_non_empty,
    validate_port,
};
use serde::Serialize;

/// Program name every rendered command starts with
pub const COMMAND_NAME: &str = "iptables";

/// Log level used when the caller does not pick one (syslog "warning")
pub const DEFAULT_LOG_LEVEL: i64 = 4;

/// Final output of one build cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRule {
    /// Full command line, e.g. `iptables -t filter -A INPUT ...`
    pub command: String,
    /// The tokens that follow the command name, in call order
    pub tokens: Vec<String>,
}

/// Stateful accumulator of validated `iptables` command tokens
///
/// Reusable across rules: call [`reset`](Self::reset) before each one.
#[derive(Debug, Clone, Default)]
pub struct RuleBuilder {
    parts: Vec<String>,
}

impl RuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all accumulated tokens.
    pub fn reset(&mut self) -> &mut Self {
        self.parts.clear();
        self
    }

    /// Tokens accumulated so far, in call order
    pub fn tokens(&self) -> &[String] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn push(&mut self, token: String) -> &mut Self {
        self.parts.push(token);
        self
    }

    /// Appends `-t <table>`. The name is matched case-sensitively.
    pub fn table(&mut self, name: impl AsRef<str>) -> Result<&mut Self> {
        let table = Table::parse(name.as_ref())?;
        Ok(self.push(format!("-t {table}")))
    }

    /// Appends `-A <chain>`. The name is matched case-sensitively.
    pub fn chain(&mut self, name: impl AsRef<str>) -> Result<&mut Self> {
        let chain = Chain::parse(name.as_ref())?;
        Ok(self.push(format!("-A {chain}")))
    }

    /// Appends `-j <ACTION>`, accepting the action in any letter case.
    pub fn action(&mut self, action: impl AsRef<str>) -> Result<&mut Self> {
        let action = Action::parse(action.as_ref())?;
        Ok(self.push(format!("-j {action}")))
    }

    /// Appends `-p <protocol>`, accepting the protocol in any letter case.
    pub fn protocol(&mut self, proto: impl AsRef<str>) -> Result<&mut Self> {
        let proto = Protocol::parse(proto.as_ref())?;
        Ok(self.push(format!("-p {proto}")))
    }

    /// Appends `-s <ip>`.
    pub fn source_ip(&mut self, ip: &str) -> Result<&mut Self> {
        self.address(ip, Direction::Source)
    }

    /// Appends `-d <ip>`.
    pub fn dest_ip(&mut self, ip: &str) -> Result<&mut Self> {
        self.address(ip, Direction::Destination)
    }

    fn address(&mut self, ip: &str, direction: Direction) -> Result<&mut Self> {
        validate_ip(ip, direction)?;
        Ok(self.push(format!("{} {ip}", direction.address_flag())))
    }

    /// Appends `--sport <port>`.
    ///
    /// The token carries the parsed integer, not the input text: `"080"`
    /// and `" 80 "` both render `--sport 80`.
    pub fn source_port(&mut self, port: impl IntegerLike) -> Result<&mut Self> {
        self.port(&port, Direction::Source)
    }

    /// Appends `--dport <port>`.
    ///
    /// Normalized like [`source_port`](Self::source_port): `"080"` renders
    /// `--dport 80`.
    pub fn dest_port(&mut self, port: impl IntegerLike) -> Result<&mut Self> {
        self.port(&port, Direction::Destination)
    }

    fn port(&mut self, port: &impl IntegerLike, direction: Direction) -> Result<&mut Self> {
        let port = validate_port(port, direction)?;
        Ok(self.push(format!("{} {port}", direction.port_flag())))
    }

    /// Appends `-m comment --comment "<text>"`.
    ///
    /// An empty comment is accepted and renders as `""`.
    pub fn comment(&mut self, text: &str) -> &mut Self {
        let safe_text = escape_double_quotes(text);
        self.push(format!("-m comment --comment \"{safe_text}\""))
    }

    /// Appends `-m conntrack --ctstate <states>`.
    ///
    /// `states` is a comma-separated list such as `NEW,ESTABLISHED`; the
    /// names themselves are passed through unchecked.
    pub fn state(&mut self, states: &str) -> Result<&mut Self> {
        let states = validate_non_empty(states, "State")?;
        Ok(self.push(format!("-m conntrack --ctstate {states}")))
    }

    /// Appends `-j LOG --log-prefix "<prefix>: " --log-level <level>`.
    pub fn log(&mut self, prefix: &str, level: i64) -> Result<&mut Self> {
        let prefix = validate_non_empty(prefix, "Log prefix")?;
        let level = validate_log_level(level)?;
        let safe_prefix = escape_double_quotes(prefix);
        Ok(self.push(format!(
            "-j LOG --log-prefix \"{safe_prefix}: \" --log-level {level}"
        )))
    }

    /// Renders the accumulated tokens without clearing them.
    pub fn render(&self) -> Result<RenderedRule> {
        if self.parts.is_empty() {
            return Err(Error::EmptyRule);
        }
        Ok(RenderedRule {
            command: format!("{COMMAND_NAME} {}", self.parts.join(" ")),
            tokens: self.parts.clone(),
        })
    }

    /// Renders the command string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRule`] if no setter has succeeded since the
    /// last [`reset`](Self::reset).
    pub fn build(&self) -> Result<String> {
        self.render().map(|rule| rule.command)
    }
}
