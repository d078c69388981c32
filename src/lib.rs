//! ironwall - validated iptables rule builder
//!
//! Turns a structured description of a packet-filtering rule into a single
//! well-formed `iptables` command line.
//!
//! # Architecture
//!
//! - [`core`] - Rule vocabulary, the rule builder, typed requests and errors
//! - [`validators`] - Input validation and advisory checks
//! - [`config`] - Front-end defaults persisted as JSON
//! - [`utils`] - Utility functions (XDG directories)
//!
//! # Example
//!
//! ```
//! use ironwall::RuleBuilder;
//!
//! let mut fw = RuleBuilder::new();
//! fw.reset()
//!     .chain("INPUT")?
//!     .protocol("udp")?
//!     .dest_port(53)?
//!     .action("ACCEPT")?;
//! assert_eq!(fw.build()?, "iptables -A INPUT -p udp --dport 53 -j ACCEPT");
//! # Ok::<(), ironwall::Error>(())
//! ```

#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod core;
pub mod utils;
pub mod validators;

// Re-export commonly used types
pub use crate::core::builder::{RenderedRule, RuleBuilder};
pub use crate::core::error::{Error, Result};
pub use crate::core::request::RuleRequest;
pub use crate::core::rule::{Action, Chain, Protocol, Table};
