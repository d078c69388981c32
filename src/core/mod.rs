//! Core rule assembly
//!
//! - [`rule`]: Closed sets (table, chain, action, protocol)
//! - [`builder`]: Validating token accumulator and renderer
//! - [`request`]: Typed rule requests and batch rendering
//! - [`error`]: Error types and user-facing translations
//!
//! Nothing in this module performs I/O or logs.

pub mod builder;
pub mod error;
pub mod request;
pub mod rule;

#[cfg(test)]
mod tests;
