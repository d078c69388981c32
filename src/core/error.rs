use crate::core::rule::{Direction, EnumField};
use thiserror::Error;

/// Core error types for ironwall
#[derive(Debug, Error)]
pub enum Error {
    /// Table, chain, action or protocol outside its closed set
    #[error("Invalid {field} '{value}'. Must be one of: {}", .field.allowed())]
    InvalidEnumValue { field: EnumField, value: String },

    /// Malformed IPv4/IPv6 address literal
    #[error("Invalid {direction} IP address '{value}'")]
    InvalidAddress { direction: Direction, value: String },

    /// Non-integer or out-of-range port
    #[error("Invalid {direction} port '{value}'. Must be 1-65535")]
    InvalidPort { direction: Direction, value: String },

    /// Log level outside 0-7
    #[error("Invalid log level {0}. Must be between 0 and 7")]
    InvalidLogLevel(i64),

    /// Required text field was empty
    #[error("{field} must be a non-empty string")]
    EmptyInput { field: &'static str },

    /// Render called before any token was added
    #[error("No iptables rule parts to build command from")]
    EmptyRule,

    /// One entry of a batch file failed
    #[error("Rule #{index}: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Represents a translated error with helpful context
#[derive(Debug, Clone)]
pub struct ErrorTranslation {
    pub user_message: String,
    pub suggestions: Vec<String>,
}

impl ErrorTranslation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            user_message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl Error {
    /// Returns a user-facing message plus suggestions for fixing the input.
    pub fn translate(&self) -> ErrorTranslation {
        let base = ErrorTranslation::new(self.to_string());

        match self {
            Error::InvalidEnumValue { field, .. } => {
                let t = base.with_suggestion(format!("Valid values: {}", field.allowed()));
                match field {
                    EnumField::Table | EnumField::Chain => {
                        t.with_suggestion(format!("{field} names are case-sensitive"))
                    }
                    EnumField::Action | EnumField::Protocol => t,
                }
            }
            Error::InvalidAddress { .. } => base
                .with_suggestion("Use a single address such as 192.168.1.10 or 2001:db8::1")
                .with_suggestion("Networks in CIDR notation (10.0.0.0/8) are not accepted"),
            Error::InvalidPort { .. } => base
                .with_suggestion("Port numbers must be between 1 and 65535")
                .with_suggestion("Port ranges are not supported; add one rule per port"),
            Error::InvalidLogLevel(_) => base
                .with_suggestion("Syslog levels run from 0 (emerg) to 7 (debug)")
                .with_suggestion("The default level is 4 (warning)"),
            Error::EmptyInput { field } => {
                base.with_suggestion(format!("Provide a value for {field} or omit the option"))
            }
            Error::EmptyRule => base
                .with_suggestion("Set at least a table, chain, protocol and action"),
            Error::Batch { index, source } => {
                let inner = source.translate();
                let mut t = ErrorTranslation::new(format!("Rule #{index}: {}", inner.user_message));
                t.suggestions = inner.suggestions;
                t
            }
            Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                base.with_suggestion("Check that the file path exists")
            }
            Error::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                base.with_suggestion("Check the file permissions")
            }
            Error::Io(_) => base,
            Error::Serialization(_) => base
                .with_suggestion("Batch files must be a JSON array of rule objects")
                .with_suggestion("Each rule needs at least \"chain\", \"protocol\" and \"action\""),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
