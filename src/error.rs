//! Error types.
//!
//! Two tiers of failure exist while rendering:
//! - [`Error`]: fatal. The template or configuration is corrupt and the whole
//!   render is aborted, no partial output is produced.
//! - [`Diagnostic`]: recoverable. The offending tag is truncated or dropped,
//!   the problem is logged and the render carries on.

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal render or configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An Info tag named a module that does not exist.
    #[error("invalid module name: {0}")]
    UnknownModule(String),

    /// A module specifier that needs an argument was written without one.
    #[error("invalid module name '{name}': {reason}")]
    MalformedModule {
        /// Module specifier as written in the template.
        name: String,
        /// What a well-formed specifier looks like.
        reason: &'static str,
    },

    /// A raw ANSI escape color that cannot be decoded.
    #[error("failed to parse ANSI escape color '{sequence}': {reason}")]
    MalformedAnsi {
        /// The escape color token.
        sequence: String,
        /// Which part of the sequence is wrong.
        reason: &'static str,
    },

    /// 256-color escapes have no rich-text equivalent.
    #[error("256 color escape '{0}' is not supported in styled output, only in a terminal")]
    UnsupportedAnsi256(String),

    /// An override named a property that does not exist.
    #[error("unknown config property: {0}")]
    UnknownConfigProperty(String),

    /// `name=value` input without the `=`.
    #[error("{what} '{input}' must contain '=' (e.g. \"name=value\")")]
    MissingSeparator {
        /// Kind of entry (alias, override).
        what: &'static str,
        /// The raw entry.
        input: String,
    },

    /// An override value that does not parse as the property type.
    #[error("invalid value '{value}' for config property '{name}'")]
    InvalidConfigValue {
        /// Property name.
        name: String,
        /// Raw value.
        value: String,
    },
}

impl Error {
    /// Create an unknown module error.
    pub fn unknown_module(name: impl Into<String>) -> Self {
        Self::UnknownModule(name.into())
    }

    /// Create a malformed ANSI escape error.
    pub fn malformed_ansi(sequence: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedAnsi {
            sequence: sequence.into(),
            reason,
        }
    }

    /// Create an invalid config value error.
    pub fn invalid_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Category of a recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A bounded tag reached end of input before its delimiter.
    UnclosedTag {
        /// The delimiter that was expected.
        delimiter: char,
    },
    /// A color token that is neither an alias, a name, a hex literal nor an escape.
    UnknownColor,
    /// A percentage operand that is not a number.
    InvalidNumber,
}

/// A recoverable problem found while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Human readable message.
    pub message: String,
}

impl Diagnostic {
    /// A bounded tag reached end of input.
    pub fn unclosed(delimiter: char, source: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnclosedTag { delimiter },
            message: format!("missing tag close bracket '{delimiter}' in string '{source}'"),
        }
    }

    /// A color token could not be resolved.
    pub fn unknown_color(token: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnknownColor,
            message: format!("failed to parse line with color '{token}'"),
        }
    }

    /// A percentage operand is not a number.
    pub fn invalid_number(text: &str) -> Self {
        Self {
            kind: DiagnosticKind::InvalidNumber,
            message: format!("percentage operand '{text}' is not a number"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_messages() {
        assert_eq!(
            Error::unknown_module("cpux").to_string(),
            "invalid module name: cpux"
        );
        assert_eq!(
            Error::UnknownConfigProperty("config.nope".into()).to_string(),
            "unknown config property: config.nope"
        );
    }

    #[test]
    fn test_unclosed_diagnostic() {
        let diag = Diagnostic::unclosed('>', "$<cpu.name");
        assert_eq!(diag.kind, DiagnosticKind::UnclosedTag { delimiter: '>' });
        assert_eq!(
            diag.to_string(),
            "missing tag close bracket '>' in string '$<cpu.name'"
        );
    }
}
