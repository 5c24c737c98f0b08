//! `TaggedValue`: the value stored for one resolved module member.

use crate::text::RichText;
use std::fmt;

/// A resolved module member.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedValue {
    /// Plain text.
    Text(String),
    /// Styled text, re-emitted with its styles.
    Rich(RichText),
    /// Unsigned integer, printed in decimal.
    Count(u64),
    /// Floating point, printed with two decimals.
    Real(f64),
}

impl TaggedValue {
    /// Convert to rich text for insertion into a parse buffer.
    pub fn to_rich(&self) -> RichText {
        match self {
            Self::Rich(rich) => rich.clone(),
            other => RichText::plain(other.to_string()),
        }
    }
}

impl fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Rich(rich) => f.write_str(rich.as_str()),
            Self::Count(count) => write!(f, "{count}"),
            Self::Real(real) => write!(f, "{real:.2}"),
        }
    }
}

impl From<String> for TaggedValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for TaggedValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<RichText> for TaggedValue {
    fn from(rich: RichText) -> Self {
        Self::Rich(rich)
    }
}

impl From<u64> for TaggedValue {
    fn from(count: u64) -> Self {
        Self::Count(count)
    }
}

impl From<f64> for TaggedValue {
    fn from(real: f64) -> Self {
        Self::Real(real)
    }
}
