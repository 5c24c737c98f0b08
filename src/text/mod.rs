//! Text module: styled text produced by the template parser.
//!
//! This module contains:
//! - [`RichText`]: text plus out-of-band style ranges
//! - [`Rgb`], [`Modifiers`], [`Span`], [`Style`]: style primitives
//! - [`ansi`]: SGR encoding of finished lines

pub mod ansi;
mod rich;
mod style;

pub use rich::{RichText, StyledRange};
pub use style::{Modifiers, Rgb, Span, Style};
