//! # Tagfetch
//!
//! A system-information renderer driven by a small tag template language.
//!
//! A layout is a list of template lines. Tags inside them are replaced by
//! system metrics and colors, and the result is composited beside an ASCII
//! art logo.
//!
//! ## Core Concepts
//!
//! - **Tags**: `$<module.member>` values, `$[a,b,yes,no]` conditionals,
//!   `${color}` styles and `$%part,total%` percentages
//! - **Out-of-band styling**: colors live beside the text, so alignment is
//!   measured on what the terminal actually shows
//! - **Memoized metrics**: every member is queried at most once per render
//! - **Line dropping**: lines whose data is missing vanish from the output
//!
//! ## Example
//!
//! ```rust
//! use tagfetch::{render, Config, FixedProviders};
//!
//! let config = Config {
//!     layout: vec!["${red}OS:${0} $<os.name>".to_owned()],
//!     ..Config::default()
//! };
//! let mut providers = FixedProviders::new();
//!
//! let output = render(&config, &mut providers, "/\\\n\\/").unwrap();
//! assert_eq!(output.lines.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod cache;
pub mod config;
pub mod error;
pub mod layout;
pub mod module;
pub mod parse;
pub mod provider;
pub mod render;
pub mod terminal;
pub mod text;
pub mod value;

// Re-exports for convenience
pub use cache::MetricCache;
pub use config::{Config, LogoPosition};
pub use error::{Diagnostic, DiagnosticKind, Error, Result};
pub use module::MAGIC_LINE;
pub use parse::{parse, parse_plain, Parsed, RenderContext};
pub use provider::{FixedProviders, Providers, SystemProviders};
pub use render::{render, RenderOutput};
pub use terminal::TerminalOutput;
pub use text::{RichText, Rgb, Span, Style};
pub use value::TaggedValue;
