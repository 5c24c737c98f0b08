//! Terminal module: writing finished renders.
//!
//! This module contains:
//! - [`TerminalOutput`]: buffered single-write output with TTY detection

mod output;

pub use output::TerminalOutput;
