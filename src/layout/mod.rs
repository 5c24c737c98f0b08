//! Layout module: composing the final lines.
//!
//! Art widths are measured once while the art is parsed. Compositing is a
//! single pass over the info lines with no re-measuring.

mod compose;

pub use compose::{ArtLine, Compositor};
