//! `TerminalOutput`: single-write output buffer for rendered lines.

use crate::render::RenderOutput;
use crate::text::{ansi, RichText};
use crossterm::tty::IsTty;
use std::io::{self, Write};

/// Pre-allocated buffer holding a whole render.
///
/// All lines are accumulated here, then flushed in a single `write()` so
/// the info block appears at once.
pub struct TerminalOutput {
    data: Vec<u8>,
    colors: bool,
}

impl TerminalOutput {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            colors: true,
        }
    }

    /// Create a buffer sized for a typical render (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Create a buffer for stdout, emitting colors only when stdout is a
    /// terminal.
    pub fn for_stdout() -> Self {
        Self::new().with_colors(io::stdout().is_tty())
    }

    /// Enable or disable escape sequences.
    #[must_use]
    pub const fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Whether escape sequences are written.
    #[inline]
    pub const fn colors(&self) -> bool {
        self.colors
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write one line followed by a newline.
    pub fn write_line(&mut self, line: &RichText, reset_after: bool) {
        if self.colors {
            ansi::encode_line(line, &mut self.data, reset_after);
        } else {
            self.data.extend_from_slice(line.as_str().as_bytes());
        }
        self.data.push(b'\n');
    }

    /// Write every line of a render.
    pub fn write_render(&mut self, output: &RenderOutput) {
        for line in &output.lines {
            self.write_line(line, output.styled);
        }
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TerminalOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalOutput")
            .field("len", &self.data.len())
            .field("colors", &self.colors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{Rgb, Span};

    fn styled_output() -> RenderOutput {
        let mut first = RichText::plain("CPU: Ryzen");
        first.set_span(Span::Foreground(Rgb::new(255, 0, 0)), 0, 3);
        RenderOutput {
            lines: vec![first, RichText::plain("RAM: 4 GiB")],
            diagnostics: Vec::new(),
            styled: true,
        }
    }

    #[test]
    fn test_plain_output_has_no_escapes() {
        let mut out = TerminalOutput::new().with_colors(false);
        out.write_render(&styled_output());

        assert_eq!(out.as_bytes(), b"CPU: Ryzen\nRAM: 4 GiB\n");
    }

    #[test]
    fn test_colored_output_on_screen() {
        let mut out = TerminalOutput::new();
        out.write_render(&styled_output());

        // Raw newlines only move down; the emulator needs the carriage return.
        let bytes: Vec<u8> = out
            .as_bytes()
            .iter()
            .flat_map(|&b| if b == b'\n' { vec![b'\r', b'\n'] } else { vec![b] })
            .collect();
        let mut parser = vt100::Parser::new(4, 40, 0);
        parser.process(&bytes);
        let screen = parser.screen();

        assert_eq!(screen.contents(), "CPU: Ryzen\nRAM: 4 GiB");
        let cell = screen.cell(0, 0).unwrap();
        assert_eq!(cell.fgcolor(), vt100::Color::Rgb(255, 0, 0));
        let cell = screen.cell(0, 3).unwrap();
        assert_eq!(cell.fgcolor(), vt100::Color::Default);
    }

    #[test]
    fn test_flush_and_clear() {
        let mut out = TerminalOutput::new().with_colors(false);
        out.write_str("hello");
        assert_eq!(out.len(), 5);

        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hello");

        out.clear();
        assert!(out.is_empty());
    }
}
