//! ANSI encoding: turn a styled line into SGR escape sequences.
//!
//! Tracks the last emitted style so only changes are written, and falls back
//! to a full reset when an attribute has to be switched off.

use super::rich::RichText;
use super::style::{Modifiers, Rgb, Style};
use std::io::Write;

/// Full SGR reset.
pub const RESET: &str = "\x1b[0m";

/// Last style written to the stream.
#[derive(Debug, Clone, Copy, Default)]
struct SgrState {
    current: Style,
}

impl SgrState {
    fn transition(&mut self, output: &mut Vec<u8>, next: Style) {
        if next == self.current {
            return;
        }

        // Dropping a modifier or a color has no direct SGR, so start over.
        let removed_mods = self.current.modifiers.difference(next.modifiers);
        let dropped_color = (self.current.fg.is_some() && next.fg.is_none())
            || (self.current.bg.is_some() && next.bg.is_none());
        if !removed_mods.is_empty() || dropped_color {
            output.extend_from_slice(RESET.as_bytes());
            self.current = Style::PLAIN;
        }

        if let Some(fg) = next.fg {
            if self.current.fg != Some(fg) {
                emit_fg_color(output, fg);
            }
        }
        if let Some(bg) = next.bg {
            if self.current.bg != Some(bg) {
                emit_bg_color(output, bg);
            }
        }
        emit_modifier_set(output, next.modifiers.difference(self.current.modifiers));

        self.current = next;
    }
}

/// Encode one line, appending to `output`.
///
/// With `reset_after` the line always ends in a reset, even when it is
/// unstyled, so the terminal state cannot leak into whatever follows.
pub fn encode_line(line: &RichText, output: &mut Vec<u8>, reset_after: bool) {
    let mut state = SgrState::default();
    for (style, text) in line.runs() {
        state.transition(output, style);
        output.extend_from_slice(text.as_bytes());
    }
    if reset_after || !state.current.is_plain() {
        output.extend_from_slice(RESET.as_bytes());
    }
}

/// Encode one line into a fresh string.
pub fn to_ansi(line: &RichText, reset_after: bool) -> String {
    let mut output = Vec::with_capacity(line.as_str().len() + 16);
    encode_line(line, &mut output, reset_after);
    String::from_utf8_lossy(&output).into_owned()
}

/// Emit a foreground color sequence (true color).
#[inline]
fn emit_fg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
}

/// Emit a background color sequence (true color).
#[inline]
fn emit_bg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
}

/// Emit SGR sequences for a set of modifiers.
fn emit_modifier_set(output: &mut Vec<u8>, modifiers: Modifiers) {
    const CODES: [(Modifiers, &[u8]); 5] = [
        (Modifiers::BOLD, b"\x1b[1m"),
        (Modifiers::ITALIC, b"\x1b[3m"),
        (Modifiers::UNDERLINE, b"\x1b[4m"),
        (Modifiers::BLINK, b"\x1b[5m"),
        (Modifiers::STRIKETHROUGH, b"\x1b[9m"),
    ];
    for (flag, code) in CODES {
        if modifiers.contains(flag) {
            output.extend_from_slice(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Span;

    #[test]
    fn test_plain_line_has_no_escapes() {
        assert_eq!(to_ansi(&RichText::plain("hello"), false), "hello");
        assert_eq!(to_ansi(&RichText::plain("hello"), true), "hello\x1b[0m");
    }

    #[test]
    fn test_colored_run_then_plain() {
        let mut line = RichText::plain("abcd");
        line.set_span(Span::Foreground(Rgb::new(255, 0, 0)), 0, 2);

        assert_eq!(to_ansi(&line, false), "\x1b[38;2;255;0;0mab\x1b[0mcd");
    }

    #[test]
    fn test_trailing_style_is_reset() {
        let mut line = RichText::plain("ab");
        line.set_span(Span::Emphasis(Modifiers::BOLD), 1, 2);

        assert_eq!(to_ansi(&line, false), "a\x1b[1mb\x1b[0m");
    }

    #[test]
    fn test_vt100_sees_colors() {
        let mut line = RichText::plain("RGx");
        line.set_span(Span::Foreground(Rgb::new(255, 0, 0)), 0, 1);
        line.set_span(Span::Foreground(Rgb::new(0, 255, 0)), 1, 2);
        line.set_span(Span::Emphasis(Modifiers::BOLD), 0, 2);

        let mut parser = vt100::Parser::new(2, 10, 0);
        parser.process(to_ansi(&line, true).as_bytes());
        let screen = parser.screen();

        let red = screen.cell(0, 0).unwrap();
        assert_eq!(red.contents(), "R");
        assert_eq!(red.fgcolor(), vt100::Color::Rgb(255, 0, 0));
        assert!(red.bold());

        let green = screen.cell(0, 1).unwrap();
        assert_eq!(green.fgcolor(), vt100::Color::Rgb(0, 255, 0));
        assert!(green.bold());

        let plain = screen.cell(0, 2).unwrap();
        assert_eq!(plain.fgcolor(), vt100::Color::Default);
        assert!(!plain.bold());
    }
}
