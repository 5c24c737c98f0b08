//! `RichText`: a text buffer with out-of-band style ranges.
//!
//! Styles never live inside the text itself, so the visible text of a
//! `RichText` is always exactly what gets measured for alignment.
//!
//! Range offsets are counted in `char`s, not bytes.

use super::style::{Span, Style};
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A span applied over `start..end` (char offsets, end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledRange {
    /// The style annotation.
    pub span: Span,
    /// First styled char.
    pub start: usize,
    /// One past the last styled char.
    pub end: usize,
}

/// Growable styled text.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RichText {
    text: String,
    /// Cached char count of `text`.
    chars: usize,
    /// Ordered by application; later ranges win on conflicts.
    ranges: Vec<StyledRange>,
}

impl RichText {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            chars: 0,
            ranges: Vec::new(),
        }
    }

    /// Create an unstyled buffer holding `text`.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = text.chars().count();
        Self {
            text,
            chars,
            ranges: Vec::new(),
        }
    }

    /// The visible text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    #[inline]
    pub const fn len(&self) -> usize {
        self.chars
    }

    /// Check if the buffer holds no text.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.chars == 0
    }

    /// Terminal column width of the visible text.
    pub fn width(&self) -> usize {
        UnicodeWidthStr::width(self.text.as_str())
    }

    /// Number of user-perceived characters.
    pub fn glyph_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Style ranges in application order.
    #[inline]
    pub fn ranges(&self) -> &[StyledRange] {
        &self.ranges
    }

    /// True if any style range is attached.
    #[inline]
    pub fn is_styled(&self) -> bool {
        !self.ranges.is_empty()
    }

    /// Check whether the visible text contains `needle`.
    #[inline]
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    /// Append one unstyled char.
    pub fn push(&mut self, c: char) {
        self.text.push(c);
        self.chars += 1;
    }

    /// Append unstyled text.
    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.chars += s.chars().count();
    }

    /// Append another buffer, carrying its ranges along.
    pub fn append(&mut self, other: &Self) {
        let offset = self.chars;
        self.text.push_str(&other.text);
        self.chars += other.chars;
        self.ranges.extend(other.ranges.iter().map(|r| StyledRange {
            span: r.span,
            start: r.start + offset,
            end: r.end + offset,
        }));
    }

    /// Insert unstyled text at char offset `at` (clamped to the length).
    ///
    /// Ranges that start at or after `at` move right; ranges that strictly
    /// contain `at` grow to cover the insertion.
    pub fn insert_str(&mut self, at: usize, s: &str) {
        let at = at.min(self.chars);
        let count = s.chars().count();
        if count == 0 {
            return;
        }
        let byte = self.byte_offset(at);
        self.text.insert_str(byte, s);
        self.chars += count;
        for range in &mut self.ranges {
            if range.start >= at {
                range.start += count;
                range.end += count;
            } else if range.end > at {
                range.end += count;
            }
        }
    }

    /// Insert another buffer at char offset `at`, carrying its ranges along.
    pub fn insert(&mut self, at: usize, other: &Self) {
        let at = at.min(self.chars);
        self.insert_str(at, &other.text);
        self.ranges.extend(other.ranges.iter().map(|r| StyledRange {
            span: r.span,
            start: r.start + at,
            end: r.end + at,
        }));
    }

    /// Lay `other`'s ranges over this buffer starting at char offset `at`,
    /// on top of every existing range. The text is left alone.
    pub fn layer_ranges(&mut self, at: usize, other: &Self) {
        let len = self.chars;
        self.ranges.extend(other.ranges.iter().filter_map(|r| {
            let start = r.start + at;
            let end = (r.end + at).min(len);
            (start < end).then_some(StyledRange {
                span: r.span,
                start,
                end,
            })
        }));
    }

    /// Apply `span` over `start..end`.
    ///
    /// A range with the same span and start is updated in place, so
    /// re-applying an open style after every append keeps a single range.
    pub fn set_span(&mut self, span: Span, start: usize, end: usize) {
        let end = end.min(self.chars);
        if start >= end {
            return;
        }
        if let Some(range) = self
            .ranges
            .iter_mut()
            .find(|r| r.span == span && r.start == start)
        {
            range.end = end;
        } else {
            self.ranges.push(StyledRange { span, start, end });
        }
    }

    /// The combined style at char offset `index`.
    pub fn style_at(&self, index: usize) -> Style {
        let mut style = Style::PLAIN;
        for range in &self.ranges {
            if range.start <= index && index < range.end {
                style.apply(range.span);
            }
        }
        style
    }

    /// Split the text into maximal runs sharing one style.
    pub fn runs(&self) -> Vec<(Style, &str)> {
        let mut runs: Vec<(Style, &str)> = Vec::new();
        let mut run_style = Style::PLAIN;
        let mut run_start = 0;

        for (index, (byte, _)) in self.text.char_indices().enumerate() {
            let style = self.style_at(index);
            if index == 0 {
                run_style = style;
            } else if style != run_style {
                runs.push((run_style, &self.text[run_start..byte]));
                run_style = style;
                run_start = byte;
            }
        }
        if run_start < self.text.len() {
            runs.push((run_style, &self.text[run_start..]));
        }
        runs
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(byte, _)| byte)
    }
}

impl From<&str> for RichText {
    fn from(s: &str) -> Self {
        Self::plain(s)
    }
}

impl From<String> for RichText {
    fn from(s: String) -> Self {
        Self::plain(s)
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RichText")
            .field("text", &self.text)
            .field("ranges", &self.ranges)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{Modifiers, Rgb};

    const RED: Span = Span::Foreground(Rgb::new(255, 0, 0));
    const BOLD: Span = Span::Emphasis(Modifiers::BOLD);

    #[test]
    fn test_len_counts_chars_not_bytes() {
        let text = RichText::plain("héllo");
        assert_eq!(text.len(), 5);
        assert_eq!(text.as_str().len(), 6);
    }

    #[test]
    fn test_width_and_glyphs() {
        let text = RichText::plain("日本e\u{301}");
        assert_eq!(text.width(), 5);
        assert_eq!(text.glyph_count(), 3);
    }

    #[test]
    fn test_set_span_merges_same_start() {
        let mut text = RichText::plain("ab");
        text.set_span(RED, 0, 1);
        text.push('c');
        text.set_span(RED, 0, 3);

        assert_eq!(
            text.ranges(),
            &[StyledRange {
                span: RED,
                start: 0,
                end: 3
            }]
        );
    }

    #[test]
    fn test_set_span_ignores_empty_range() {
        let mut text = RichText::plain("ab");
        text.set_span(RED, 2, 2);
        text.set_span(RED, 1, 9);
        assert_eq!(text.ranges().len(), 1);
        assert_eq!(text.ranges()[0].end, 2);
    }

    #[test]
    fn test_append_shifts_ranges() {
        let mut left = RichText::plain("ab");
        let mut right = RichText::plain("cd");
        right.set_span(BOLD, 0, 2);
        left.append(&right);

        assert_eq!(left.as_str(), "abcd");
        assert_eq!(left.ranges()[0].start, 2);
        assert_eq!(left.ranges()[0].end, 4);
    }

    #[test]
    fn test_insert_str_moves_and_grows() {
        let mut text = RichText::plain("abcdef");
        text.set_span(RED, 2, 4);
        text.set_span(BOLD, 0, 6);
        text.insert_str(0, "  ");

        assert_eq!(text.as_str(), "  abcdef");
        assert_eq!((text.ranges()[0].start, text.ranges()[0].end), (4, 6));
        assert_eq!((text.ranges()[1].start, text.ranges()[1].end), (2, 8));

        text.insert_str(5, "X");
        assert_eq!(text.as_str(), "  abcXdef");
        assert_eq!((text.ranges()[0].start, text.ranges()[0].end), (4, 7));
    }

    #[test]
    fn test_insert_rich_at_offset() {
        let mut line = RichText::plain("   info");
        let mut art = RichText::plain("##");
        art.set_span(RED, 0, 2);
        line.insert(1, &art);

        assert_eq!(line.as_str(), " ##  info");
        assert_eq!(line.style_at(1).fg, Some(Rgb::new(255, 0, 0)));
        assert_eq!(line.style_at(3).fg, None);
    }

    #[test]
    fn test_layer_ranges_wins_over_existing() {
        let green = Span::Foreground(Rgb::new(0, 255, 0));
        let mut inner = RichText::plain("ok");
        inner.set_span(green, 0, 2);

        let mut outer = RichText::plain("> ok");
        outer.set_span(RED, 0, 4);
        outer.layer_ranges(2, &inner);

        assert_eq!(outer.style_at(0).fg, Some(Rgb::new(255, 0, 0)));
        assert_eq!(outer.style_at(3).fg, Some(Rgb::new(0, 255, 0)));
    }

    #[test]
    fn test_runs_split_on_style_change() {
        let mut text = RichText::plain("aabbcc");
        text.set_span(RED, 2, 4);
        let runs = text.runs();

        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].1, "aa");
        assert_eq!(runs[1].1, "bb");
        assert_eq!(runs[1].0.fg, Some(Rgb::new(255, 0, 0)));
        assert!(runs[2].0.is_plain());
    }

    #[test]
    fn test_runs_empty_text() {
        assert!(RichText::new().runs().is_empty());
    }
}
