//! Cursor over a template and the plain-text projection kept beside it.

/// Char cursor over a template.
#[derive(Debug, Clone)]
pub(crate) struct Scanner {
    src: Vec<char>,
    pos: usize,
}

impl Scanner {
    pub(crate) fn new(src: &str) -> Self {
        Self {
            src: src.chars().collect(),
            pos: 0,
        }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Consume `c` if it is next.
    #[inline]
    pub(crate) fn try_read(&mut self, c: char) -> bool {
        if self.src.get(self.pos) == Some(&c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    #[inline]
    pub(crate) fn read_char(&mut self) -> Option<char> {
        let c = self.src.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }

    #[inline]
    pub(crate) fn rewind(&mut self, count: usize) {
        self.pos = self.pos.saturating_sub(count);
    }

    pub(crate) fn source(&self) -> String {
        self.src.iter().collect()
    }
}

/// The template with every resolved top-level tag substituted in place.
///
/// Starts as a copy of the template. The cursor marks how much has been
/// resolved; everything after it is still raw template text.
#[derive(Debug, Clone)]
pub(crate) struct PlainProjection {
    text: Vec<char>,
    cursor: usize,
}

impl PlainProjection {
    pub(crate) fn new(src: &str) -> Self {
        Self {
            text: src.chars().collect(),
            cursor: 0,
        }
    }

    /// Keep `count` raw chars as they are.
    #[inline]
    pub(crate) fn advance(&mut self, count: usize) {
        self.cursor = (self.cursor + count).min(self.text.len());
    }

    /// Replace the next `raw_len` raw chars with `replacement`.
    pub(crate) fn substitute(&mut self, raw_len: usize, replacement: &str) {
        let end = (self.cursor + raw_len).min(self.text.len());
        let inserted = replacement.chars().count();
        self.text.splice(self.cursor..end, replacement.chars());
        self.cursor += inserted;
    }

    pub(crate) fn into_string(self) -> String {
        self.text.into_iter().collect()
    }
}
