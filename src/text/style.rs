//! Style primitives: colors, modifiers and the spans that carry them.

use bitflags::bitflags;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parse the digits of a hex color, without the leading `#`.
    ///
    /// Accepts `RGB`, `RRGGBB` and `AARRGGBB` (alpha is ignored).
    pub fn parse_hex(digits: &str) -> Option<Self> {
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            3 => {
                let expand = |nibble: u32| ((nibble & 0xF) * 0x11) as u8;
                Some(Self::new(expand(value >> 8), expand(value >> 4), expand(value)))
            }
            6 | 8 => Some(Self::from_u32(value & 0x00FF_FFFF)),
            _ => None,
        }
    }

    /// Mix two colors; `ratio` 0.0 keeps `self`, 1.0 yields `other`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn blend(self, other: Self, ratio: f32) -> Self {
        let inverse = 1.0 - ratio;
        let mix = |a: u8, b: u8| f32::from(a).mul_add(inverse, f32::from(b) * ratio) as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use tagfetch::text::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::ITALIC;
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Italic text
        const ITALIC = 0b0000_0010;
        /// Underlined text
        const UNDERLINE = 0b0000_0100;
        /// Blinking text
        const BLINK = 0b0000_1000;
        /// Strikethrough text
        const STRIKETHROUGH = 0b0001_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// One style annotation attached to a range of a [`RichText`](super::RichText).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Span {
    /// Foreground color.
    Foreground(Rgb),
    /// Background color.
    Background(Rgb),
    /// Weight, slant, underline, strikethrough...
    Emphasis(Modifiers),
}

/// The combined effect of every span covering one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    /// Foreground color, terminal default when `None`.
    pub fg: Option<Rgb>,
    /// Background color, terminal default when `None`.
    pub bg: Option<Rgb>,
    /// Active modifiers.
    pub modifiers: Modifiers,
}

impl Style {
    /// The unstyled default.
    pub const PLAIN: Self = Self {
        fg: None,
        bg: None,
        modifiers: Modifiers::empty(),
    };

    /// Layer a span on top of this style. Later spans win for colors.
    #[inline]
    pub fn apply(&mut self, span: Span) {
        match span {
            Span::Foreground(color) => self.fg = Some(color),
            Span::Background(color) => self.bg = Some(color),
            Span::Emphasis(modifiers) => self.modifiers |= modifiers,
        }
    }

    /// True when nothing is set.
    #[inline]
    pub const fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.modifiers.is_empty()
    }
}
