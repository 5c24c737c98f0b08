//! `Compositor`: places the parsed ascii art beside the parsed info lines.

use crate::config::{Config, LogoPosition};
use crate::parse::Parsed;
use crate::text::RichText;
use unicode_width::UnicodeWidthStr;

/// One parsed line of ascii art and its visible width.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtLine {
    /// Styled art.
    pub rich: RichText,
    /// Width in columns, measured on the plain projection so color tags
    /// never count.
    pub width: usize,
}

impl ArtLine {
    /// Create an art line with a known width.
    pub const fn new(rich: RichText, width: usize) -> Self {
        Self { rich, width }
    }

    /// An empty line, used for top padding.
    pub const fn blank() -> Self {
        Self {
            rich: RichText::new(),
            width: 0,
        }
    }

    /// Take both projections of a parsed art line.
    pub fn from_parsed(parsed: Parsed) -> Self {
        let width = parsed.plain.width();
        Self {
            rich: parsed.rich,
            width,
        }
    }
}

/// Joins art and info lines according to the logo position.
#[derive(Debug, Clone, Copy)]
pub struct Compositor<'c> {
    config: &'c Config,
}

impl<'c> Compositor<'c> {
    /// Create a compositor for one configuration.
    pub const fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Column where the info text starts when the art is on the left.
    pub fn info_column(&self, art: &[ArtLine]) -> usize {
        let widest = art.iter().map(|line| line.width).max().unwrap_or(0);
        let gap = if self.config.disable_source {
            1
        } else {
            self.config.offset
        };
        self.config.logo_padding_left + widest + gap
    }

    /// Produce the final lines. Both inputs are taken without top padding;
    /// lines that should disappear must already be filtered out of `info`.
    pub fn compose(&self, mut art: Vec<ArtLine>, mut info: Vec<RichText>) -> Vec<RichText> {
        let config = self.config;
        art.splice(
            0..0,
            std::iter::repeat_with(ArtLine::blank).take(config.logo_padding_top),
        );
        info.splice(
            0..0,
            std::iter::repeat_with(RichText::new).take(config.layout_padding_top),
        );

        match config.logo_position {
            LogoPosition::Top => art.into_iter().map(|line| line.rich).chain(info).collect(),
            LogoPosition::Bottom => info
                .into_iter()
                .chain(art.into_iter().map(|line| line.rich))
                .collect(),
            LogoPosition::Left => self.side_by_side(art, info),
        }
    }

    fn side_by_side(&self, art: Vec<ArtLine>, info: Vec<RichText>) -> Vec<RichText> {
        let padding = " ".repeat(self.config.logo_padding_left);
        let column = self.info_column(&art);
        let mut lines = Vec::with_capacity(info.len().max(art.len()));

        let mut art = art.into_iter();
        for text in info {
            let mut line = RichText::plain(padding.as_str());
            let art_width = art.next().map_or(0, |art_line| {
                line.append(&art_line.rich);
                art_line.width
            });
            let used = padding.len() + art_width;
            line.push_str(&" ".repeat(column.saturating_sub(used)));
            line.append(&text);
            lines.push(line);
        }

        for art_line in art {
            let mut line = RichText::plain(padding.as_str());
            line.append(&art_line.rich);
            lines.push(line);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{Rgb, Span};
    use pretty_assertions::assert_eq;

    fn art(lines: &[&str]) -> Vec<ArtLine> {
        lines
            .iter()
            .map(|line| ArtLine::new(RichText::plain(*line), line.width()))
            .collect()
    }

    fn info(lines: &[&str]) -> Vec<RichText> {
        lines.iter().map(|line| RichText::plain(*line)).collect()
    }

    fn strings(lines: &[RichText]) -> Vec<&str> {
        lines.iter().map(RichText::as_str).collect()
    }

    #[test]
    fn test_left_aligns_info_column() {
        let config = Config {
            offset: 2,
            ..Config::default()
        };
        let lines = Compositor::new(&config).compose(art(&["abc", "abcde"]), info(&["one", "two"]));

        assert_eq!(strings(&lines), vec!["abc    one", "abcde  two"]);
        assert_eq!(lines[1].as_str().find("two"), Some(7));
    }

    #[test]
    fn test_styled_art_width_from_plain_projection() {
        let config = Config {
            offset: 2,
            ..Config::default()
        };
        let mut styled = RichText::plain("abc");
        styled.set_span(Span::Foreground(Rgb::new(255, 0, 0)), 0, 3);
        let art = vec![ArtLine::new(styled, 3), ArtLine::new(RichText::plain("abcde"), 5)];
        let lines = Compositor::new(&config).compose(art, info(&["one", "two"]));

        assert_eq!(lines[0].as_str().find("one"), Some(7));
        assert_eq!(lines[0].style_at(0).fg, Some(Rgb::new(255, 0, 0)));
        assert_eq!(lines[0].style_at(3).fg, None);
    }

    #[test]
    fn test_extra_lines_on_either_side() {
        let config = Config {
            offset: 1,
            logo_padding_left: 1,
            ..Config::default()
        };
        let compositor = Compositor::new(&config);

        let lines = compositor.compose(art(&["#"]), info(&["a", "b"]));
        assert_eq!(strings(&lines), vec![" # a", "   b"]);

        let lines = compositor.compose(art(&["#", "##", "#"]), info(&["a"]));
        assert_eq!(strings(&lines), vec![" #  a", " ##", " #"]);
    }

    #[test]
    fn test_top_padding() {
        let config = Config {
            offset: 1,
            logo_padding_top: 1,
            layout_padding_top: 2,
            ..Config::default()
        };
        let lines = Compositor::new(&config).compose(art(&["#"]), info(&["a"]));

        assert_eq!(strings(&lines), vec!["  ", "# ", "  a"]);
    }

    #[test]
    fn test_disabled_source_uses_single_gap() {
        let config = Config {
            disable_source: true,
            ..Config::default()
        };
        let lines = Compositor::new(&config).compose(Vec::new(), info(&["a"]));

        assert_eq!(strings(&lines), vec![" a"]);
    }

    #[test]
    fn test_top_and_bottom_stack() {
        let mut config = Config {
            logo_position: LogoPosition::Top,
            ..Config::default()
        };
        let lines = Compositor::new(&config).compose(art(&["#"]), info(&["a", "b"]));
        assert_eq!(strings(&lines), vec!["#", "a", "b"]);

        config.logo_position = LogoPosition::Bottom;
        let lines = Compositor::new(&config).compose(art(&["#"]), info(&["a", "b"]));
        assert_eq!(strings(&lines), vec!["a", "b", "#"]);
    }

    #[test]
    fn test_from_parsed_measures_wide_glyphs() {
        let parsed = Parsed {
            rich: RichText::plain("日本"),
            plain: "日本".to_owned(),
        };
        assert_eq!(ArtLine::from_parsed(parsed).width, 4);
    }
}
