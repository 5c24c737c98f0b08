//! Parse module: the template language.
//!
//! ```text
//! \c               literal c
//! $<module>        whole-module summary
//! $<module.member> one member
//! $[A,B,T,F]       T if A == B, else F
//! ${color}         open a color, ${0} and ${1} reset
//! $%a,b%           a/b as a colored percentage, $%!a,b% inverts the colors
//! ```
//!
//! This module contains:
//! - [`RenderContext`]: state shared by every parse of one render
//! - [`StyleStack`]: styles applied to text as it is appended
//! - [`parse`], [`parse_plain`], [`parse_line`]: entry points

mod color;
mod context;
mod scanner;

pub use context::{ActiveStyle, RenderContext, StyleStack};

use crate::error::{Diagnostic, Result};
use crate::module;
use crate::text::RichText;
use scanner::{PlainProjection, Scanner};

/// Both projections of one parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// Styled output.
    pub rich: RichText,
    /// The template with every tag substituted, used for width measurement.
    pub plain: String,
}

/// Parse a template into styled text.
pub fn parse(template: &str, ctx: &mut RenderContext<'_>) -> Result<RichText> {
    parse_line(template, ctx).map(|parsed| parsed.rich)
}

/// Parse a template and keep only the substituted plain text.
pub fn parse_plain(template: &str, ctx: &mut RenderContext<'_>) -> Result<String> {
    parse_line(template, ctx).map(|parsed| parsed.plain)
}

/// Parse a template into both projections. Styles still open at the end
/// are closed.
pub fn parse_line(template: &str, ctx: &mut RenderContext<'_>) -> Result<Parsed> {
    TagParser::new(ctx, template).run()
}

/// Parse a generated template without disturbing the caller's open styles.
pub(crate) fn parse_nested(template: &str, ctx: &mut RenderContext<'_>) -> Result<RichText> {
    let saved = ctx.styles.suspend();
    let result = TagParser::new(ctx, template).run();
    ctx.styles.resume(saved);
    result.map(|parsed| parsed.rich)
}

/// A parsed sub-expression and whether its delimiter was found.
struct Bounded {
    text: RichText,
    closed: bool,
    /// Open styles seen by this parse, with their start in `text`.
    starts: Vec<(u32, usize)>,
}

impl Bounded {
    /// A finished value with no styles of its own still open.
    const fn value(text: RichText) -> Self {
        Self {
            text,
            closed: true,
            starts: Vec::new(),
        }
    }
}

struct TagParser<'p, 'a> {
    ctx: &'p mut RenderContext<'a>,
    scanner: Scanner,
    plain: PlainProjection,
    depth: usize,
    unclosed_reported: bool,
}

impl<'p, 'a> TagParser<'p, 'a> {
    fn new(ctx: &'p mut RenderContext<'a>, template: &str) -> Self {
        Self {
            ctx,
            scanner: Scanner::new(template),
            plain: PlainProjection::new(template),
            depth: 0,
            unclosed_reported: false,
        }
    }

    fn run(mut self) -> Result<Parsed> {
        let body = self.parse(true, None)?;
        self.ctx.styles.clear();
        Ok(Parsed {
            rich: body.text,
            plain: self.plain.into_string(),
        })
    }

    /// Parse until `until` (consumed) or end of input.
    ///
    /// With `evaluate` off the text is only scanned: tags consume their
    /// syntax but resolve nothing and touch no state.
    fn parse(&mut self, evaluate: bool, until: Option<char>) -> Result<Bounded> {
        let top = self.depth == 0;
        self.depth += 1;

        let mut out = RichText::new();
        let mut starts: Vec<(u32, usize)> = Vec::new();
        let closed = loop {
            if let Some(delimiter) = until {
                if self.scanner.try_read(delimiter) {
                    break true;
                }
            }
            if self.scanner.is_eof() {
                break until.is_none();
            }

            let tag_start = self.scanner.pos();
            let before = out.len();
            if self.scanner.try_read('\\') {
                match self.scanner.read_char() {
                    Some(c) => {
                        out.push(c);
                        if top {
                            self.plain.substitute(2, c.encode_utf8(&mut [0; 4]));
                        }
                    }
                    None => {
                        out.push('\\');
                        if top {
                            self.plain.advance(1);
                        }
                    }
                }
            } else if let Some(piece) = self.parse_tag(evaluate)? {
                if top {
                    let raw_len = self.scanner.pos() - tag_start;
                    self.plain.substitute(raw_len, piece.text.as_str());
                }
                out.push_str(piece.text.as_str());
                // Styles opened inside the piece start where their tag was.
                for (id, start) in piece.starts {
                    if !starts.iter().any(|(seen, _)| *seen == id) {
                        starts.push((id, before + start));
                    }
                }
                self.extend_styles(&mut out, &mut starts, before);
                // The piece's own styles win over the ones open around it.
                out.layer_ranges(before, &piece.text);
                continue;
            } else if let Some(c) = self.scanner.read_char() {
                out.push(c);
                if top {
                    self.plain.advance(1);
                }
            }
            self.extend_styles(&mut out, &mut starts, before);
        };

        self.depth -= 1;
        if !closed && !self.unclosed_reported {
            if let Some(delimiter) = until {
                self.unclosed_reported = true;
                let source = self.scanner.source();
                self.ctx.report(Diagnostic::unclosed(delimiter, &source));
            }
        }
        Ok(Bounded {
            text: out,
            closed,
            starts,
        })
    }

    /// Stretch every open style over what was just appended.
    fn extend_styles(&self, out: &mut RichText, starts: &mut Vec<(u32, usize)>, before: usize) {
        if self.ctx.styling_suppressed() {
            return;
        }
        for style in self.ctx.styles.active() {
            let start = if let Some(&(_, start)) = starts.iter().find(|(id, _)| *id == style.id) {
                start
            } else {
                starts.push((style.id, before));
                before
            };
            out.set_span(style.span, start, out.len());
        }
    }

    /// Try every tag at the cursor. `None` if there is no tag here.
    fn parse_tag(&mut self, evaluate: bool) -> Result<Option<Bounded>> {
        if !self.scanner.try_read('$') {
            return Ok(None);
        }
        let piece = if self.scanner.try_read('[') {
            self.conditional_tag(evaluate)?
        } else if self.scanner.try_read('<') {
            self.info_tag(evaluate)?
        } else if self.scanner.try_read('{') {
            self.color_tag(evaluate)?
        } else if self.scanner.try_read('%') {
            self.percentage_tag(evaluate)?
        } else {
            self.scanner.rewind(1);
            return Ok(None);
        };
        Ok(Some(piece))
    }

    /// `$[A,B,T,F]`
    fn conditional_tag(&mut self, evaluate: bool) -> Result<Bounded> {
        let lhs = self.parse(evaluate, Some(','))?;
        if !lhs.closed {
            return Ok(lhs);
        }
        let rhs = self.parse(evaluate, Some(','))?;
        if !rhs.closed {
            return Ok(rhs);
        }

        let taken = lhs.text.as_str() == rhs.text.as_str();
        let when_true = self.parse(evaluate && taken, Some(','))?;
        if !when_true.closed {
            return Ok(when_true);
        }
        let when_false = self.parse(evaluate && !taken, Some(']'))?;
        if !when_false.closed {
            return Ok(when_false);
        }

        Ok(if taken { when_true } else { when_false })
    }

    /// `$<module>` / `$<module.member>`
    fn info_tag(&mut self, evaluate: bool) -> Result<Bounded> {
        let name = self.parse(evaluate, Some('>'))?;
        if !name.closed {
            return Ok(name);
        }
        if !evaluate {
            return Ok(Bounded::value(RichText::new()));
        }
        let value = module::resolve_tag(self.ctx, name.text.as_str())?;
        Ok(Bounded::value(value.to_rich()))
    }

    /// `${color}`
    fn color_tag(&mut self, evaluate: bool) -> Result<Bounded> {
        let token = self.parse(evaluate, Some('}'))?;
        if !token.closed {
            return Ok(token);
        }
        if evaluate {
            color::apply_color_tag(self.ctx, token.text.as_str())?;
        }
        Ok(Bounded::value(RichText::new()))
    }

    /// `$%a,b%` / `$%!a,b%`
    fn percentage_tag(&mut self, evaluate: bool) -> Result<Bounded> {
        let numerator = self.parse(evaluate, Some(','))?;
        if !numerator.closed {
            return Ok(numerator);
        }
        let denominator = self.parse(evaluate, Some('%'))?;
        if !denominator.closed {
            return Ok(denominator);
        }
        if !evaluate {
            return Ok(Bounded::value(RichText::new()));
        }

        let numerator = numerator.text.as_str().trim();
        let (inverted, numerator) = match numerator.strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, numerator),
        };
        let parse_number = |text: &str| text.parse::<f64>().map_err(|_| text.to_owned());
        match (parse_number(numerator), parse_number(denominator.text.as_str().trim())) {
            (Ok(n1), Ok(n2)) => {
                let percent = if n2 == 0.0 { 0.0 } else { n1 / n2 * 100.0 };
                module::colored_percentage(self.ctx, percent, inverted).map(Bounded::value)
            }
            (Err(bad), _) | (_, Err(bad)) => {
                self.ctx.report(Diagnostic::invalid_number(&bad));
                Ok(Bounded::value(RichText::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{DiagnosticKind, Error};
    use crate::provider::{CpuInfo, FixedProviders};
    use crate::text::{Modifiers, Rgb, Span};
    use pretty_assertions::assert_eq;

    fn providers() -> FixedProviders {
        let mut providers = FixedProviders::new();
        providers.cpu = CpuInfo {
            name: "Ryzen 7".into(),
            nproc: 16,
            freq_max: 4.2,
            ..CpuInfo::default()
        };
        providers
    }

    fn render_one(template: &str) -> (Parsed, Vec<Diagnostic>) {
        let config = Config::default();
        let mut providers = providers();
        let mut ctx = RenderContext::new(&config, &mut providers);
        let parsed = parse_line(template, &mut ctx).unwrap();
        (parsed, ctx.diagnostics)
    }

    #[test]
    fn test_plain_text_passes_through() {
        let (parsed, diags) = render_one("hello world");
        assert_eq!(parsed.rich.as_str(), "hello world");
        assert_eq!(parsed.plain, "hello world");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_escape_dollar_is_literal() {
        let (parsed, _) = render_one("cost \\$<cpu.name> \\\\");
        assert_eq!(parsed.rich.as_str(), "cost $<cpu.name> \\");
        assert_eq!(parsed.plain, "cost $<cpu.name> \\");
    }

    #[test]
    fn test_trailing_backslash_is_literal() {
        let (parsed, _) = render_one("a\\");
        assert_eq!(parsed.rich.as_str(), "a\\");
        assert_eq!(parsed.plain, "a\\");
    }

    #[test]
    fn test_lone_dollar_is_literal() {
        let (parsed, _) = render_one("5$ and $x");
        assert_eq!(parsed.rich.as_str(), "5$ and $x");
    }

    #[test]
    fn test_info_tag_substitutes() {
        let (parsed, _) = render_one("CPU: $<cpu.name> x$<cpu.nproc>");
        assert_eq!(parsed.rich.as_str(), "CPU: Ryzen 7 x16");
        assert_eq!(parsed.plain, "CPU: Ryzen 7 x16");
    }

    #[test]
    fn test_memoization_queries_once() {
        let config = Config::default();
        let mut providers = providers();
        {
            let mut ctx = RenderContext::new(&config, &mut providers);
            let out = parse("$<cpu.name> / $<cpu.name>", &mut ctx).unwrap();
            assert_eq!(out.as_str(), "Ryzen 7 / Ryzen 7");
        }
        assert_eq!(providers.query_count("cpu"), 1);
    }

    #[test]
    fn test_conditional_picks_branch() {
        let (parsed, _) = render_one("$[a,a,yes,no] $[a,b,yes,no]");
        assert_eq!(parsed.rich.as_str(), "yes no");
    }

    #[test]
    fn test_conditional_compares_resolved_values() {
        let (parsed, _) = render_one("$[$<cpu.nproc>,16,many,few]");
        assert_eq!(parsed.rich.as_str(), "many");
    }

    #[test]
    fn test_conditional_short_circuits_queries() {
        let config = Config::default();
        let mut providers = providers();
        {
            let mut ctx = RenderContext::new(&config, &mut providers);
            let out = parse("$[x,x,$<cpu.name>,$<ram.used>]", &mut ctx).unwrap();
            assert_eq!(out.as_str(), "Ryzen 7");
        }
        assert_eq!(providers.query_count("cpu"), 1);
        assert_eq!(providers.query_count("ram"), 0);

        let mut providers = self::providers();
        {
            let mut ctx = RenderContext::new(&config, &mut providers);
            parse("$[x,y,$<cpu.name>,$%1,2%]", &mut ctx).unwrap();
        }
        assert_eq!(providers.query_count("cpu"), 0);
    }

    #[test]
    fn test_nested_conditional_in_untaken_branch() {
        let config = Config::default();
        let mut providers = providers();
        {
            let mut ctx = RenderContext::new(&config, &mut providers);
            let out = parse("$[a,b,$[$<cpu.name>,z,1,2],done]", &mut ctx).unwrap();
            assert_eq!(out.as_str(), "done");
        }
        assert_eq!(providers.total_queries(), 0);
    }

    #[test]
    fn test_conditional_commas_inside_nested_tags() {
        let (parsed, _) = render_one("$[a,a,$[b,b,x\\,y,z],w]");
        assert_eq!(parsed.rich.as_str(), "x,y");
    }

    #[test]
    fn test_color_tag_styles_following_text() {
        let (parsed, _) = render_one("ab${#ff0000}cd${0}ef");
        assert_eq!(parsed.rich.as_str(), "abcdef");
        assert_eq!(parsed.plain, "abcdef");
        assert_eq!(parsed.rich.ranges().len(), 1);
        assert_eq!(parsed.rich.ranges()[0].start, 2);
        assert_eq!(parsed.rich.ranges()[0].end, 4);
        assert_eq!(parsed.rich.style_at(2).fg, Some(Rgb::new(255, 0, 0)));
        assert_eq!(parsed.rich.style_at(4).fg, None);
    }

    #[test]
    fn test_color_reopened_starts_new_range() {
        let (parsed, _) = render_one("${#ff0000}a${0}b${#ff0000}c");
        assert_eq!(parsed.rich.style_at(0).fg, Some(Rgb::new(255, 0, 0)));
        assert_eq!(parsed.rich.style_at(1).fg, None);
        assert_eq!(parsed.rich.style_at(2).fg, Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn test_bold_reset_keeps_bold() {
        let (parsed, _) = render_one("${red}a${1}b");
        let style = parsed.rich.style_at(1);
        assert_eq!(style.fg, None);
        assert_eq!(style.modifiers, Modifiers::BOLD);
    }

    #[test]
    fn test_styles_cover_tag_values() {
        let (parsed, _) = render_one("${b#0000ff}$<cpu.name>");
        assert_eq!(parsed.rich.as_str(), "Ryzen 7");
        assert_eq!(
            parsed.rich.ranges()[0].span,
            Span::Background(Rgb::new(0, 0, 255))
        );
        assert_eq!(parsed.rich.ranges()[0].end, 7);
    }

    #[test]
    fn test_color_chosen_by_conditional() {
        let (parsed, _) = render_one("$[1,1,${#00ff00},${#ff0000}]ok");
        assert_eq!(parsed.rich.style_at(0).fg, Some(Rgb::new(0, 255, 0)));
    }

    #[test]
    fn test_color_opened_mid_branch_starts_at_tag() {
        let red = Some(Rgb::new(255, 0, 0));
        let (parsed, _) = render_one("$[a,a,x${#ff0000}y,z]w");
        assert_eq!(parsed.rich.as_str(), "xyw");
        assert_eq!(parsed.rich.style_at(0).fg, None);
        assert_eq!(parsed.rich.style_at(1).fg, red);
        assert_eq!(parsed.rich.style_at(2).fg, red);
    }

    #[test]
    fn test_color_opened_mid_branch_inside_open_style() {
        let blue = Some(Rgb::new(0, 0, 255));
        let red = Some(Rgb::new(255, 0, 0));
        let (parsed, _) = render_one("${#0000ff}a$[1,1,b${#ff0000}c,d]e");
        assert_eq!(parsed.rich.as_str(), "abce");
        assert_eq!(parsed.rich.style_at(0).fg, blue);
        assert_eq!(parsed.rich.style_at(1).fg, blue);
        assert_eq!(parsed.rich.style_at(2).fg, red);
        assert_eq!(parsed.rich.style_at(3).fg, red);
    }

    #[test]
    fn test_reset_mid_branch_ends_outer_style() {
        let red = Some(Rgb::new(255, 0, 0));
        let (parsed, _) = render_one("${#ff0000}a$[1,1,b${0}c,d]e");
        assert_eq!(parsed.rich.as_str(), "abce");
        assert_eq!(parsed.rich.style_at(0).fg, red);
        assert_eq!(parsed.rich.style_at(1).fg, red);
        assert_eq!(parsed.rich.style_at(2).fg, None);
        assert_eq!(parsed.rich.style_at(3).fg, None);
    }

    #[test]
    fn test_unknown_color_is_dropped_and_reported() {
        let (parsed, diags) = render_one("${orange}x");
        assert_eq!(parsed.rich.as_str(), "x");
        assert!(!parsed.rich.is_styled());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnknownColor);
    }

    #[test]
    fn test_disabled_colors_emit_plain_text() {
        let config = Config {
            disable_colors: true,
            ..Config::default()
        };
        let mut providers = providers();
        let mut ctx = RenderContext::new(&config, &mut providers);
        let parsed = parse_line("${red}a$%50,100%", &mut ctx).unwrap();

        assert_eq!(parsed.rich.as_str(), "a50.00%");
        assert!(!parsed.rich.is_styled());
        assert!(ctx.auto_colors.is_empty());
    }

    #[test]
    fn test_percentage_thresholds() {
        let green = Some(Rgb::new(0, 255, 0));
        let red = Some(Rgb::new(255, 0, 0));

        let (low, _) = render_one("$%45,100%");
        assert_eq!(low.rich.as_str(), "45.00%");
        assert_eq!(low.rich.style_at(0).fg, green);

        let (mid, _) = render_one("$%80,100%");
        assert_eq!(mid.rich.style_at(0).fg, Some(Rgb::new(255, 255, 0)));

        let (high, _) = render_one("$%81,100%");
        assert_eq!(high.rich.as_str(), "81.00%");
        assert_eq!(high.rich.style_at(0).fg, red);

        let (inverted, _) = render_one("$%!45,100%");
        assert_eq!(inverted.rich.style_at(0).fg, red);
    }

    #[test]
    fn test_percentage_with_nested_tags() {
        let (parsed, _) = render_one("$%$<cpu.nproc>,32%");
        assert_eq!(parsed.rich.as_str(), "50.00%");
    }

    #[test]
    fn test_percentage_invalid_number() {
        let (parsed, diags) = render_one("[$%abc,10%]");
        assert_eq!(parsed.rich.as_str(), "[]");
        assert_eq!(diags[0].kind, DiagnosticKind::InvalidNumber);
    }

    #[test]
    fn test_unclosed_tag_is_recoverable() {
        let (parsed, diags) = render_one("CPU: $<cpu.name");
        assert_eq!(parsed.rich.as_str(), "CPU: cpu.name");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnclosedTag { delimiter: '>' });
    }

    #[test]
    fn test_unknown_module_is_fatal() {
        let config = Config::default();
        let mut providers = providers();
        let mut ctx = RenderContext::new(&config, &mut providers);
        assert_eq!(
            parse("$<nope.x>", &mut ctx),
            Err(Error::UnknownModule("nope".into()))
        );
    }

    #[test]
    fn test_auto_colors_recorded_outside_layout() {
        let config = Config::default();
        let mut providers = providers();
        let mut ctx = RenderContext::new(&config, &mut providers);
        parse("${red}a${#00ff00}b${red}c${0}", &mut ctx).unwrap();
        assert_eq!(ctx.auto_colors, vec!["red".to_owned(), "#00ff00".to_owned()]);

        ctx.parsing_layout = true;
        parse("${blue}x", &mut ctx).unwrap();
        assert_eq!(ctx.auto_colors.len(), 2);
    }

    #[test]
    fn test_styles_closed_at_end_of_line() {
        let config = Config::default();
        let mut providers = providers();
        let mut ctx = RenderContext::new(&config, &mut providers);
        parse("${red}open", &mut ctx).unwrap();
        assert!(ctx.styles.is_empty());
        let next = parse("plain", &mut ctx).unwrap();
        assert!(!next.is_styled());
    }

    #[test]
    fn test_parse_plain_erases_colors() {
        let config = Config::default();
        let mut providers = providers();
        let mut ctx = RenderContext::new(&config, &mut providers);
        assert_eq!(
            parse_plain("${red}#${0}# $<cpu.nproc>", &mut ctx).unwrap(),
            "## 16"
        );
    }
}
