//! Color tag resolution.
//!
//! Resolution order for the token inside `${...}`:
//! 1. user aliases
//! 2. `auto` / `autoN`, the Nth color discovered in the ascii art
//! 3. `0` / `1` hard resets
//! 4. palette names
//! 5. hex literals with modifier prefixes (`b!u#ff0000`)
//! 6. raw ANSI escapes (`\e[1;31m`, `\e[38;2;r;g;bm`)

use super::context::RenderContext;
use crate::config::{Config, PaletteConfig};
use crate::error::{Diagnostic, Error, Result};
use crate::text::{Modifiers, Rgb, Span};

/// Seeded into an empty auto-color list so `${auto}` always resolves.
pub(crate) const AUTO_COLOR_SEED: &str = "1";

/// What a color token does to the style stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ColorAction {
    /// Close every open style, optionally reopening bold.
    Reset {
        /// `${1}` keeps bold on.
        bold: bool,
    },
    /// Open these styles.
    Apply(Vec<Span>),
}

/// A resolved token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedColor {
    /// The token after alias and auto substitution; what the auto list records.
    pub(crate) token: String,
    pub(crate) action: ColorAction,
}

/// Resolve a color token. `Ok(None)` means the token is not a color.
pub(crate) fn resolve_color(
    token: &str,
    config: &Config,
    auto_colors: &mut Vec<String>,
) -> Result<Option<ResolvedColor>> {
    let mut token = config.alias(token).unwrap_or(token).to_owned();

    if let Some(suffix) = token.strip_prefix("auto") {
        let index = suffix
            .parse::<usize>()
            .map_or(0, |n| n.saturating_sub(1));
        if auto_colors.is_empty() {
            auto_colors.push(AUTO_COLOR_SEED.to_owned());
        }
        let index = if index < auto_colors.len() { index } else { 0 };
        token = auto_colors[index].clone();
    }

    let action = match token.as_str() {
        "0" | "\\e[0m" | "\x1b[0m" => Some(ColorAction::Reset { bold: false }),
        "1" => Some(ColorAction::Reset { bold: true }),
        name => {
            let literal = config.palette.get(name).unwrap_or(name);
            parse_literal(literal, &config.palette)?.map(ColorAction::Apply)
        }
    };
    Ok(action.map(|action| ResolvedColor { token, action }))
}

/// Resolve a color tag and apply it to the context's style stack.
pub(crate) fn apply_color_tag(ctx: &mut RenderContext<'_>, token: &str) -> Result<()> {
    if ctx.styling_suppressed() {
        return Ok(());
    }
    let Some(resolved) = resolve_color(token, ctx.config, &mut ctx.auto_colors)? else {
        ctx.report(Diagnostic::unknown_color(token));
        return Ok(());
    };

    match resolved.action {
        ColorAction::Reset { bold } => {
            ctx.styles.clear();
            if bold {
                ctx.styles.open(Span::Emphasis(Modifiers::BOLD));
            }
        }
        ColorAction::Apply(spans) => {
            for span in spans {
                ctx.styles.open(span);
            }
            if !ctx.parsing_layout && !ctx.auto_colors.contains(&resolved.token) {
                tracing::trace!(color = %resolved.token, "new auto color");
                ctx.auto_colors.push(resolved.token);
            }
        }
    }
    ctx.first_color_seen = true;
    Ok(())
}

/// Parse a hex literal or an ANSI escape.
fn parse_literal(literal: &str, palette: &PaletteConfig) -> Result<Option<Vec<Span>>> {
    if let Some(hash) = literal.rfind('#') {
        return Ok(parse_hex_color(&literal[..hash], &literal[hash + 1..]));
    }
    let escape = literal
        .strip_prefix("\\e[")
        .or_else(|| literal.strip_prefix("\x1b["));
    match escape {
        Some(sequence) => parse_ansi_color(sequence, palette).map(Some),
        None => Ok(None),
    }
}

/// `[modifiers]#rrggbb`. Modifiers: `b` background, `!` bold, `u` underline,
/// `i` italic, `s` strikethrough, `l` blink. Unknown letters are skipped
/// along with a parenthesized argument, if any.
fn parse_hex_color(modifiers: &str, digits: &str) -> Option<Vec<Span>> {
    let color = Rgb::parse_hex(digits)?;
    let mut background = false;
    let mut emphasis = Modifiers::empty();

    let mut chars = modifiers.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            'b' => background = true,
            '!' => emphasis |= Modifiers::BOLD,
            'u' => emphasis |= Modifiers::UNDERLINE,
            'i' => emphasis |= Modifiers::ITALIC,
            's' => emphasis |= Modifiers::STRIKETHROUGH,
            'l' => emphasis |= Modifiers::BLINK,
            _ => {
                if chars.peek() == Some(&'(') {
                    chars.by_ref().take_while(|&c| c != ')').for_each(drop);
                }
            }
        }
    }

    let mut spans = Vec::with_capacity(2);
    spans.push(if background {
        Span::Background(color)
    } else {
        Span::Foreground(color)
    });
    if !emphasis.is_empty() {
        spans.push(Span::Emphasis(emphasis));
    }
    Some(spans)
}

/// Decode an SGR sequence (without the leading `ESC[`).
fn parse_ansi_color(sequence: &str, palette: &PaletteConfig) -> Result<Vec<Span>> {
    let raw = || format!("\\e[{sequence}");
    let Some(body) = sequence.strip_suffix('m') else {
        return Err(Error::malformed_ansi(raw(), "missing the terminating 'm'"));
    };

    if body.starts_with("38;5;") || body.starts_with("48;5;") {
        return Err(Error::UnsupportedAnsi256(raw()));
    }
    if let Some(rgb) = body.strip_prefix("38;2;") {
        return Ok(vec![Span::Foreground(parse_ansi_rgb(rgb, &raw)?)]);
    }
    if let Some(rgb) = body.strip_prefix("48;2;") {
        return Ok(vec![Span::Background(parse_ansi_rgb(rgb, &raw)?)]);
    }

    let mut spans = Vec::new();
    let code = if let Some(rest) = body.strip_prefix("1;") {
        spans.push(Span::Emphasis(Modifiers::BOLD));
        rest
    } else {
        body.strip_prefix("0;").unwrap_or(body)
    };
    let n: u8 = code
        .parse()
        .map_err(|_| Error::malformed_ansi(raw(), "expected a color code number"))?;
    if n == 1 {
        spans.push(Span::Emphasis(Modifiers::BOLD));
        return Ok(spans);
    }

    let base = palette
        .by_index(usize::from(n % 10))
        .and_then(|token| Rgb::parse_hex(&token[token.rfind('#')? + 1..]));
    let Some(base) = base else {
        return Ok(spans);
    };
    let light = base.blend(Rgb::WHITE, 0.5);
    match n {
        30..=37 => spans.push(Span::Foreground(base)),
        40..=47 => spans.push(Span::Background(base)),
        90..=97 => spans.push(Span::Foreground(light)),
        100..=107 => spans.push(Span::Background(light)),
        _ => {}
    }
    Ok(spans)
}

/// `r;g;b` of a 24-bit sequence.
fn parse_ansi_rgb(rgb: &str, raw: &dyn Fn() -> String) -> Result<Rgb> {
    let parts: Vec<&str> = rgb.split(';').collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(Error::malformed_ansi(
            raw(),
            "an rgb escape needs three values, e.g. \\e[38;2;255;255;255m",
        ));
    };
    let channel = |s: &str| {
        s.parse::<u8>()
            .map_err(|_| Error::malformed_ansi(raw(), "rgb values must be 0-255"))
    };
    Ok(Rgb::new(channel(*r)?, channel(*g)?, channel(*b)?))
}
