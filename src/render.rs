//! Render entry point: one full pass from templates to final lines.
//!
//! ```text
//! reset caches -> parse art -> parse layout (splicing expansions)
//!              -> drop missing lines -> composite
//! ```

use crate::config::Config;
use crate::error::{Diagnostic, Result};
use crate::layout::{ArtLine, Compositor};
use crate::module::MAGIC_LINE;
use crate::parse::{self, RenderContext};
use crate::provider::Providers;
use crate::text::{ansi, RichText};
use tracing::{debug, instrument};

/// Everything one render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Final lines, top to bottom.
    pub lines: Vec<RichText>,
    /// Recoverable problems found along the way.
    pub diagnostics: Vec<Diagnostic>,
    /// Some color was applied; terminal output should end every line with
    /// a reset.
    pub styled: bool,
}

impl RenderOutput {
    /// Encode every line for a 24-bit color terminal.
    pub fn to_ansi_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| ansi::to_ansi(line, self.styled))
            .collect()
    }

    /// The lines without any styling.
    pub fn to_plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.as_str().to_owned()).collect()
    }
}

/// Render `ascii_source` (the art, one line per line) beside the layout in
/// `config`.
///
/// The providers' caches are cleared first, so two renders never share
/// metric values.
///
/// # Errors
///
/// Fatal template errors: unknown or malformed modules, malformed ANSI
/// escapes and 256-color escapes.
#[instrument(
    skip_all,
    fields(
        art_lines = ascii_source.lines().count(),
        layout_lines = config.layout.len()
    )
)]
pub fn render(
    config: &Config,
    providers: &mut dyn Providers,
    ascii_source: &str,
) -> Result<RenderOutput> {
    let mut ctx = RenderContext::new(config, providers);
    ctx.reset();

    let art = if config.disable_source {
        Vec::new()
    } else {
        parse_art(&mut ctx, ascii_source)?
    };
    debug!(auto_colors = ?ctx.auto_colors, "parsed ascii art");

    let lines = if config.print_logo_only {
        std::iter::repeat_with(RichText::new)
            .take(config.logo_padding_top)
            .chain(art.into_iter().map(|line| line.rich))
            .collect()
    } else {
        let info = parse_layout(&mut ctx)?;
        Compositor::new(config).compose(art, info)
    };

    debug!(
        lines = lines.len(),
        diagnostics = ctx.diagnostics.len(),
        "render finished"
    );
    Ok(RenderOutput {
        lines,
        styled: ctx.first_color_seen && !config.disable_colors,
        diagnostics: ctx.diagnostics,
    })
}

fn parse_art(ctx: &mut RenderContext<'_>, ascii_source: &str) -> Result<Vec<ArtLine>> {
    ctx.parsing_layout = false;
    let mut art = Vec::new();
    for line in ascii_source.lines() {
        art.push(ArtLine::from_parsed(parse::parse_line(line, ctx)?));
    }
    Ok(art)
}

fn parse_layout(ctx: &mut RenderContext<'_>) -> Result<Vec<RichText>> {
    ctx.parsing_layout = true;
    let config = ctx.config;
    let mut lines = Vec::with_capacity(config.layout.len());
    for template in &config.layout {
        lines.extend(parse_layout_line(ctx, template)?);
    }

    let before = lines.len();
    lines.retain(|line| !line.contains(MAGIC_LINE));
    debug!(dropped = before - lines.len(), "removed lines with missing values");
    Ok(lines)
}

/// Parse one layout template into the lines it stands for: usually one,
/// or whatever an expanding module spliced in its place.
fn parse_layout_line(ctx: &mut RenderContext<'_>, template: &str) -> Result<Vec<RichText>> {
    ctx.sep_reset_applied = false;
    let template = ctx.inject_separator_reset(template);
    let line = parse::parse(&template, ctx)?;
    if ctx.spliced.is_empty() {
        Ok(vec![line])
    } else {
        Ok(std::mem::take(&mut ctx.spliced))
    }
}
