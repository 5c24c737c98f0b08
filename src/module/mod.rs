//! Module resolution: what `$<module.member>` turns into.
//!
//! This module contains:
//! - [`ModuleKind`]: every module name the template language knows
//! - [`split_spec`]: separate `disk(/mnt/a.b).used` into module and member
//! - byte, uptime and percentage formatting
//!
//! Resolved members are memoized in the render's [`crate::cache::MetricCache`],
//! so a member referenced many times queries its provider once.

mod format;
mod resolve;

pub use format::{
    auto_divide_bytes, divide_bytes, format_uptime, percentage_color_index, percentage_of,
    split_uptime, ByteAmount,
};

use crate::error::{Error, Result};
use crate::parse::{self, RenderContext};
use crate::text::RichText;
use crate::value::TaggedValue;

/// Sentinel value for missing data. Any output line containing it is dropped.
pub const MAGIC_LINE: &str = "(cut this line NOW!! RAHHH)";

/// A module name, checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleKind {
    /// `os`
    Os,
    /// `system`
    System,
    /// `user`
    User,
    /// `cpu`
    Cpu,
    /// `gpu` / `gpuN`
    Gpu(u16),
    /// `ram`
    Ram,
    /// `swap`
    Swap,
    /// `disk(path)`
    Disk(String),
    /// `battery`
    Battery,
    /// `theme`
    Theme,
    /// `theme-gtkN`
    GtkTheme(u8),
    /// `auto`, members that expand into several layout lines
    Auto,
    /// `title`
    Title,
    /// `title_sep` / `title_separator`
    TitleSep,
    /// `colors`
    Colors,
    /// `colors_light`
    ColorsLight,
    /// `colors_symbol(S)`
    ColorsSymbol(String),
    /// `colors_light_symbol(S)`
    ColorsLightSymbol(String),
}

impl ModuleKind {
    /// Check a module name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownModule`] for a name nothing answers to, and
    /// [`Error::MalformedModule`] for a parameterized module missing its
    /// argument.
    pub fn lookup(name: &str) -> Result<Self> {
        let kind = match name {
            "os" => Self::Os,
            "system" => Self::System,
            "user" => Self::User,
            "cpu" => Self::Cpu,
            "ram" => Self::Ram,
            "swap" => Self::Swap,
            "battery" => Self::Battery,
            "theme" => Self::Theme,
            "auto" => Self::Auto,
            "title" => Self::Title,
            "title_sep" | "title_separator" => Self::TitleSep,
            "colors" => Self::Colors,
            "colors_light" => Self::ColorsLight,
            _ => return Self::lookup_parameterized(name),
        };
        Ok(kind)
    }

    fn lookup_parameterized(name: &str) -> Result<Self> {
        if name.starts_with("disk") {
            return match argument(name, "disk") {
                Some(path) if !path.is_empty() => Ok(Self::Disk(path.to_owned())),
                _ => Err(Error::MalformedModule {
                    name: name.to_owned(),
                    reason: "must be disk(/path/to/fs) e.g: disk(/)",
                }),
            };
        }
        if name.starts_with("colors_light_symbol") {
            return match argument(name, "colors_light_symbol") {
                Some(symbol) if !symbol.is_empty() => Ok(Self::ColorsLightSymbol(symbol.to_owned())),
                _ => Err(Error::MalformedModule {
                    name: name.to_owned(),
                    reason: "must be colors_light_symbol(symbol) e.g: colors_light_symbol(@)",
                }),
            };
        }
        if name.starts_with("colors_symbol") {
            return match argument(name, "colors_symbol") {
                Some(symbol) if !symbol.is_empty() => Ok(Self::ColorsSymbol(symbol.to_owned())),
                _ => Err(Error::MalformedModule {
                    name: name.to_owned(),
                    reason: "must be colors_symbol(symbol) e.g: colors_symbol(@)",
                }),
            };
        }
        if let Some(version) = name.strip_prefix("theme-gtk") {
            return version
                .parse()
                .map(Self::GtkTheme)
                .map_err(|_| Error::MalformedModule {
                    name: name.to_owned(),
                    reason: "must name a gtk version e.g: theme-gtk3",
                });
        }
        if let Some(index) = name.strip_prefix("gpu") {
            if index.is_empty() {
                return Ok(Self::Gpu(0));
            }
            if let Ok(index) = index.parse() {
                return Ok(Self::Gpu(index));
            }
        }
        Err(Error::unknown_module(name))
    }

    /// Check if resolving this module has effects beyond its value, so it
    /// must not be memoized.
    pub const fn is_expanding(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// `prefix(arg)` -> `arg`.
fn argument<'s>(name: &'s str, prefix: &str) -> Option<&'s str> {
    name.strip_prefix(prefix)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Split a tag body into module name and optional member.
///
/// Parameterized names may contain dots (`disk(/mnt/a.b).used`), so when
/// the body has a `(` the split happens at the first dot after the last `)`.
pub fn split_spec(spec: &str) -> (&str, Option<&str>) {
    let search_from = if spec.contains('(') {
        spec.rfind(')').map_or(0, |pos| pos + 1)
    } else {
        0
    };
    match spec[search_from..].find('.') {
        Some(dot) => {
            let dot = search_from + dot;
            (&spec[..dot], Some(&spec[dot + 1..]))
        }
        None => (spec, None),
    }
}

/// Resolve the body of a `$<...>` tag.
///
/// # Errors
///
/// Unknown or malformed module names, and fatal errors from nested
/// templates.
pub(crate) fn resolve_tag(ctx: &mut RenderContext<'_>, spec: &str) -> Result<TaggedValue> {
    let (name, member) = split_spec(spec);
    let kind = ModuleKind::lookup(name)?;
    if kind.is_expanding() {
        return resolve::expanding(ctx, member);
    }

    let key = member.map_or_else(|| format!("module-{name}"), str::to_owned);
    if let Some(value) = ctx.cache.get(name, &key) {
        tracing::trace!(module = name, member = %key, "cache hit");
        return Ok(value.clone());
    }

    tracing::trace!(module = name, member = %key, "cache miss");
    let value = match member {
        Some(member) => resolve::member(ctx, &kind, member)?,
        None => resolve::summary(ctx, &kind)?,
    };
    if matches!(&value, TaggedValue::Text(text) if text == MAGIC_LINE) {
        tracing::debug!(module = name, member = %key, "value unavailable, line will be dropped");
    }
    Ok(ctx.cache.insert(name, &key, value).clone())
}

/// Render `percent` colored by how high it is, e.g. `82.18%` in red.
/// `inverted` swaps the low and high colors, for values where high is good.
pub(crate) fn colored_percentage(
    ctx: &mut RenderContext<'_>,
    percent: f64,
    inverted: bool,
) -> Result<RichText> {
    let config = ctx.config;
    let color = &config.percentage_colors[percentage_color_index(percent, inverted)];
    let template = format!("${{{color}}}{percent:.2}%${{0}}");
    parse::parse_nested(&template, ctx)
}

/// Escape text so a nested template reproduces it literally.
pub(crate) fn escape_template(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '$' | '>' | ',' | '%' | ']' | '}') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
