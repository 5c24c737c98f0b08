//! `RenderContext`: the state shared by every parse of one render.

use crate::cache::MetricCache;
use crate::config::Config;
use crate::error::Diagnostic;
use crate::provider::Providers;
use crate::text::{RichText, Span};
use std::borrow::Cow;

/// An open style and the identity used to track where it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveStyle {
    /// Unique per opening, so reopening the same color starts a new range.
    pub id: u32,
    /// The style.
    pub span: Span,
}

/// Styles that apply to everything appended from now on.
#[derive(Debug, Default)]
pub struct StyleStack {
    active: Vec<ActiveStyle>,
    next_id: u32,
}

impl StyleStack {
    /// Open a style.
    pub fn open(&mut self, span: Span) {
        self.active.push(ActiveStyle {
            id: self.next_id,
            span,
        });
        self.next_id = self.next_id.wrapping_add(1);
    }

    /// Close the most recently opened instance of `span`.
    pub fn close(&mut self, span: Span) {
        if let Some(pos) = self.active.iter().rposition(|s| s.span == span) {
            self.active.remove(pos);
        }
    }

    /// Close everything.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Currently open styles, oldest first.
    pub fn active(&self) -> &[ActiveStyle] {
        &self.active
    }

    /// Check if nothing is open.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Set the open styles aside for an independent nested parse.
    pub(crate) fn suspend(&mut self) -> Vec<ActiveStyle> {
        std::mem::take(&mut self.active)
    }

    /// Bring back styles set aside by [`StyleStack::suspend`].
    pub(crate) fn resume(&mut self, saved: Vec<ActiveStyle>) {
        self.active = saved;
    }
}

/// Everything a template parse reads or writes besides its own buffers.
pub struct RenderContext<'a> {
    /// Active configuration.
    pub config: &'a Config,
    pub(crate) providers: &'a mut dyn Providers,
    /// Resolved members of this render.
    pub cache: MetricCache,
    /// Styles applied to appended text.
    pub styles: StyleStack,
    /// Distinct colors seen in the ascii art, in first-seen order.
    pub auto_colors: Vec<String>,
    /// Parsing layout lines rather than ascii art.
    pub parsing_layout: bool,
    /// The separator reset was already injected into the current line.
    pub sep_reset_applied: bool,
    /// Some color was applied during this render.
    pub first_color_seen: bool,
    /// Lines produced by an expanding module while parsing the current line.
    pub spliced: Vec<RichText>,
    /// Recoverable problems, in the order found.
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> RenderContext<'a> {
    /// Create a fresh context.
    pub fn new(config: &'a Config, providers: &'a mut dyn Providers) -> Self {
        Self {
            config,
            providers,
            cache: MetricCache::new(),
            styles: StyleStack::default(),
            auto_colors: Vec::new(),
            parsing_layout: false,
            sep_reset_applied: false,
            first_color_seen: false,
            spliced: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Drop all per-render state and the providers' caches.
    pub fn reset(&mut self) {
        self.providers.clear_cache();
        self.cache.reset();
        self.styles.clear();
        self.auto_colors.clear();
        self.parsing_layout = false;
        self.sep_reset_applied = false;
        self.first_color_seen = false;
        self.spliced.clear();
        self.diagnostics.clear();
    }

    /// Styling is switched off for this render.
    pub const fn styling_suppressed(&self) -> bool {
        self.config.disable_colors
    }

    /// Record a recoverable problem.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::error!(kind = ?diagnostic.kind, "PARSER: {diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Put a reset around the first separator token of a layout line, once
    /// per line.
    pub fn inject_separator_reset<'s>(&mut self, line: &'s str) -> Cow<'s, str> {
        let sep = self.config.sep_reset.as_str();
        if sep.is_empty() || self.sep_reset_applied {
            return Cow::Borrowed(line);
        }
        let Some(pos) = line.find(sep) else {
            return Cow::Borrowed(line);
        };
        self.sep_reset_applied = true;

        let at = if self.config.sep_reset_after {
            pos + sep.len()
        } else {
            pos
        };
        let mut injected = String::with_capacity(line.len() + 4);
        injected.push_str(&line[..at]);
        injected.push_str("${0}");
        injected.push_str(&line[at..]);
        Cow::Owned(injected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FixedProviders;
    use crate::text::{Modifiers, Rgb};

    #[test]
    fn test_style_stack_ids_are_unique() {
        let mut stack = StyleStack::default();
        let red = Span::Foreground(Rgb::new(255, 0, 0));
        stack.open(red);
        stack.clear();
        stack.open(red);

        assert_eq!(stack.active().len(), 1);
        assert_eq!(stack.active()[0].id, 1);
    }

    #[test]
    fn test_style_stack_close_latest() {
        let mut stack = StyleStack::default();
        let bold = Span::Emphasis(Modifiers::BOLD);
        stack.open(bold);
        stack.open(Span::Background(Rgb::BLACK));
        stack.open(bold);
        stack.close(bold);

        assert_eq!(stack.active().len(), 2);
        assert_eq!(stack.active()[0].span, bold);
    }

    #[test]
    fn test_separator_reset_once_per_line() {
        let config = Config::default();
        let mut providers = FixedProviders::new();
        let mut ctx = RenderContext::new(&config, &mut providers);

        assert_eq!(ctx.inject_separator_reset("OS: a: b"), "OS${0}: a: b");
        assert_eq!(ctx.inject_separator_reset("CPU: x"), "CPU: x");

        ctx.sep_reset_applied = false;
        assert_eq!(ctx.inject_separator_reset("no token"), "no token");
        assert!(!ctx.sep_reset_applied);
    }

    #[test]
    fn test_separator_reset_after_token() {
        let config = Config {
            sep_reset_after: true,
            ..Config::default()
        };
        let mut providers = FixedProviders::new();
        let mut ctx = RenderContext::new(&config, &mut providers);

        assert_eq!(ctx.inject_separator_reset("OS: a"), "OS:${0} a");
    }

    #[test]
    fn test_reset_clears_providers() {
        let config = Config::default();
        let mut providers = FixedProviders::new();
        {
            let mut ctx = RenderContext::new(&config, &mut providers);
            ctx.auto_colors.push("red".into());
            ctx.reset();
            assert!(ctx.auto_colors.is_empty());
        }
        assert_eq!(providers.clear_count(), 1);
    }
}
