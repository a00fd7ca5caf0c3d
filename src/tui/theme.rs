//! Theme system for TUI colors and styles
//!
//! Buffer tier colors match the `buzz list` report (commands/report.rs).

use iocraft::prelude::Color;

use super::render::Tone;
use crate::types::BufferTier;

/// Theme configuration for TUI components
#[derive(Debug, Clone)]
pub struct Theme {
    // Buffer tier colors
    pub tier_critical: Color,
    pub tier_warning: Color,
    pub tier_caution: Color,
    pub tier_safe: Color,
    pub tier_relaxed: Color,

    // UI colors
    pub border: Color,
    pub background: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub search_match: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let gray = Color::Rgb {
            r: 120,
            g: 120,
            b: 120,
        };
        Self {
            tier_critical: Color::Red,
            tier_warning: Color::Rgb {
                r: 255,
                g: 165,
                b: 0,
            },
            tier_caution: Color::Blue,
            tier_safe: Color::Green,
            tier_relaxed: gray,

            border: gray,
            background: Color::Reset,
            text: Color::White,
            text_dimmed: gray,
            highlight: Color::Cyan,
            search_match: Color::Yellow,
            error: Color::Red,
        }
    }
}

impl Theme {
    /// Get the color for a buffer tier
    pub fn tier_color(&self, tier: BufferTier) -> Color {
        match tier {
            BufferTier::Critical => self.tier_critical,
            BufferTier::Warning => self.tier_warning,
            BufferTier::Caution => self.tier_caution,
            BufferTier::Safe => self.tier_safe,
            BufferTier::Relaxed => self.tier_relaxed,
        }
    }

    pub fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Plain => self.text,
            Tone::Dim => self.text_dimmed,
            Tone::Accent => self.highlight,
            Tone::Match => self.search_match,
            Tone::Error => self.error,
            Tone::Border => self.border,
            Tone::Tier(tier) => self.tier_color(tier),
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}
