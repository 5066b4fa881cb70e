//! Fixed neon palette.
//!
//! These tables are process-wide constants: every engine instance reads them
//! and none ever writes them.

use serde::{Deserialize, Serialize};

use super::convert::rotate_hue;

/// Named neon theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Cyan,
    Magenta,
    Green,
    Yellow,
    Orange,
    Purple,
    Red,
    Blue,
}

/// Colors that make up one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub glow: &'static str,
    pub gradient_start: &'static str,
    pub gradient_end: &'static str,
}

/// Colors of the chart chrome (background, grid, axes, labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeColors {
    pub background: &'static str,
    pub grid: &'static str,
    pub axis: &'static str,
    pub text: &'static str,
    pub text_muted: &'static str,
    pub track: &'static str,
    pub tooltip_background: &'static str,
}

pub const CHROME: ChromeColors = ChromeColors {
    background: "#0a0a12",
    grid: "#1a1a2e",
    axis: "#2d2d44",
    text: "#e0e0ff",
    text_muted: "#8888aa",
    track: "#1c1c2c",
    tooltip_background: "#0d0d1a",
};

const THEME_ORDER: [Theme; 8] = [
    Theme::Cyan,
    Theme::Magenta,
    Theme::Green,
    Theme::Yellow,
    Theme::Orange,
    Theme::Purple,
    Theme::Red,
    Theme::Blue,
];

impl Theme {
    #[must_use]
    pub const fn colors(self) -> ThemeColors {
        match self {
            Self::Cyan => ThemeColors {
                primary: "#00f0ff",
                secondary: "#00a8b5",
                glow: "rgba(0, 240, 255, 0.6)",
                gradient_start: "#00f0ff",
                gradient_end: "#0066ff",
            },
            Self::Magenta => ThemeColors {
                primary: "#ff00ff",
                secondary: "#b300b3",
                glow: "rgba(255, 0, 255, 0.6)",
                gradient_start: "#ff00ff",
                gradient_end: "#7a00ff",
            },
            Self::Green => ThemeColors {
                primary: "#39ff14",
                secondary: "#28b30e",
                glow: "rgba(57, 255, 20, 0.6)",
                gradient_start: "#39ff14",
                gradient_end: "#00b386",
            },
            Self::Yellow => ThemeColors {
                primary: "#ffe600",
                secondary: "#b3a100",
                glow: "rgba(255, 230, 0, 0.6)",
                gradient_start: "#ffe600",
                gradient_end: "#ff9900",
            },
            Self::Orange => ThemeColors {
                primary: "#ff6b00",
                secondary: "#b34b00",
                glow: "rgba(255, 107, 0, 0.6)",
                gradient_start: "#ff6b00",
                gradient_end: "#ff0055",
            },
            Self::Purple => ThemeColors {
                primary: "#bf00ff",
                secondary: "#8600b3",
                glow: "rgba(191, 0, 255, 0.6)",
                gradient_start: "#bf00ff",
                gradient_end: "#5500ff",
            },
            Self::Red => ThemeColors {
                primary: "#ff0040",
                secondary: "#b3002d",
                glow: "rgba(255, 0, 64, 0.6)",
                gradient_start: "#ff0040",
                gradient_end: "#ff6b00",
            },
            Self::Blue => ThemeColors {
                primary: "#0080ff",
                secondary: "#005ab3",
                glow: "rgba(0, 128, 255, 0.6)",
                gradient_start: "#0080ff",
                gradient_end: "#00f0ff",
            },
        }
    }

    #[must_use]
    pub const fn primary(self) -> &'static str {
        self.colors().primary
    }

    #[must_use]
    pub fn all() -> &'static [Theme] {
        &THEME_ORDER
    }

    /// Theme assigned to the `index`-th series when none is given.
    #[must_use]
    pub fn for_series(index: usize) -> Self {
        THEME_ORDER[index % THEME_ORDER.len()]
    }
}

/// `count` distinct series colors.
///
/// The first eight are the theme primaries; later cycles rotate the hue so
/// colors keep differing from earlier ones.
#[must_use]
pub fn series_colors(count: usize) -> Vec<String> {
    (0..count).map(series_color).collect()
}

#[must_use]
pub fn series_color(index: usize) -> String {
    let base = Theme::for_series(index).primary();
    let cycle = index / THEME_ORDER.len();
    if cycle == 0 {
        base.to_owned()
    } else {
        rotate_hue(base, cycle as f64 * 22.5)
    }
}

/// Resolves the display color from an explicit color, a theme, or the
/// positional default, in that order of precedence.
#[must_use]
pub fn resolve_color(explicit: Option<&str>, theme: Option<Theme>, index: usize) -> String {
    match (explicit, theme) {
        (Some(color), _) => color.to_owned(),
        (None, Some(theme)) => theme.primary().to_owned(),
        (None, None) => series_color(index),
    }
}
