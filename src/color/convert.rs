//! Color-space conversions between hex strings, RGB and HSL.

use serde::{Deserialize, Serialize};

use crate::core::math::{clamp, lerp};

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// HSL color: hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }
}

/// Parses `#rgb` or `#rrggbb` (leading `#` optional).
#[must_use]
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.trim().trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
        6 => digits.to_owned(),
        _ => return None,
    };
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(expanded.get(range)?, 16).ok();
    Some(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[must_use]
pub fn rgb_to_hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

#[must_use]
pub fn rgb_to_hsl(color: Rgb) -> Hsl {
    let r = f64::from(color.r) / 255.0;
    let g = f64::from(color.g) / 255.0;
    let b = f64::from(color.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l);
    }

    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let h = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    Hsl::new(h * 60.0, s, l)
}

#[must_use]
pub fn hsl_to_rgb(color: Hsl) -> Rgb {
    let h = color.h.rem_euclid(360.0) / 360.0;
    let s = clamp(color.s, 0.0, 1.0);
    let l = clamp(color.l, 0.0, 1.0);

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    };
    Rgb::new(to_channel(r), to_channel(g), to_channel(b))
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(unit: f64) -> u8 {
    (clamp(unit, 0.0, 1.0) * 255.0).round() as u8
}

/// `rgba(...)` CSS string for a hex color; unparseable input is returned as-is.
#[must_use]
pub fn with_alpha(hex: &str, alpha: f64) -> String {
    match hex_to_rgb(hex) {
        Some(rgb) => format!(
            "rgba({}, {}, {}, {})",
            rgb.r,
            rgb.g,
            rgb.b,
            crate::core::primitives::format_decimal(clamp(alpha, 0.0, 1.0), 3)
        ),
        None => hex.to_owned(),
    }
}

/// Raises HSL lightness by `amount` (in `[0, 1]`).
#[must_use]
pub fn lighten(hex: &str, amount: f64) -> String {
    adjust_lightness(hex, amount)
}

/// Lowers HSL lightness by `amount` (in `[0, 1]`).
#[must_use]
pub fn darken(hex: &str, amount: f64) -> String {
    adjust_lightness(hex, -amount)
}

fn adjust_lightness(hex: &str, delta: f64) -> String {
    let Some(rgb) = hex_to_rgb(hex) else {
        return hex.to_owned();
    };
    let mut hsl = rgb_to_hsl(rgb);
    hsl.l = clamp(hsl.l + delta, 0.0, 1.0);
    rgb_to_hex(hsl_to_rgb(hsl))
}

/// Rotates the hue of `hex` by `degrees`.
#[must_use]
pub fn rotate_hue(hex: &str, degrees: f64) -> String {
    let Some(rgb) = hex_to_rgb(hex) else {
        return hex.to_owned();
    };
    let mut hsl = rgb_to_hsl(rgb);
    hsl.h = (hsl.h + degrees).rem_euclid(360.0);
    rgb_to_hex(hsl_to_rgb(hsl))
}

/// Channel-wise RGB interpolation. Falls back to `from` when either color
/// cannot be parsed.
#[must_use]
pub fn interpolate_color(from: &str, to: &str, t: f64) -> String {
    let (Some(a), Some(b)) = (hex_to_rgb(from), hex_to_rgb(to)) else {
        return from.to_owned();
    };
    let t = clamp(t, 0.0, 1.0);
    let mix = |x: u8, y: u8| lerp(f64::from(x), f64::from(y), t).round() as u8;
    rgb_to_hex(Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_short_and_long_forms() {
        assert_eq!(hex_to_rgb("#0ff"), Some(Rgb::new(0, 255, 255)));
        assert_eq!(hex_to_rgb("ff00aa"), Some(Rgb::new(255, 0, 170)));
        assert_eq!(hex_to_rgb("#12345"), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }

    #[test]
    fn hsl_round_trip_preserves_primaries() {
        for hex in ["#ff0000", "#00ff00", "#0000ff", "#00ffff", "#ff00ff", "#808080"] {
            let rgb = hex_to_rgb(hex).expect("valid hex");
            assert_eq!(rgb_to_hex(hsl_to_rgb(rgb_to_hsl(rgb))), hex);
        }
    }

    #[test]
    fn with_alpha_emits_rgba() {
        assert_eq!(with_alpha("#00ffff", 0.5), "rgba(0, 255, 255, 0.5)");
        assert_eq!(with_alpha("not-a-color", 0.5), "not-a-color");
    }

    #[test]
    fn interpolation_endpoints() {
        assert_eq!(interpolate_color("#000000", "#ffffff", 0.0), "#000000");
        assert_eq!(interpolate_color("#000000", "#ffffff", 1.0), "#ffffff");
    }
}
