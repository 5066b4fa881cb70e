//! Theme palette lookup and color-space conversions.

pub mod convert;
pub mod palette;

pub use convert::{
    Hsl, Rgb, darken, hex_to_rgb, hsl_to_rgb, interpolate_color, lighten, rgb_to_hex, rgb_to_hsl,
    rotate_hue, with_alpha,
};
pub use palette::{CHROME, ChromeColors, Theme, ThemeColors, resolve_color, series_color, series_colors};
