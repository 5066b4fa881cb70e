use neon_charts::color::{
    Rgb, Theme, darken, hex_to_rgb, hsl_to_rgb, interpolate_color, lighten, rgb_to_hex, rgb_to_hsl,
    series_colors, with_alpha,
};

#[test]
fn hex_parsing_accepts_short_and_long_forms() {
    assert_eq!(hex_to_rgb("#00f0ff"), Some(Rgb::new(0, 240, 255)));
    assert_eq!(hex_to_rgb("f0a"), Some(Rgb::new(255, 0, 170)));
    assert_eq!(hex_to_rgb("#12345"), None);
    assert_eq!(hex_to_rgb("#gggggg"), None);
}

#[test]
fn hsl_round_trip_preserves_theme_primaries() {
    for theme in Theme::all() {
        let rgb = hex_to_rgb(theme.primary()).expect("theme primaries are valid hex");
        assert_eq!(hsl_to_rgb(rgb_to_hsl(rgb)), rgb, "theme {theme:?}");
    }
}

#[test]
fn lightness_adjustments_move_toward_white_and_black() {
    assert_eq!(lighten("#808080", 1.0), "#ffffff");
    assert_eq!(darken("#808080", 1.0), "#000000");
    assert_eq!(lighten("not-a-color", 0.2), "not-a-color");
}

#[test]
fn alpha_and_interpolation_produce_css_colors() {
    assert_eq!(with_alpha("#ff0000", 0.5), "rgba(255, 0, 0, 0.5)");
    assert_eq!(interpolate_color("#000000", "#ffffff", 0.5), "#808080");
    assert_eq!(interpolate_color("#000000", "#ffffff", 2.0), "#ffffff");
    assert_eq!(rgb_to_hex(Rgb::new(1, 2, 3)), "#010203");
}

#[test]
fn series_palette_starts_with_theme_primaries() {
    let colors = series_colors(10);
    assert_eq!(colors.len(), 10);
    assert_eq!(colors[0], Theme::Cyan.primary());
    assert_eq!(colors[1], Theme::Magenta.primary());
    assert_ne!(colors[8], colors[0]);
}
