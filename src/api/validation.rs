use tracing::warn;

use crate::core::{ChartPadding, Viewport};

/// Resolves requested dimensions, falling back per axis to `fallback` when
/// a value is non-finite or not positive.
pub(super) fn validate_dimensions(
    chart: &str,
    width: f64,
    height: f64,
    fallback: Viewport,
) -> Viewport {
    let width = if width.is_finite() && width > 0.0 {
        width
    } else {
        warn!(chart, width, fallback = fallback.width, "invalid chart width, using default");
        fallback.width
    };
    let height = if height.is_finite() && height > 0.0 {
        height
    } else {
        warn!(chart, height, fallback = fallback.height, "invalid chart height, using default");
        fallback.height
    };
    Viewport::new(width, height)
}

pub(super) fn validate_padding(chart: &str, padding: ChartPadding) -> ChartPadding {
    let sanitized = padding.sanitized();
    if sanitized != padding {
        warn!(chart, ?padding, "negative or non-finite padding clamped to zero");
    }
    sanitized
}

/// Returns a usable `[min, max]` for bounded scales such as the gauge.
pub(super) fn validate_bounds(chart: &str, min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        warn!(chart, min, max, "non-finite bounds, falling back to [0, 100]");
        return (0.0, 100.0);
    }
    if min == max {
        let widened = max + min.abs().max(1.0);
        warn!(chart, min, max = widened, "min equals max, widening range");
        return (min, widened);
    }
    if min > max {
        warn!(chart, min, max, "reversed bounds swapped");
        return (max, min);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_fall_back_per_axis() {
        let fallback = Viewport::new(600.0, 300.0);
        assert_eq!(
            validate_dimensions("line", f64::NAN, 120.0, fallback),
            Viewport::new(600.0, 120.0)
        );
        assert_eq!(
            validate_dimensions("line", 800.0, -5.0, fallback),
            Viewport::new(800.0, 300.0)
        );
    }

    #[test]
    fn equal_bounds_are_widened() {
        assert_eq!(validate_bounds("gauge", 5.0, 5.0), (5.0, 10.0));
        assert_eq!(validate_bounds("gauge", f64::INFINITY, 5.0), (0.0, 100.0));
    }
}
