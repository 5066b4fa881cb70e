use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

#[must_use]
pub fn unix_millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis.round() as i64)
}

/// Formats `value` with at most `precision` decimals and no trailing zeros.
///
/// Rounding goes through `Decimal` so tick labels like `0.1 + 0.2` print as
/// `0.3` rather than exposing binary float noise.
#[must_use]
pub fn format_decimal(value: f64, precision: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let Some(decimal) = Decimal::from_f64(value) else {
        return format!("{value:.prec$}", prec = precision as usize);
    };
    let text = decimal.round_dp(precision).normalize().to_string();
    if text == "-0" { "0".to_owned() } else { text }
}

/// Decimal count needed to distinguish ticks spaced `step` apart.
#[must_use]
pub fn precision_from_step(step: f64) -> u32 {
    if !step.is_finite() || step <= 0.0 {
        return 2;
    }
    let text = format!("{:.12}", step.abs());
    let Some((_, fraction)) = text.split_once('.') else {
        return 0;
    };
    fraction.trim_end_matches('0').len().min(12) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_decimal_hides_float_noise() {
        assert_eq!(format_decimal(0.1 + 0.2, 2), "0.3");
        assert_eq!(format_decimal(1500.0, 0), "1500");
        assert_eq!(format_decimal(-0.0001, 2), "0");
    }

    #[test]
    fn precision_follows_step() {
        assert_eq!(precision_from_step(20.0), 0);
        assert_eq!(precision_from_step(0.25), 2);
    }
}
