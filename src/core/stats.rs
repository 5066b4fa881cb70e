use ordered_float::OrderedFloat;

#[must_use]
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean; `0.0` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) / values.len() as f64
}

/// Median; `0.0` for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1].0 + sorted[mid].0) / 2.0
    } else {
        sorted[mid].0
    }
}

/// Population standard deviation; `0.0` for an empty slice.
#[must_use]
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|value| (value - avg) * (value - avg)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `(min, max)` over the finite values, or `None` when there are none.
#[must_use]
pub fn extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
}

/// Maps values onto `[0, 1]`. Constant input maps to `0.5` everywhere.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let Some((lo, hi)) = extent(values) else {
        return vec![0.5; values.len()];
    };
    if lo == hi {
        return vec![0.5; values.len()];
    }
    values.iter().map(|value| (value - lo) / (hi - lo)).collect()
}

/// Share of the total per value, in percent. A zero total yields zeros.
#[must_use]
pub fn to_percentages(values: &[f64]) -> Vec<f64> {
    let total = sum(values);
    if total == 0.0 || !total.is_finite() {
        return vec![0.0; values.len()];
    }
    values.iter().map(|value| value / total * 100.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_handles_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn degenerate_inputs_never_produce_nan() {
        assert_eq!(normalize(&[7.0, 7.0]), vec![0.5, 0.5]);
        assert_eq!(to_percentages(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(extent(&[]), None);
        assert_eq!(standard_deviation(&[2.0, 2.0]), 0.0);
    }
}
