use smallvec::SmallVec;
use tracing::warn;

/// Tick values for one axis. Axes rarely carry more than a dozen ticks.
pub type TickValues = SmallVec<[f64; 16]>;

#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamps `value` into `[lo, hi]`.
///
/// Unlike `f64::clamp` this never panics: reversed bounds are swapped.
#[must_use]
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    value.max(lo).min(hi)
}

/// Maps `value` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`.
///
/// A zero-width input domain maps everything to `out_lo`.
#[must_use]
pub fn scale(value: f64, in_lo: f64, in_hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    if in_lo == in_hi {
        return out_lo;
    }
    out_lo + (value - in_lo) * (out_hi - out_lo) / (in_hi - in_lo)
}

/// Rounds a raw step up to the nearest 1, 2 or 5 times a power of ten.
#[must_use]
pub fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return f64::NAN;
    }

    let magnitude = 10.0_f64.powf(raw_step.log10().floor());
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return f64::NAN;
    }

    let normalized = raw_step / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Expands `[min, max]` outward to bounds that fall on a nice step for
/// roughly `tick_count` intervals.
///
/// The result always contains the input range except when the input is
/// non-finite, which yields `[0, 1]`.
#[must_use]
pub fn nice_extent(min: f64, max: f64, tick_count: usize) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        warn!(min, max, "non-finite axis extent, falling back to [0, 1]");
        return (0.0, 1.0);
    }

    let (mut lo, mut hi) = if min <= max { (min, max) } else { (max, min) };
    if lo == hi {
        if lo == 0.0 {
            return (0.0, 1.0);
        }
        let pad = lo.abs() * 0.1;
        lo -= pad;
        hi += pad;
    }

    let intervals = tick_count.max(1) as f64;
    let step = nice_step((hi - lo) / intervals);
    if !step.is_finite() || step <= 0.0 {
        return (lo, hi);
    }

    let mut nice_lo = (lo / step).floor() * step;
    let mut nice_hi = (hi / step).ceil() * step;
    // floor/ceil of a quotient can land one ulp on the wrong side
    if nice_lo > lo {
        nice_lo -= step;
    }
    if nice_hi < hi {
        nice_hi += step;
    }
    (nice_lo, nice_hi)
}

/// Returns `count + 1` evenly spaced values spanning the nice extent of
/// `[min, max]`.
#[must_use]
pub fn generate_ticks(min: f64, max: f64, count: usize) -> TickValues {
    let count = count.max(1);
    let (lo, hi) = nice_extent(min, max, count);
    let step = (hi - lo) / count as f64;
    (0..=count).map(|i| lo + step * i as f64).collect()
}

#[must_use]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_step_snaps_to_one_two_five() {
        assert_eq!(nice_step(0.8), 1.0);
        assert_eq!(nice_step(1.7), 2.0);
        assert_eq!(nice_step(3.2), 5.0);
        assert_eq!(nice_step(7.0), 10.0);
        assert_eq!(nice_step(42.0), 50.0);
        assert!(nice_step(0.0).is_nan());
    }

    #[test]
    fn nice_extent_rounds_outward() {
        assert_eq!(nice_extent(3.0, 97.0, 5), (0.0, 100.0));
        assert_eq!(nice_extent(0.0, 0.0, 5), (0.0, 1.0));
    }

    #[test]
    fn clamp_accepts_reversed_bounds() {
        assert_eq!(clamp(5.0, 10.0, 0.0), 5.0);
        assert_eq!(clamp(-1.0, 10.0, 0.0), 0.0);
    }
}
