use serde::{Deserialize, Serialize};

#[must_use]
pub fn linear(t: f64) -> f64 {
    t
}

#[must_use]
pub fn ease_in_quad(t: f64) -> f64 {
    t * t
}

#[must_use]
pub fn ease_out_quad(t: f64) -> f64 {
    t * (2.0 - t)
}

#[must_use]
pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

#[must_use]
pub fn ease_in_cubic(t: f64) -> f64 {
    t * t * t
}

#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = t - 1.0;
    inv * inv * inv + 1.0
}

#[must_use]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let shifted = 2.0 * t - 2.0;
        0.5 * shifted * shifted * shifted + 1.0
    }
}

#[must_use]
pub fn ease_out_elastic(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let period = 0.3;
    2.0_f64.powf(-10.0 * t) * ((t - period / 4.0) * (2.0 * std::f64::consts::PI) / period).sin()
        + 1.0
}

/// Named easing curve, serializable as part of the animation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
    EaseOutElastic,
}

impl Easing {
    /// Evaluates the curve at `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => linear(t),
            Self::EaseInQuad => ease_in_quad(t),
            Self::EaseOutQuad => ease_out_quad(t),
            Self::EaseInOutQuad => ease_in_out_quad(t),
            Self::EaseInCubic => ease_in_cubic(t),
            Self::EaseOutCubic => ease_out_cubic(t),
            Self::EaseInOutCubic => ease_in_out_cubic(t),
            Self::EaseOutElastic => ease_out_elastic(t),
        }
    }

    /// CSS/SMIL spline equivalent used for declarative `<animate>` nodes.
    #[must_use]
    pub fn key_splines(self) -> Option<&'static str> {
        match self {
            Self::Linear => None,
            Self::EaseInQuad => Some("0.55 0.085 0.68 0.53"),
            Self::EaseOutQuad => Some("0.25 0.46 0.45 0.94"),
            Self::EaseInOutQuad => Some("0.455 0.03 0.515 0.955"),
            Self::EaseInCubic => Some("0.55 0.055 0.675 0.19"),
            Self::EaseOutCubic | Self::EaseOutElastic => Some("0.215 0.61 0.355 1"),
            Self::EaseInOutCubic => Some("0.645 0.045 0.355 1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curve_hits_both_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseInQuad,
            Easing::EaseOutQuad,
            Easing::EaseInOutQuad,
            Easing::EaseInCubic,
            Easing::EaseOutCubic,
            Easing::EaseInOutCubic,
            Easing::EaseOutElastic,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-9, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{easing:?} at 1");
        }
    }
}
