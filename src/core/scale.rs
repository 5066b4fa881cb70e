use indexmap::IndexSet;

use crate::core::math::{self, TickValues};

/// Continuous domain-to-pixel mapping.
///
/// An inverted scale is a linear scale whose output range runs backwards,
/// which is how vertical axes put larger values higher on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Maps a domain value to the output range. A zero-width domain maps to
    /// the start of the range.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        math::scale(
            value,
            self.domain_start,
            self.domain_end,
            self.range_start,
            self.range_end,
        )
    }

    /// Maps a pixel back into the domain.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        math::scale(
            pixel,
            self.range_start,
            self.range_end,
            self.domain_start,
            self.domain_end,
        )
    }

    /// Nice tick values that fall inside the domain. The nice extent may
    /// overshoot a raw domain, so ticks beyond either end are dropped.
    #[must_use]
    pub fn ticks(self, count: usize) -> TickValues {
        let lo = self.domain_start.min(self.domain_end);
        let hi = self.domain_start.max(self.domain_end);
        let slack = (hi - lo) * 1e-9;
        math::generate_ticks(lo, hi, count)
            .into_iter()
            .filter(|tick| *tick >= lo - slack && *tick <= hi + slack)
            .collect()
    }
}

#[must_use]
pub fn create_linear_scale(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
    LinearScale::new(domain, range)
}

/// Linear scale with the output range flipped.
#[must_use]
pub fn create_inverted_scale(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
    LinearScale::new(domain, (range.1, range.0))
}

/// Categorical scale placing one band per distinct category.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    categories: IndexSet<String>,
    range_min: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    #[must_use]
    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.categories.get_index_of(category)
    }

    /// Start of the band at `index`. An empty scale is constant `range_min`.
    #[must_use]
    pub fn position_at(&self, index: usize) -> f64 {
        if self.categories.is_empty() {
            return self.range_min;
        }
        self.range_min + index as f64 * self.step + (self.step - self.bandwidth) / 2.0
    }

    #[must_use]
    pub fn center_at(&self, index: usize) -> f64 {
        self.position_at(index) + self.bandwidth / 2.0
    }

    #[must_use]
    pub fn position(&self, category: &str) -> Option<f64> {
        self.index_of(category).map(|index| self.position_at(index))
    }
}

/// Builds a band scale over `categories` in first-seen order.
///
/// `bandwidth = (range * (1 - padding)) / category_count`; duplicates are
/// collapsed. No categories yields a zero-bandwidth scale pinned at `range_min`.
#[must_use]
pub fn create_band_scale<S: AsRef<str>>(
    categories: &[S],
    range_min: f64,
    range_max: f64,
    padding: f64,
) -> BandScale {
    let categories: IndexSet<String> = categories
        .iter()
        .map(|category| category.as_ref().to_owned())
        .collect();
    if categories.is_empty() {
        return BandScale {
            categories,
            range_min,
            step: 0.0,
            bandwidth: 0.0,
        };
    }

    let padding = math::clamp(if padding.is_finite() { padding } else { 0.0 }, 0.0, 1.0);
    let count = categories.len() as f64;
    let span = range_max - range_min;
    BandScale {
        categories,
        range_min,
        step: span / count,
        bandwidth: (span * (1.0 - padding)) / count,
    }
}
