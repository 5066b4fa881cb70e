use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, decimal_to_f64};
use crate::error::ChartResult;

/// Pixel-space point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Declared chart size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// X coordinate of a data point.
///
/// Strings that parse as RFC 3339 timestamps become `Time`; any other string
/// is a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Time(DateTime<Utc>),
    Category(String),
}

impl XValue {
    /// Continuous position for numeric and time values.
    #[must_use]
    pub fn as_continuous(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Time(time) => Some(datetime_to_unix_millis(*time)),
            Self::Category(_) => None,
        }
    }

    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Category(_))
    }

    #[must_use]
    pub fn is_time(&self) -> bool {
        matches!(self, Self::Time(_))
    }

    /// Key used to place the value on a band scale.
    #[must_use]
    pub fn category_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Time(time) => write!(f, "{}", time.format("%Y-%m-%d")),
            Self::Category(name) => f.write_str(name),
        }
    }
}

impl From<f64> for XValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for XValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for XValue {
    fn from(value: &str) -> Self {
        Self::Category(value.to_owned())
    }
}

impl From<String> for XValue {
    fn from(value: String) -> Self {
        Self::Category(value)
    }
}

impl From<DateTime<Utc>> for XValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

/// One sample of a line or bar series. A `None` y is a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: XValue,
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: impl Into<XValue>, y: f64) -> Self {
        Self {
            x: x.into(),
            y: Some(y),
            label: None,
            color: None,
            meta: None,
        }
    }

    #[must_use]
    pub fn gap(x: impl Into<XValue>) -> Self {
        Self {
            x: x.into(),
            y: None,
            label: None,
            color: None,
            meta: None,
        }
    }

    pub fn from_decimal(x: impl Into<XValue>, value: Decimal) -> ChartResult<Self> {
        Ok(Self::new(x, decimal_to_f64(value, "y")?))
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Finite y value, if any.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.y.filter(|y| y.is_finite())
    }
}

/// Named series sharing the chart-level scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSeries {
    pub id: String,
    pub name: String,
    pub data: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<crate::color::Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl DataSeries {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data,
            theme: None,
            color: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: crate::color::Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Slice of a donut chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutSegment {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<crate::color::Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl DonutSegment {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            color: None,
            theme: None,
            meta: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Gauge color band starting at `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeThreshold {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<crate::color::Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GaugeThreshold {
    #[must_use]
    pub fn new(value: f64, color: impl Into<String>) -> Self {
        Self {
            value,
            color: Some(color.into()),
            theme: None,
            label: None,
        }
    }
}

/// Insets between the chart edge and the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartPadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartPadding {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Replaces negative or non-finite insets with zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let fix = |value: f64| if value.is_finite() && value > 0.0 { value } else { 0.0 };
        Self::new(fix(self.top), fix(self.right), fix(self.bottom), fix(self.left))
    }
}

impl Default for ChartPadding {
    fn default() -> Self {
        Self::new(20.0, 20.0, 40.0, 50.0)
    }
}

/// Plot rectangle left after applying padding to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    #[must_use]
    pub fn from_padding(viewport: Viewport, padding: ChartPadding) -> Self {
        let padding = padding.sanitized();
        Self {
            x: padding.left,
            y: padding.top,
            width: (viewport.width - padding.left - padding.right).max(0.0),
            height: (viewport.height - padding.top - padding.bottom).max(0.0),
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }
}
