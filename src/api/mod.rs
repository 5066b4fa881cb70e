//! Chart engines and their shared capability contract.
//!
//! Each engine composes a [`chart_core::ChartCore`] for lifecycle plumbing
//! (container, scene, events, tooltip, resize observation, animation
//! handle) and implements [`Chart`] on top of its own rendering pipeline.

mod axis;
mod bar_chart;
mod chart_core;
mod donut_chart;
mod factory;
mod gauge_chart;
mod legend;
mod line_chart;
mod options;
mod sparkline_chart;
mod validation;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, DataSeries, DonutSegment, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ChartEventKind, EventHandler, PointerInput, SubscriptionId};
use crate::platform::FrameHandle;
use crate::render::SvgNode;

pub use bar_chart::BarChart;
pub use donut_chart::{DonutChart, SegmentArc};
pub use factory::{create_chart, create_chart_of_kind};
pub use gauge_chart::GaugeChart;
pub use line_chart::{LineChart, PointFormatter};
pub use options::{
    AnimationConfig, AxisConfig, BarOptions, BaseOptions, DEEP_MERGE_KEYS, DonutOptions,
    GaugeOptions, GlowConfig, GroupMode, Interpolation, LegendConfig, LegendPosition,
    LineOptions, Orientation, SegmentSort, SparklineOptions, TooltipConfig, apply_options_patch,
    merge_options, options_from_json,
};
pub use sparkline_chart::{SparklineChart, SparklineStats, Trend};

/// Chart type tag accepted by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    Bar,
    Gauge,
    Donut,
    Sparkline,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        Self::Line,
        Self::Bar,
        Self::Gauge,
        Self::Donut,
        Self::Sparkline,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Gauge => "gauge",
            Self::Donut => "donut",
            Self::Sparkline => "sparkline",
        }
    }

    /// Size used when the requested width or height is unusable.
    #[must_use]
    pub fn default_size(self) -> Viewport {
        match self {
            Self::Line | Self::Bar => Viewport::new(600.0, 300.0),
            Self::Gauge => Viewport::new(200.0, 200.0),
            Self::Donut => Viewport::new(300.0, 300.0),
            Self::Sparkline => Viewport::new(120.0, 30.0),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| ChartError::UnknownChartType(raw.to_owned()))
    }
}

/// Input accepted by [`Chart::update`].
///
/// Deserializes untagged: an array of series, of points, of segments, of
/// numbers, or a single number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartData {
    Series(Vec<DataSeries>),
    Points(Vec<DataPoint>),
    Segments(Vec<DonutSegment>),
    Values(Vec<f64>),
    Value(f64),
}

impl Default for ChartData {
    fn default() -> Self {
        Self::Series(Vec::new())
    }
}

impl ChartData {
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Series(_) => "series",
            Self::Points(_) => "points",
            Self::Segments(_) => "segments",
            Self::Values(_) => "values",
            Self::Value(_) => "value",
        }
    }

    /// Series view for line and bar charts. A flat point list becomes one
    /// synthetic series; a bare value list becomes points indexed from zero.
    pub fn into_series(self) -> ChartResult<Vec<DataSeries>> {
        match self {
            Self::Series(series) => Ok(series),
            Self::Points(points) => Ok(vec![DataSeries::new("series-0", "Series 1", points)]),
            Self::Values(values) => Ok(vec![DataSeries::new(
                "series-0",
                "Series 1",
                values
                    .into_iter()
                    .enumerate()
                    .map(|(index, value)| DataPoint::new(index as f64, value))
                    .collect(),
            )]),
            other => Err(ChartError::InvalidData(format!(
                "expected series or points, got {}",
                other.variant_name()
            ))),
        }
    }
}

/// Capability contract shared by every engine.
pub trait Chart {
    fn kind(&self) -> ChartKind;

    /// Rebuilds the scene from current data and options.
    fn render(&mut self) -> ChartResult<()>;

    /// Replaces the working data and re-renders.
    fn update(&mut self, data: ChartData) -> ChartResult<()>;

    /// Merges a JSON options patch over the current options and re-renders.
    fn set_options(&mut self, patch: serde_json::Value) -> ChartResult<()>;

    /// Updates the declared size (omitted axes keep their value), re-renders
    /// and emits `resize`.
    fn resize(&mut self, width: Option<f64>, height: Option<f64>) -> ChartResult<()>;

    /// Releases every document resource. Repeated calls are no-ops.
    fn destroy(&mut self);

    fn get_svg(&self) -> ChartResult<&SvgNode>;

    fn to_svg(&self) -> ChartResult<String>;

    fn on(&mut self, kind: ChartEventKind, handler: EventHandler) -> SubscriptionId;

    fn off(&mut self, kind: ChartEventKind, id: Option<SubscriptionId>);

    /// Pointer input on a keyed scene node.
    fn handle_pointer(&mut self, input: PointerInput);

    /// A frame this chart requested has fired.
    fn animation_frame(&mut self, handle: FrameHandle, now_ms: f64);

    /// Resize observer notification for the container.
    fn container_resized(&mut self, width: f64, height: f64);

    fn dimensions(&self) -> Viewport;

    fn is_destroyed(&self) -> bool;
}
