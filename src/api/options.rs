use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::color::Theme;
use crate::core::{ChartPadding, DonutSegment, Easing, GaugeThreshold, StepPosition};
use crate::error::{ChartError, ChartResult};

use super::ChartData;

/// Option keys whose object values merge one level deep instead of being
/// replaced wholesale.
pub const DEEP_MERGE_KEYS: [&str; 8] = [
    "padding",
    "animation",
    "tooltip",
    "axis",
    "xAxis",
    "yAxis",
    "legend",
    "glow",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationConfig {
    pub enabled: bool,
    /// Milliseconds.
    pub duration: f64,
    pub easing: Easing,
    /// Per-element delay in milliseconds for staggered entrances.
    pub stagger: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: 750.0,
            easing: Easing::EaseOutCubic,
            stagger: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TooltipConfig {
    pub enabled: bool,
    pub offset: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            offset: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlowConfig {
    pub enabled: bool,
    /// Blur standard deviation of the glow filter.
    pub intensity: f64,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisConfig {
    pub show: bool,
    pub show_grid: bool,
    pub tick_count: usize,
    /// Fixed label decimals; derived from the tick step when unset.
    pub precision: Option<u32>,
    pub label: Option<String>,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            show: true,
            show_grid: true,
            tick_count: 5,
            precision: None,
            label: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegendConfig {
    pub show: bool,
    pub position: LegendPosition,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            show: true,
            position: LegendPosition::Top,
        }
    }
}

/// Options shared by every chart type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseOptions {
    pub width: f64,
    pub height: f64,
    pub theme: Theme,
    pub padding: ChartPadding,
    pub animation: AnimationConfig,
    pub tooltip: TooltipConfig,
    pub glow: GlowConfig,
    pub scanlines: bool,
    pub responsive: bool,
    pub aria_label: Option<String>,
}

impl Default for BaseOptions {
    fn default() -> Self {
        Self::sized(600.0, 300.0)
    }
}

impl BaseOptions {
    #[must_use]
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            theme: Theme::default(),
            padding: ChartPadding::default(),
            animation: AnimationConfig::default(),
            tooltip: TooltipConfig::default(),
            glow: GlowConfig::default(),
            scanlines: false,
            responsive: false,
            aria_label: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interpolation {
    #[default]
    Linear,
    Smooth,
    Step,
    StepBefore,
    StepAfter,
}

impl Interpolation {
    #[must_use]
    pub fn step_position(self) -> Option<StepPosition> {
        match self {
            Self::Step => Some(StepPosition::Middle),
            Self::StepBefore => Some(StepPosition::Before),
            Self::StepAfter => Some(StepPosition::After),
            Self::Linear | Self::Smooth => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineOptions {
    #[serde(flatten)]
    pub base: BaseOptions,
    pub data: ChartData,
    pub interpolation: Interpolation,
    pub tension: f64,
    pub stroke_width: f64,
    pub show_points: bool,
    pub point_radius: f64,
    pub fill_area: bool,
    pub connect_nulls: bool,
    /// Series longer than this are simplified before drawing.
    pub max_points: usize,
    /// Douglas-Peucker tolerance in pixels.
    pub simplify_tolerance: f64,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    pub legend: LegendConfig,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            base: BaseOptions::sized(600.0, 300.0),
            data: ChartData::Series(Vec::new()),
            interpolation: Interpolation::Linear,
            tension: 0.5,
            stroke_width: 2.0,
            show_points: true,
            point_radius: 4.0,
            fill_area: false,
            connect_nulls: false,
            max_points: 1000,
            simplify_tolerance: 1.0,
            y_min: None,
            y_max: None,
            x_axis: AxisConfig::default(),
            y_axis: AxisConfig::default(),
            legend: LegendConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupMode {
    #[default]
    Grouped,
    Stacked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarOptions {
    #[serde(flatten)]
    pub base: BaseOptions,
    pub data: ChartData,
    pub orientation: Orientation,
    pub group_mode: GroupMode,
    /// Fraction of each band left empty between categories.
    pub bar_padding: f64,
    /// Fraction of the band left empty between bars of one group.
    pub bar_gap: f64,
    pub border_radius: f64,
    pub show_values: bool,
    pub value_precision: Option<u32>,
    pub axis: AxisConfig,
    pub legend: LegendConfig,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            base: BaseOptions::sized(600.0, 300.0),
            data: ChartData::Series(Vec::new()),
            orientation: Orientation::Vertical,
            group_mode: GroupMode::Grouped,
            bar_padding: 0.2,
            bar_gap: 0.1,
            border_radius: 2.0,
            show_values: false,
            value_precision: None,
            axis: AxisConfig::default(),
            legend: LegendConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GaugeOptions {
    #[serde(flatten)]
    pub base: BaseOptions,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// Degrees, 0 at twelve o'clock, clockwise.
    pub start_angle: f64,
    pub end_angle: f64,
    pub thickness: f64,
    pub thresholds: Vec<GaugeThreshold>,
    pub show_ticks: bool,
    pub tick_count: usize,
    pub show_value: bool,
    pub value_precision: u32,
    pub unit: String,
    pub label: Option<String>,
}

impl Default for GaugeOptions {
    fn default() -> Self {
        Self {
            base: BaseOptions {
                padding: ChartPadding::uniform(10.0),
                ..BaseOptions::sized(200.0, 200.0)
            },
            value: 0.0,
            min: 0.0,
            max: 100.0,
            start_angle: -135.0,
            end_angle: 135.0,
            thickness: 12.0,
            thresholds: Vec::new(),
            show_ticks: true,
            tick_count: 10,
            show_value: true,
            value_precision: 0,
            unit: String::new(),
            label: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentSort {
    #[default]
    None,
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DonutOptions {
    #[serde(flatten)]
    pub base: BaseOptions,
    pub data: Vec<DonutSegment>,
    /// Inner radius as a fraction of the outer radius; 0 draws a pie.
    pub inner_radius: f64,
    /// Gap between adjacent segments, in degrees.
    pub pad_angle: f64,
    pub sort: SegmentSort,
    pub center_text: Option<String>,
    pub center_subtext: Option<String>,
    pub show_legend: bool,
    pub legend_width: f64,
    pub hover_scale: f64,
}

impl Default for DonutOptions {
    fn default() -> Self {
        Self {
            base: BaseOptions {
                padding: ChartPadding::uniform(10.0),
                ..BaseOptions::sized(300.0, 300.0)
            },
            data: Vec::new(),
            inner_radius: 0.6,
            pad_angle: 1.0,
            sort: SegmentSort::None,
            center_text: None,
            center_subtext: None,
            show_legend: false,
            legend_width: 100.0,
            hover_scale: 1.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SparklineOptions {
    #[serde(flatten)]
    pub base: BaseOptions,
    pub data: Vec<f64>,
    pub smooth: bool,
    pub fill_area: bool,
    pub stroke_width: f64,
    pub show_end_point: bool,
    pub show_min_max: bool,
}

impl Default for SparklineOptions {
    fn default() -> Self {
        Self {
            base: BaseOptions {
                padding: ChartPadding::uniform(2.0),
                glow: GlowConfig {
                    enabled: true,
                    intensity: 1.5,
                },
                ..BaseOptions::sized(120.0, 30.0)
            },
            data: Vec::new(),
            smooth: false,
            fill_area: false,
            stroke_width: 1.5,
            show_end_point: true,
            show_min_max: false,
        }
    }
}

/// Merges `patch` into `target` key by key. Object values under
/// [`DEEP_MERGE_KEYS`] merge one level deep; everything else is replaced.
pub fn merge_options(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        match (target.get_mut(key), value) {
            (Some(Value::Object(current)), Value::Object(nested))
                if DEEP_MERGE_KEYS.contains(&key.as_str()) =>
            {
                for (nested_key, nested_value) in nested {
                    current.insert(nested_key.clone(), nested_value.clone());
                }
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Produces a new options value from `current` with `patch` merged over it.
pub fn apply_options_patch<T>(current: &T, patch: &Value) -> ChartResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(patch) = patch else {
        return Err(ChartError::InvalidOptions(
            "options patch must be a JSON object".to_owned(),
        ));
    };
    let Value::Object(mut merged) = serde_json::to_value(current)? else {
        return Err(ChartError::InvalidOptions(
            "options did not serialize to an object".to_owned(),
        ));
    };
    merge_options(&mut merged, patch);
    Ok(serde_json::from_value(Value::Object(merged))?)
}

/// Builds typed options from caller JSON laid over the type's defaults.
pub fn options_from_json<T>(value: &Value) -> ChartResult<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    match value {
        Value::Null => Ok(T::default()),
        _ => apply_options_patch(&T::default(), value),
    }
}
