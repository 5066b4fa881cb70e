pub mod easing;
pub mod math;
pub mod path;
pub mod primitives;
pub mod scale;
pub mod stats;
pub mod types;

pub use easing::Easing;
pub use math::{TickValues, clamp, generate_ticks, lerp, nice_extent, scale};
pub use path::{StepPosition, linear_path, simplify_path, smooth_path, step_path};
pub use scale::{BandScale, LinearScale, create_band_scale, create_inverted_scale, create_linear_scale};
pub use types::{
    ChartPadding, DataPoint, DataSeries, DonutSegment, GaugeThreshold, PlotArea, Point, Viewport,
    XValue,
};
