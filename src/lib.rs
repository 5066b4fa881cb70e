//! neon-charts: SVG charting engine with neon themes.
//!
//! Five chart engines (line, bar, gauge, donut, sparkline) share one
//! lifecycle contract, [`api::Chart`]. Engines build a vector scene graph
//! and mount it through a [`platform::Host`], the seam to the document that
//! also schedules frames, observes container resizes and shows tooltips.

pub mod api;
pub mod color;
pub mod core;
pub mod error;
pub mod interaction;
pub mod platform;
pub mod render;
pub mod telemetry;

pub use api::{Chart, ChartData, ChartKind, create_chart};
pub use error::{ChartError, ChartResult};
pub use platform::{ContainerRef, HeadlessHost, Host};
