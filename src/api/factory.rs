use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::error::ChartResult;
use crate::platform::{ContainerRef, Host};

use super::options::options_from_json;
use super::{BarChart, Chart, ChartKind, DonutChart, GaugeChart, LineChart, SparklineChart};

/// Builds the engine registered under `kind` (`line`, `bar`, `gauge`, `donut`
/// or `sparkline`) with `options` laid over that engine's defaults.
///
/// An unknown tag is [`crate::ChartError::UnknownChartType`].
pub fn create_chart<H: Host + 'static>(
    kind: &str,
    host: Rc<RefCell<H>>,
    container: impl Into<ContainerRef>,
    options: &Value,
) -> ChartResult<Box<dyn Chart>> {
    let kind: ChartKind = kind.parse()?;
    create_chart_of_kind(kind, host, container, options)
}

/// Typed-tag variant of [`create_chart`].
pub fn create_chart_of_kind<H: Host + 'static>(
    kind: ChartKind,
    host: Rc<RefCell<H>>,
    container: impl Into<ContainerRef>,
    options: &Value,
) -> ChartResult<Box<dyn Chart>> {
    let container = container.into();
    debug!(chart = kind.as_str(), "creating chart");
    let chart: Box<dyn Chart> = match kind {
        ChartKind::Line => Box::new(LineChart::new(host, container, options_from_json(options)?)?),
        ChartKind::Bar => Box::new(BarChart::new(host, container, options_from_json(options)?)?),
        ChartKind::Gauge => Box::new(GaugeChart::new(host, container, options_from_json(options)?)?),
        ChartKind::Donut => Box::new(DonutChart::new(host, container, options_from_json(options)?)?),
        ChartKind::Sparkline => Box::new(SparklineChart::new(
            host,
            container,
            options_from_json(options)?,
        )?),
    };
    Ok(chart)
}
