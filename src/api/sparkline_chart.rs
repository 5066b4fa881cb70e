use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::color::CHROME;
use crate::core::path::close_to_baseline;
use crate::core::stats::extent;
use crate::core::{
    DataPoint, PlotArea, Point, Viewport, create_inverted_scale, create_linear_scale, linear_path,
    smooth_path,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ChartEventKind, EventHandler, PointerInput, SubscriptionId};
use crate::platform::{ContainerRef, FrameHandle, Host};
use crate::render::{GradientStop, SvgNode, animate, circle, group, linear_gradient, path};

use super::chart_core::ChartCore;
use super::options::{SparklineOptions, apply_options_patch};
use super::validation::validate_padding;
use super::{Chart, ChartData, ChartKind};

const SMOOTH_TENSION: f64 = 0.5;

/// Direction of a sparkline from its first to its last value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// Summary of the plotted values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SparklineStats {
    pub min: f64,
    pub max: f64,
    pub first: f64,
    pub last: f64,
    pub trend: Trend,
}

/// Axis-free inline line chart.
pub struct SparklineChart<H: Host> {
    core: ChartCore<H>,
    options: SparklineOptions,
}

impl<H: Host> SparklineChart<H> {
    pub fn new(
        host: Rc<RefCell<H>>,
        container: impl Into<ContainerRef>,
        options: SparklineOptions,
    ) -> ChartResult<Self> {
        let core = ChartCore::new(host, container.into(), ChartKind::Sparkline, &options.base)?;
        let mut chart = Self { core, options };
        chart.core.configure(&mut chart.options.base);
        chart.rebuild_defs();
        chart.render()?;
        Ok(chart)
    }

    #[must_use]
    pub fn options(&self) -> &SparklineOptions {
        &self.options
    }

    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.options.data
    }

    /// Derived from the current data on every call; `None` when there is
    /// nothing to summarize.
    #[must_use]
    pub fn get_stats(&self) -> Option<SparklineStats> {
        let values = self.values();
        let (min, max) = extent(&values)?;
        let first = *values.first()?;
        let last = *values.last()?;
        let trend = if last > first {
            Trend::Up
        } else if last < first {
            Trend::Down
        } else {
            Trend::Flat
        };
        Some(SparklineStats {
            min,
            max,
            first,
            last,
            trend,
        })
    }

    pub fn set_typed_options(&mut self, options: SparklineOptions) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        self.options = options;
        self.core.configure(&mut self.options.base);
        self.rebuild_defs();
        self.render()
    }

    fn values(&self) -> Vec<f64> {
        self.options
            .data
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .collect()
    }

    fn color(&self) -> &'static str {
        self.options.base.theme.primary()
    }

    fn rebuild_defs(&mut self) {
        let mut defs = self.core.standard_defs(&self.options.base);
        if self.options.fill_area {
            defs.push(linear_gradient(
                &self.core.def_id("area"),
                &[
                    GradientStop::new(0.0, self.color(), 0.4),
                    GradientStop::new(1.0, self.color(), 0.0),
                ],
                true,
            ));
        }
        self.core.set_defs(defs);
    }

    /// Value extent widened by 10% of its range on both sides, or by one
    /// unit when every value is equal.
    fn y_domain(values: &[f64]) -> (f64, f64) {
        match extent(values) {
            Some((min, max)) if max > min => {
                let margin = (max - min) * 0.1;
                (min - margin, max + margin)
            }
            Some((value, _)) => (value - 1.0, value + 1.0),
            None => (0.0, 1.0),
        }
    }

    fn project(&self, values: &[f64], plot: PlotArea) -> Vec<Point> {
        let y_scale = create_inverted_scale(Self::y_domain(values), (plot.y, plot.bottom()));
        if values.len() == 1 {
            return vec![Point::new(plot.x + plot.width / 2.0, y_scale.map(values[0]))];
        }
        let x_scale = create_linear_scale(
            (0.0, (values.len() - 1) as f64),
            (plot.x, plot.right()),
        );
        values
            .iter()
            .enumerate()
            .map(|(index, value)| Point::new(x_scale.map(index as f64), y_scale.map(*value)))
            .collect()
    }

    fn marker(point: Point, class: &str, color: &str, radius: f64) -> SvgNode {
        circle(point.x, point.y, radius)
            .class(class)
            .attr("fill", color)
            .attr("stroke", CHROME.background)
            .attr("stroke-width", 1)
    }
}

impl<H: Host> Chart for SparklineChart<H> {
    fn kind(&self) -> ChartKind {
        ChartKind::Sparkline
    }

    fn render(&mut self) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        let padding = validate_padding("sparkline", self.options.base.padding);
        let plot = PlotArea::from_padding(self.core.viewport(), padding);
        let animated = self.core.should_animate(&self.options.base.animation);
        let animation = &self.options.base.animation;
        let values = self.values();
        let points = self.project(&values, plot);
        let color = self.color();

        let mut content = group("nc-content");
        let mut line_group = group("nc-sparkline");
        if points.len() > 1 {
            let d = if self.options.smooth {
                smooth_path(&points, SMOOTH_TENSION)
            } else {
                linear_path(&points)
            };
            if self.options.fill_area {
                line_group.push(
                    path(close_to_baseline(&d, &points, plot.bottom()))
                        .class("nc-area")
                        .attr("fill", format!("url(#{})", self.core.def_id("area")))
                        .attr("stroke", "none"),
                );
            }
            let mut line = path(d)
                .class("nc-line")
                .attr("fill", "none")
                .attr("stroke", color)
                .attr("stroke-width", self.options.stroke_width)
                .attr("stroke-linejoin", "round")
                .attr("stroke-linecap", "round")
                .attr_opt("filter", self.core.glow_ref(&self.options.base));
            if animated {
                line = line
                    .attr("pathLength", "1")
                    .attr("stroke-dasharray", "1")
                    .attr("stroke-dashoffset", "0")
                    .child(animate(
                        "stroke-dashoffset",
                        1,
                        0,
                        animation.duration,
                        0.0,
                        animation.easing,
                    ));
            }
            line_group.push(line);
        }

        if self.options.show_min_max && values.len() > 1 {
            let mut min_index = 0;
            let mut max_index = 0;
            for (index, value) in values.iter().enumerate() {
                if *value < values[min_index] {
                    min_index = index;
                }
                if *value > values[max_index] {
                    max_index = index;
                }
            }
            line_group.push(Self::marker(points[min_index], "nc-sparkline-min", CHROME.text_muted, 2.0));
            line_group.push(Self::marker(points[max_index], "nc-sparkline-max", color, 2.0));
        }

        if self.options.show_end_point {
            if let Some(last) = points.last() {
                let mut end = Self::marker(*last, "nc-sparkline-end", color, 2.5);
                if animated {
                    end = end.attr("opacity", "0").child(animate(
                        "opacity",
                        0,
                        1,
                        animation.duration * 0.3,
                        animation.duration,
                        animation.easing,
                    ));
                }
                line_group.push(end);
            }
        }

        content.push(line_group);
        self.core.mount(&self.options.base, content);
        Ok(())
    }

    fn update(&mut self, data: ChartData) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        self.options.data = match data {
            ChartData::Values(values) => values,
            ChartData::Points(points) => points.iter().filter_map(DataPoint::value).collect(),
            ChartData::Series(series) if series.len() <= 1 => series
                .first()
                .map(|series| series.data.iter().filter_map(DataPoint::value).collect())
                .unwrap_or_default(),
            other => {
                return Err(ChartError::InvalidData(format!(
                    "sparkline expects a list of numbers, got {}",
                    other.variant_name()
                )));
            }
        };
        self.render()
    }

    fn set_options(&mut self, patch: serde_json::Value) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        let next = apply_options_patch(&self.options, &patch)?;
        self.set_typed_options(next)
    }

    fn resize(&mut self, width: Option<f64>, height: Option<f64>) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        let viewport = self.core.resolve_resize(width, height);
        self.options.base.width = viewport.width;
        self.options.base.height = viewport.height;
        self.core.set_viewport(viewport);
        self.render()?;
        self.core.emit_resize();
        Ok(())
    }

    fn destroy(&mut self) {
        self.core.destroy();
    }

    fn get_svg(&self) -> ChartResult<&SvgNode> {
        self.core.get_svg()
    }

    fn to_svg(&self) -> ChartResult<String> {
        self.core.to_svg()
    }

    fn on(&mut self, kind: ChartEventKind, handler: EventHandler) -> SubscriptionId {
        self.core.on(kind, handler)
    }

    fn off(&mut self, kind: ChartEventKind, id: Option<SubscriptionId>) {
        self.core.off(kind, id);
    }

    fn handle_pointer(&mut self, _input: PointerInput) {}

    fn animation_frame(&mut self, handle: FrameHandle, _now_ms: f64) {
        if let Some(size) = self.core.take_resize(handle) {
            let result = self.resize(Some(size.width), Some(size.height));
            self.core.report("resize", result);
        }
    }

    fn container_resized(&mut self, width: f64, height: f64) {
        self.core.container_resized(width, height);
    }

    fn dimensions(&self) -> Viewport {
        self.core.viewport()
    }

    fn is_destroyed(&self) -> bool {
        self.core.is_destroyed()
    }
}
