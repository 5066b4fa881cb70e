use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexSet;
use tracing::debug;

use crate::color::CHROME;
use crate::core::path::close_to_baseline;
use crate::core::primitives::format_decimal;
use crate::core::stats::extent;
use crate::core::{
    BandScale, DataPoint, DataSeries, LinearScale, PlotArea, Point, Viewport, XValue, clamp,
    create_band_scale, create_inverted_scale, create_linear_scale, linear_path, nice_extent, simplify_path,
    smooth_path, step_path,
};
use crate::error::ChartResult;
use crate::interaction::{
    ChartEventKind, EventData, EventHandler, PointerInput, PointerKind, SubscriptionId,
    TooltipContent, TooltipRow,
};
use crate::platform::{ContainerRef, FrameHandle, Host};
use crate::render::{GradientStop, SvgNode, animate, circle, group, linear_gradient, path};

use super::axis::{AxisSide, TickFormat, band_axis, linear_axis};
use super::chart_core::{ChartCore, HitTarget, series_accent};
use super::legend::{LegendEntry, legend_needed, legend_padding, render_legend};
use super::options::{Interpolation, LineOptions, apply_options_patch};
use super::validation::validate_padding;
use super::{Chart, ChartData, ChartKind};

/// Caller-supplied tooltip text for one point.
pub type PointFormatter = Box<dyn Fn(&DataSeries, &DataPoint) -> String>;

/// X placement chosen from the runtime type of the first x value.
enum XScale {
    Band(BandScale),
    Linear { scale: LinearScale, format: TickFormat },
}

impl XScale {
    fn position(&self, x: &XValue) -> Option<f64> {
        match self {
            Self::Band(band) => band
                .index_of(&x.category_key())
                .map(|index| band.center_at(index)),
            Self::Linear { scale, .. } => x.as_continuous().map(|value| scale.map(value)),
        }
    }
}

/// Projected sample of one series, tagged with its index in the data.
#[derive(Debug, Clone, Copy)]
struct Projected {
    index: usize,
    point: Point,
}

/// Multi-series line chart with optional area fill and point markers.
pub struct LineChart<H: Host> {
    core: ChartCore<H>,
    options: LineOptions,
    series: Vec<DataSeries>,
    legend_hidden: IndexSet<usize>,
    formatter: Option<PointFormatter>,
}

impl<H: Host> LineChart<H> {
    pub fn new(
        host: Rc<RefCell<H>>,
        container: impl Into<ContainerRef>,
        options: LineOptions,
    ) -> ChartResult<Self> {
        let core = ChartCore::new(host, container.into(), ChartKind::Line, &options.base)?;
        let series = options.data.clone().into_series()?;
        let mut chart = Self {
            core,
            options,
            series,
            legend_hidden: IndexSet::new(),
            formatter: None,
        };
        chart.core.configure(&mut chart.options.base);
        chart.rebuild_defs();
        chart.render()?;
        Ok(chart)
    }

    #[must_use]
    pub fn options(&self) -> &LineOptions {
        &self.options
    }

    #[must_use]
    pub fn series(&self) -> &[DataSeries] {
        &self.series
    }

    /// Replaces the default tooltip body for point hovers.
    pub fn set_tooltip_formatter(&mut self, formatter: PointFormatter) {
        self.formatter = Some(formatter);
    }

    /// Replaces all options at once; data is re-normalized.
    pub fn set_typed_options(&mut self, options: LineOptions) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        self.series = options.data.clone().into_series()?;
        self.options = options;
        self.legend_hidden.clear();
        self.core.configure(&mut self.options.base);
        self.rebuild_defs();
        self.render()
    }

    fn color_of(&self, index: usize) -> String {
        let series = &self.series[index];
        series_accent(
            series.color.as_deref(),
            series.theme,
            self.options.base.theme,
            index,
        )
    }

    fn is_drawn(&self, index: usize) -> bool {
        self.series[index].visible && !self.legend_hidden.contains(&index)
    }

    fn rebuild_defs(&mut self) {
        let mut defs = self.core.standard_defs(&self.options.base);
        if self.options.fill_area {
            for index in 0..self.series.len() {
                let color = self.color_of(index);
                defs.push(linear_gradient(
                    &self.core.def_id(&format!("area-{index}")),
                    &[
                        GradientStop::new(0.0, color.clone(), 0.35),
                        GradientStop::new(1.0, color, 0.0),
                    ],
                    true,
                ));
            }
        }
        self.core.set_defs(defs);
    }

    fn y_domain(&self) -> (f64, f64) {
        let values: Vec<f64> = (0..self.series.len())
            .filter(|index| self.is_drawn(*index))
            .flat_map(|index| self.series[index].data.iter().filter_map(DataPoint::value))
            .collect();
        let (lo, hi) = match extent(&values) {
            Some((min, max)) if min >= 0.0 => (0.0, max),
            Some(extent) => extent,
            None => (0.0, 1.0),
        };
        let (lo, hi) = nice_extent(lo, hi, self.options.y_axis.tick_count);
        (
            self.options.y_min.unwrap_or(lo),
            self.options.y_max.unwrap_or(hi),
        )
    }

    fn x_scale(&self, plot: PlotArea) -> XScale {
        let drawn: Vec<&DataSeries> = (0..self.series.len())
            .filter(|index| self.is_drawn(*index))
            .map(|index| &self.series[index])
            .collect();
        let first = drawn.iter().find_map(|series| series.data.first());
        let categorical = first.is_some_and(|point| point.x.is_categorical());

        if categorical {
            let categories: Vec<String> = drawn
                .iter()
                .flat_map(|series| series.data.iter().map(|point| point.x.category_key()))
                .collect();
            return XScale::Band(create_band_scale(&categories, plot.x, plot.right(), 0.0));
        }

        let format = if first.is_some_and(|point| point.x.is_time()) {
            TickFormat::Time
        } else {
            TickFormat::Number
        };
        let xs: Vec<f64> = drawn
            .iter()
            .flat_map(|series| series.data.iter().filter_map(|point| point.x.as_continuous()))
            .collect();
        let domain = match extent(&xs) {
            Some((min, max)) if format == TickFormat::Number => {
                nice_extent(min, max, self.options.x_axis.tick_count)
            }
            Some((min, max)) if min < max => (min, max),
            Some((min, _)) => (min - 1.0, min + 1.0),
            None => (0.0, 1.0),
        };
        XScale::Linear {
            scale: create_linear_scale(domain, (plot.x, plot.right())),
            format,
        }
    }

    /// Contiguous runs of drawable points. Null values break a run unless
    /// `connect_nulls` is set, in which case they are skipped.
    fn project_runs(
        &self,
        series: &DataSeries,
        x_scale: &XScale,
        y_scale: LinearScale,
    ) -> Vec<Vec<Projected>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for (index, point) in series.data.iter().enumerate() {
            let projected = x_scale
                .position(&point.x)
                .zip(point.value())
                .map(|(x, y)| Projected {
                    index,
                    point: Point::new(x, y_scale.map(y)),
                });
            match projected {
                Some(projected) => current.push(projected),
                None if self.options.connect_nulls => {}
                None => {
                    if !current.is_empty() {
                        runs.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    fn run_path(&self, points: &[Point]) -> String {
        if points.len() < 2 {
            return linear_path(points);
        }
        match self.options.interpolation {
            Interpolation::Linear => linear_path(points),
            Interpolation::Smooth => smooth_path(points, self.options.tension),
            other => match other.step_position() {
                Some(position) => step_path(points, position),
                None => linear_path(points),
            },
        }
    }

    fn render_series(
        &mut self,
        index: usize,
        x_scale: &XScale,
        y_scale: LinearScale,
        animated: bool,
    ) -> SvgNode {
        let series = &self.series[index];
        let color = self.color_of(index);
        let mut runs = self.project_runs(series, x_scale, y_scale);

        let point_count = runs.iter().map(Vec::len).sum::<usize>();
        if point_count > self.options.max_points {
            let before = point_count;
            for run in &mut runs {
                let points: Vec<Point> = run.iter().map(|projected| projected.point).collect();
                let simplified = simplify_path(&points, self.options.simplify_tolerance);
                *run = retain_simplified(run, &simplified);
            }
            debug!(
                series = %series.id,
                before,
                after = runs.iter().map(Vec::len).sum::<usize>(),
                "simplified line series"
            );
        }

        let (domain_lo, domain_hi) = y_scale.domain();
        let baseline = y_scale.map(clamp(0.0, domain_lo, domain_hi));
        let animation = &self.options.base.animation;
        let mut node = group("nc-series").attr("data-series", &series.id);

        let mut line_d = Vec::with_capacity(runs.len());
        let mut area_d = Vec::new();
        for run in &runs {
            let points: Vec<Point> = run.iter().map(|projected| projected.point).collect();
            let d = self.run_path(&points);
            if self.options.fill_area && points.len() > 1 {
                area_d.push(close_to_baseline(&d, &points, baseline));
            }
            line_d.push(d);
        }

        if !area_d.is_empty() {
            let mut area = path(area_d.join(" "))
                .class("nc-area")
                .attr("fill", format!("url(#{})", self.core.def_id(&format!("area-{index}"))))
                .attr("stroke", "none");
            if animated {
                area = area.attr("opacity", "1").child(animate(
                    "opacity",
                    0,
                    1,
                    animation.duration,
                    0.0,
                    animation.easing,
                ));
            }
            node.push(area);
        }

        let mut line = path(line_d.join(" "))
            .class("nc-line")
            .attr("fill", "none")
            .attr("stroke", &color)
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
        node.push(line);

        if self.options.show_points {
            let radius = self.options.point_radius;
            let mut order = 0usize;
            let mut markers = group("nc-points");
            for projected in runs.iter().flatten() {
                let key = self.core.register_hit(HitTarget::Point {
                    series: index,
                    index: projected.index,
                });
                let mut marker = circle(projected.point.x, projected.point.y, radius)
                    .class("nc-point")
                    .key(key)
                    .attr("fill", CHROME.background)
                    .attr("stroke", &color)
                    .attr("stroke-width", 2)
                    .attr("cursor", "pointer");
                if animated {
                    let delay = animation.duration * 0.5 + order as f64 * animation.stagger;
                    marker = marker
                        .attr("opacity", "0")
                        .child(animate("opacity", 0, 1, animation.duration * 0.4, delay, animation.easing))
                        .child(animate("r", 0, radius, animation.duration * 0.4, delay, animation.easing));
                }
                markers.push(marker);
                order += 1;
            }
            node.push(markers);
        }
        node
    }

    fn point_tooltip(&self, series_index: usize, index: usize) -> Option<TooltipContent> {
        let series = self.series.get(series_index)?;
        let point = series.data.get(index)?;
        let color = point.color.clone().unwrap_or_else(|| self.color_of(series_index));
        if let Some(formatter) = &self.formatter {
            return Some(TooltipContent::plain(formatter(series, point), color));
        }
        let x_label = point.label.clone().unwrap_or_else(|| point.x.to_string());
        let y_label = point
            .value()
            .map_or_else(|| "n/a".to_owned(), |value| format_decimal(value, 2));
        Some(
            TooltipContent::new(color.clone())
                .title(series.name.clone())
                .row(TooltipRow::new(x_label, y_label).with_color(color)),
        )
    }

    fn toggle_series(&mut self, series: usize, input: PointerInput) {
        let Some(id) = self.series.get(series).map(|series| series.id.clone()) else {
            return;
        };
        let visible = if self.legend_hidden.shift_remove(&series) {
            true
        } else {
            self.legend_hidden.insert(series);
            false
        };
        let result = self.render();
        self.core.report("legend toggle", result);
        self.core.emit(
            ChartEventKind::LegendClick,
            input.target_key.clone(),
            EventData::Legend {
                series_id: id,
                visible,
            },
            Some(input),
        );
    }

    fn point_event(&self, series: usize, index: usize) -> Option<EventData> {
        let data = self.series.get(series)?;
        let point = data.data.get(index)?;
        Some(EventData::Point {
            series_id: data.id.clone(),
            series_name: data.name.clone(),
            index,
            point: point.clone(),
        })
    }
}

/// Keeps the projected samples whose points survived simplification. The
/// simplified list is an ordered subsequence of the input.
fn retain_simplified(run: &[Projected], simplified: &[Point]) -> Vec<Projected> {
    let mut kept = Vec::with_capacity(simplified.len());
    let mut remaining = simplified.iter().peekable();
    for projected in run {
        if remaining.peek().is_some_and(|point| **point == projected.point) {
            kept.push(*projected);
            remaining.next();
        }
    }
    kept
}

impl<H: Host> Chart for LineChart<H> {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    fn render(&mut self) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        self.core.clear_hits();
        let viewport = self.core.viewport();
        let animated = self.core.should_animate(&self.options.base.animation);

        let legend_series: Vec<usize> = (0..self.series.len())
            .filter(|index| self.series[*index].visible)
            .collect();
        let show_legend = legend_needed(&self.options.legend, legend_series.len());
        let mut padding = validate_padding("line", self.options.base.padding);
        if show_legend {
            padding = legend_padding(&self.options.legend, padding);
        }
        let plot = PlotArea::from_padding(viewport, padding);

        let y_scale = create_inverted_scale(self.y_domain(), (plot.y, plot.bottom()));
        let x_scale = self.x_scale(plot);

        let mut content = group("nc-content");
        let axes = group("nc-axes")
            .child(match &x_scale {
                XScale::Band(band) => band_axis(plot, band, AxisSide::Bottom, &self.options.x_axis),
                XScale::Linear { scale, format } => {
                    linear_axis(plot, *scale, AxisSide::Bottom, &self.options.x_axis, *format)
                }
            })
            .child(linear_axis(
                plot,
                y_scale,
                AxisSide::Left,
                &self.options.y_axis,
                TickFormat::Number,
            ));
        content.push(axes);

        let mut series_group = group("nc-series-group");
        for index in 0..self.series.len() {
            if self.is_drawn(index) {
                let node = self.render_series(index, &x_scale, y_scale, animated);
                series_group.push(node);
            }
        }
        content.push(series_group);

        if show_legend {
            let entries: Vec<LegendEntry> = legend_series
                .iter()
                .map(|index| LegendEntry {
                    series: *index,
                    name: self.series[*index].name.clone(),
                    color: self.color_of(*index),
                    visible: !self.legend_hidden.contains(index),
                })
                .collect();
            let legend = render_legend(&mut self.core, &entries, &self.options.legend, viewport);
            content.push(legend);
        }

        self.core.mount(&self.options.base, content);
        Ok(())
    }

    fn update(&mut self, data: ChartData) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        self.series = data.clone().into_series()?;
        self.options.data = data;
        self.legend_hidden.clear();
        self.rebuild_defs();
        self.render()
    }

    fn set_options(&mut self, patch: serde_json::Value) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        let next: LineOptions = apply_options_patch(&self.options, &patch)?;
        if patch.get("data").is_some() {
            self.series = next.data.clone().into_series()?;
            self.legend_hidden.clear();
        }
        self.options = next;
        self.core.configure(&mut self.options.base);
        self.rebuild_defs();
        self.render()
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

    fn handle_pointer(&mut self, input: PointerInput) {
        if self.core.is_destroyed() {
            return;
        }
        let Some(target) = self.core.hit(&input) else {
            if input.kind == PointerKind::Leave {
                self.core.hide_tooltip();
            }
            return;
        };

        match (target, input.kind) {
            (HitTarget::Point { series, index }, PointerKind::Enter | PointerKind::Move) => {
                if self.options.base.tooltip.enabled {
                    if let Some(content) = self.point_tooltip(series, index) {
                        self.core.show_tooltip(&content, input.client_x, input.client_y);
                    }
                }
                if input.kind == PointerKind::Enter {
                    if let Some(data) = self.point_event(series, index) {
                        self.core.emit(
                            ChartEventKind::PointHover,
                            input.target_key.clone(),
                            data,
                            Some(input),
                        );
                    }
                }
            }
            (HitTarget::Point { .. }, PointerKind::Leave) => self.core.hide_tooltip(),
            (HitTarget::Point { series, index }, PointerKind::Click) => {
                if let Some(data) = self.point_event(series, index) {
                    self.core.emit(
                        ChartEventKind::PointClick,
                        input.target_key.clone(),
                        data,
                        Some(input),
                    );
                }
            }
            (HitTarget::Legend { series }, PointerKind::Click) => self.toggle_series(series, input),
            _ => {}
        }
    }

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
