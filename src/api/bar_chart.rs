use std::cell::RefCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};

use crate::color::CHROME;
use crate::core::path::coord;
use crate::core::primitives::format_decimal;
use crate::core::{
    BandScale, DataSeries, LinearScale, PlotArea, Viewport, clamp, create_band_scale,
    create_inverted_scale, create_linear_scale, nice_extent,
};
use crate::error::ChartResult;
use crate::interaction::{
    ChartEventKind, EventData, EventHandler, PointerInput, PointerKind, SubscriptionId,
    TooltipContent, TooltipRow,
};
use crate::platform::{ContainerRef, FrameHandle, Host};
use crate::render::{SvgNode, TextAnchor, animate, group, rect, text};

use super::axis::{AxisSide, TickFormat, band_axis, linear_axis};
use super::chart_core::{ChartCore, HitTarget, series_accent};
use super::legend::{LegendEntry, legend_needed, legend_padding, render_legend};
use super::line_chart::PointFormatter;
use super::options::{AxisConfig, BarOptions, GroupMode, Orientation, apply_options_patch};
use super::validation::validate_padding;
use super::{Chart, ChartData, ChartKind};

/// Pixel rectangle of one bar plus the baseline it grows from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BarRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    /// Baseline coordinate on the value axis.
    origin: f64,
}

/// Vertical or horizontal bar chart with grouped or stacked series.
pub struct BarChart<H: Host> {
    core: ChartCore<H>,
    options: BarOptions,
    series: Vec<DataSeries>,
    legend_hidden: IndexSet<usize>,
    formatter: Option<PointFormatter>,
}

impl<H: Host> BarChart<H> {
    pub fn new(
        host: Rc<RefCell<H>>,
        container: impl Into<ContainerRef>,
        options: BarOptions,
    ) -> ChartResult<Self> {
        let core = ChartCore::new(host, container.into(), ChartKind::Bar, &options.base)?;
        let series = options.data.clone().into_series()?;
        let mut chart = Self {
            core,
            options,
            series,
            legend_hidden: IndexSet::new(),
            formatter: None,
        };
        chart.core.configure(&mut chart.options.base);
        chart.core.set_defs(chart.core.standard_defs(&chart.options.base));
        chart.render()?;
        Ok(chart)
    }

    #[must_use]
    pub fn options(&self) -> &BarOptions {
        &self.options
    }

    #[must_use]
    pub fn series(&self) -> &[DataSeries] {
        &self.series
    }

    pub fn set_tooltip_formatter(&mut self, formatter: PointFormatter) {
        self.formatter = Some(formatter);
    }

    pub fn set_typed_options(&mut self, options: BarOptions) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        self.series = options.data.clone().into_series()?;
        self.options = options;
        self.legend_hidden.clear();
        self.core.configure(&mut self.options.base);
        self.core.set_defs(self.core.standard_defs(&self.options.base));
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

    fn drawn(&self) -> Vec<usize> {
        (0..self.series.len())
            .filter(|index| self.series[*index].visible && !self.legend_hidden.contains(index))
            .collect()
    }

    fn categories(&self, drawn: &[usize]) -> Vec<String> {
        let mut categories = IndexSet::new();
        for index in drawn {
            for point in &self.series[*index].data {
                categories.insert(point.x.category_key());
            }
        }
        categories.into_iter().collect()
    }

    /// Value domain, always containing zero. Stacked mode sums positive and
    /// negative values per category separately.
    fn value_domain(&self, drawn: &[usize]) -> (f64, f64) {
        let (mut lo, mut hi) = (0.0_f64, 0.0_f64);
        match self.options.group_mode {
            GroupMode::Grouped => {
                for index in drawn {
                    for value in self.series[*index].data.iter().filter_map(|point| point.value()) {
                        lo = lo.min(value);
                        hi = hi.max(value);
                    }
                }
            }
            GroupMode::Stacked => {
                let mut sums: IndexMap<String, (f64, f64)> = IndexMap::new();
                for index in drawn {
                    for point in &self.series[*index].data {
                        let Some(value) = point.value() else {
                            continue;
                        };
                        let entry = sums.entry(point.x.category_key()).or_default();
                        if value >= 0.0 {
                            entry.1 += value;
                        } else {
                            entry.0 += value;
                        }
                    }
                }
                for (negative, positive) in sums.values() {
                    lo = lo.min(*negative);
                    hi = hi.max(*positive);
                }
            }
        }
        nice_extent(lo, hi, self.options.axis.tick_count)
    }

    fn bar_rect(
        &self,
        band_start: f64,
        thickness: f64,
        base: f64,
        value: f64,
        value_scale: LinearScale,
    ) -> BarRect {
        let from = value_scale.map(base);
        let to = value_scale.map(base + value);
        let (lo, hi) = (from.min(to), from.max(to));
        match self.options.orientation {
            Orientation::Vertical => BarRect {
                x: band_start,
                y: lo,
                width: thickness,
                height: hi - lo,
                origin: from,
            },
            Orientation::Horizontal => BarRect {
                x: lo,
                y: band_start,
                width: hi - lo,
                height: thickness,
                origin: from,
            },
        }
    }

    fn bar_node(
        &self,
        geometry: BarRect,
        color: &str,
        key: String,
        order: usize,
        animated: bool,
    ) -> SvgNode {
        let animation = &self.options.base.animation;
        let mut bar = rect(geometry.x, geometry.y, geometry.width, geometry.height)
            .class("nc-bar")
            .key(key)
            .attr("fill", color)
            .attr("fill-opacity", "0.85")
            .attr("stroke", color)
            .attr("rx", self.options.border_radius)
            .attr("cursor", "pointer")
            .attr_opt("filter", self.core.glow_ref(&self.options.base));

        if animated {
            let delay = order as f64 * animation.stagger;
            let (size_attr, position_attr, size, position) = match self.options.orientation {
                Orientation::Vertical => ("height", "y", geometry.height, geometry.y),
                Orientation::Horizontal => ("width", "x", geometry.width, geometry.x),
            };
            bar = bar
                .child(animate(size_attr, 0, coord(size), animation.duration, delay, animation.easing))
                .child(animate(
                    position_attr,
                    coord(geometry.origin),
                    coord(position),
                    animation.duration,
                    delay,
                    animation.easing,
                ));
        }
        bar
    }

    fn value_label(&self, geometry: BarRect, value: f64, animated: bool) -> SvgNode {
        let precision = self.options.value_precision.unwrap_or(2);
        let content = format_decimal(value, precision);
        let (x, y, anchor) = match self.options.orientation {
            Orientation::Vertical => {
                let y = if value >= 0.0 {
                    geometry.y - 4.0
                } else {
                    geometry.y + geometry.height + 12.0
                };
                (geometry.x + geometry.width / 2.0, y, TextAnchor::Middle)
            }
            Orientation::Horizontal => {
                if value >= 0.0 {
                    let middle = geometry.y + geometry.height / 2.0;
                    (geometry.x + geometry.width + 4.0, middle, TextAnchor::Start)
                } else {
                    (geometry.x - 4.0, geometry.y + geometry.height / 2.0, TextAnchor::End)
                }
            }
        };
        let mut label = text(x, y, content, anchor)
            .class("nc-bar-value")
            .attr("fill", CHROME.text)
            .attr("font-size", "10")
            .attr("dominant-baseline", "middle");
        if animated {
            let animation = &self.options.base.animation;
            label = label.attr("opacity", "0").child(animate(
                "opacity",
                0,
                1,
                animation.duration * 0.4,
                animation.duration,
                animation.easing,
            ));
        }
        label
    }

    fn render_bars(
        &mut self,
        drawn: &[usize],
        band: &BandScale,
        value_scale: LinearScale,
        animated: bool,
    ) -> SvgNode {
        let mut bars = group("nc-bars");
        let slot_count = drawn.len().max(1) as f64;
        let gap = clamp(self.options.bar_gap, 0.0, 1.0);
        let grouped_width = band.bandwidth() * (1.0 - gap) / slot_count;
        let mut stacks: IndexMap<usize, (f64, f64)> = IndexMap::new();
        let mut order = 0usize;

        for (slot, series_index) in drawn.iter().copied().enumerate() {
            let color = self.color_of(series_index);
            let mut series_group = group("nc-series").attr("data-series", &self.series[series_index].id);
            let mut labels = Vec::new();
            for point_index in 0..self.series[series_index].data.len() {
                let point = &self.series[series_index].data[point_index];
                let Some(value) = point.value() else {
                    continue;
                };
                let Some(category) = band.index_of(&point.x.category_key()) else {
                    continue;
                };
                let bar_color = point.color.clone().unwrap_or_else(|| color.clone());
                let geometry = match self.options.group_mode {
                    GroupMode::Grouped => {
                        let start = band.position_at(category)
                            + band.bandwidth() * gap / 2.0
                            + slot as f64 * grouped_width;
                        self.bar_rect(start, grouped_width, 0.0, value, value_scale)
                    }
                    GroupMode::Stacked => {
                        let stack = stacks.entry(category).or_default();
                        let base = if value >= 0.0 { stack.1 } else { stack.0 };
                        if value >= 0.0 {
                            stack.1 += value;
                        } else {
                            stack.0 += value;
                        }
                        self.bar_rect(band.position_at(category), band.bandwidth(), base, value, value_scale)
                    }
                };

                let key = self.core.register_hit(HitTarget::Bar {
                    series: series_index,
                    index: point_index,
                });
                series_group.push(self.bar_node(geometry, &bar_color, key, order, animated));
                if self.options.show_values {
                    labels.push(self.value_label(geometry, value, animated));
                }
                order += 1;
            }
            series_group.children.extend(labels);
            bars.push(series_group);
        }
        bars
    }

    fn bar_event(&self, series: usize, index: usize) -> Option<EventData> {
        let data = self.series.get(series)?;
        let point = data.data.get(index)?;
        Some(EventData::Bar {
            series_id: data.id.clone(),
            series_name: data.name.clone(),
            index,
            category: point.x.category_key(),
            value: point.value().unwrap_or(0.0),
        })
    }

    fn bar_tooltip(&self, series_index: usize, index: usize) -> Option<TooltipContent> {
        let series = self.series.get(series_index)?;
        let point = series.data.get(index)?;
        let color = point.color.clone().unwrap_or_else(|| self.color_of(series_index));
        if let Some(formatter) = &self.formatter {
            return Some(TooltipContent::plain(formatter(series, point), color));
        }
        let precision = self.options.value_precision.unwrap_or(2);
        Some(
            TooltipContent::new(color.clone())
                .title(point.label.clone().unwrap_or_else(|| point.x.category_key()))
                .row(
                    TooltipRow::new(
                        series.name.clone(),
                        format_decimal(point.value().unwrap_or(0.0), precision),
                    )
                    .with_color(color),
                ),
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
}

impl<H: Host> Chart for BarChart<H> {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn render(&mut self) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        self.core.clear_hits();
        let viewport = self.core.viewport();
        let animated = self.core.should_animate(&self.options.base.animation);
        let drawn = self.drawn();

        let legend_series: Vec<usize> = (0..self.series.len())
            .filter(|index| self.series[*index].visible)
            .collect();
        let show_legend = legend_needed(&self.options.legend, legend_series.len());
        let mut padding = validate_padding("bar", self.options.base.padding);
        if show_legend {
            padding = legend_padding(&self.options.legend, padding);
        }
        let plot = PlotArea::from_padding(viewport, padding);

        let categories = self.categories(&drawn);
        let domain = self.value_domain(&drawn);
        let (band, value_scale, category_side, value_side) = match self.options.orientation {
            Orientation::Vertical => (
                create_band_scale(&categories, plot.x, plot.right(), self.options.bar_padding),
                create_inverted_scale(domain, (plot.y, plot.bottom())),
                AxisSide::Bottom,
                AxisSide::Left,
            ),
            Orientation::Horizontal => (
                create_band_scale(&categories, plot.y, plot.bottom(), self.options.bar_padding),
                create_linear_scale(domain, (plot.x, plot.right())),
                AxisSide::Left,
                AxisSide::Bottom,
            ),
        };

        let category_axis = AxisConfig {
            show_grid: false,
            ..self.options.axis.clone()
        };
        let mut content = group("nc-content");
        content.push(
            group("nc-axes")
                .child(linear_axis(
                    plot,
                    value_scale,
                    value_side,
                    &self.options.axis,
                    TickFormat::Number,
                ))
                .child(band_axis(plot, &band, category_side, &category_axis)),
        );
        content.push(self.render_bars(&drawn, &band, value_scale, animated));

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
        self.render()
    }

    fn set_options(&mut self, patch: serde_json::Value) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        let next: BarOptions = apply_options_patch(&self.options, &patch)?;
        if patch.get("data").is_some() {
            self.series = next.data.clone().into_series()?;
            self.legend_hidden.clear();
        }
        self.options = next;
        self.core.configure(&mut self.options.base);
        self.core.set_defs(self.core.standard_defs(&self.options.base));
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
            (HitTarget::Bar { series, index }, PointerKind::Enter | PointerKind::Move) => {
                if self.options.base.tooltip.enabled {
                    if let Some(content) = self.bar_tooltip(series, index) {
                        self.core.show_tooltip(&content, input.client_x, input.client_y);
                    }
                }
                if input.kind == PointerKind::Enter {
                    if let Some(data) = self.bar_event(series, index) {
                        self.core.emit(
                            ChartEventKind::BarHover,
                            input.target_key.clone(),
                            data,
                            Some(input),
                        );
                    }
                }
            }
            (HitTarget::Bar { .. }, PointerKind::Leave) => self.core.hide_tooltip(),
            (HitTarget::Bar { series, index }, PointerKind::Click) => {
                if let Some(data) = self.bar_event(series, index) {
                    self.core.emit(
                        ChartEventKind::BarClick,
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
