use std::cell::RefCell;
use std::rc::Rc;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::color::{CHROME, resolve_color};
use crate::core::path::coord;
use crate::core::primitives::format_decimal;
use crate::core::{DonutSegment, PlotArea, Point, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    ChartEventKind, EventData, EventHandler, PointerInput, PointerKind, SubscriptionId,
    TooltipContent, TooltipRow,
};
use crate::platform::{ContainerRef, FrameHandle, Host, NodePatch};
use crate::render::{SvgNode, TextAnchor, animate, donut_segment_path, group, path, rect, text, title};

use super::chart_core::{ChartCore, HitTarget};
use super::options::{DonutOptions, SegmentSort, apply_options_patch};
use super::validation::validate_padding;
use super::{Chart, ChartData, ChartKind};

/// Angular placement of one segment, in degrees clockwise from twelve
/// o'clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentArc {
    /// Index of the segment in the input data.
    pub index: usize,
    pub label: String,
    pub value: f64,
    pub percentage: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: String,
}

/// Donut (or pie, with a zero inner radius) of proportional wedges.
pub struct DonutChart<H: Host> {
    core: ChartCore<H>,
    options: DonutOptions,
    hovered: Option<usize>,
}

impl<H: Host> DonutChart<H> {
    pub fn new(
        host: Rc<RefCell<H>>,
        container: impl Into<ContainerRef>,
        options: DonutOptions,
    ) -> ChartResult<Self> {
        let core = ChartCore::new(host, container.into(), ChartKind::Donut, &options.base)?;
        let mut chart = Self {
            core,
            options,
            hovered: None,
        };
        chart.core.configure(&mut chart.options.base);
        chart.core.set_defs(chart.core.standard_defs(&chart.options.base));
        chart.render()?;
        Ok(chart)
    }

    #[must_use]
    pub fn options(&self) -> &DonutOptions {
        &self.options
    }

    #[must_use]
    pub fn segments(&self) -> &[DonutSegment] {
        &self.options.data
    }

    /// Sum of the positive segment values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.options
            .data
            .iter()
            .map(|segment| segment.value)
            .filter(|value| value.is_finite() && *value > 0.0)
            .sum()
    }

    /// Wedge angles in drawing order. Non-positive values take no space and
    /// an all-zero input lays out nothing.
    #[must_use]
    pub fn layout(&self) -> Vec<SegmentArc> {
        let total = self.total();
        if total <= 0.0 {
            return Vec::new();
        }
        let mut order: Vec<usize> = (0..self.options.data.len())
            .filter(|index| {
                let value = self.options.data[*index].value;
                value.is_finite() && value > 0.0
            })
            .collect();
        match self.options.sort {
            SegmentSort::None => {}
            SegmentSort::Asc => {
                order.sort_by_key(|index| OrderedFloat(self.options.data[*index].value));
            }
            SegmentSort::Desc => {
                order.sort_by_key(|index| std::cmp::Reverse(OrderedFloat(self.options.data[*index].value)));
            }
        }

        let pad = if order.len() > 1 {
            self.options.pad_angle.max(0.0)
        } else {
            0.0
        };
        let mut cursor = 0.0;
        order
            .into_iter()
            .map(|index| {
                let segment = &self.options.data[index];
                let sweep = segment.value / total * 360.0;
                let inset = if sweep > pad { pad / 2.0 } else { 0.0 };
                let arc = SegmentArc {
                    index,
                    label: segment.label.clone(),
                    value: segment.value,
                    percentage: segment.value / total * 100.0,
                    start_angle: cursor + inset,
                    end_angle: cursor + sweep - inset,
                    color: resolve_color(segment.color.as_deref(), segment.theme, index),
                };
                cursor += sweep;
                arc
            })
            .collect()
    }

    pub fn set_typed_options(&mut self, options: DonutOptions) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        self.options = options;
        self.core.configure(&mut self.options.base);
        self.core.set_defs(self.core.standard_defs(&self.options.base));
        self.render()
    }

    fn geometry(&self) -> (Point, f64) {
        let mut padding = validate_padding("donut", self.options.base.padding);
        if self.options.show_legend {
            padding.right += self.options.legend_width.max(0.0);
        }
        let plot = PlotArea::from_padding(self.core.viewport(), padding);
        let center = Point::new(plot.x + plot.width / 2.0, plot.y + plot.height / 2.0);
        (center, (plot.width.min(plot.height) / 2.0).max(0.0))
    }

    fn hover_transform(center: Point, scale: f64) -> String {
        format!(
            "translate({} {}) scale({}) translate({} {})",
            coord(center.x),
            coord(center.y),
            coord(scale),
            coord(-center.x),
            coord(-center.y)
        )
    }

    /// Center text and subtext, drawn only inside a hole and only when
    /// supplied.
    fn center_labels(&self, center: Point, inner: f64) -> Option<SvgNode> {
        if self.options.inner_radius <= 0.0
            || (self.options.center_text.is_none() && self.options.center_subtext.is_none())
        {
            return None;
        }
        let mut node = group("nc-donut-center");
        if let Some(primary) = &self.options.center_text {
            node.push(
                text(center.x, center.y, primary, TextAnchor::Middle)
                    .class("nc-donut-center-text")
                    .attr("fill", CHROME.text)
                    .attr("font-size", coord((inner * 0.4).clamp(10.0, 32.0)))
                    .attr("dominant-baseline", "middle"),
            );
        }
        if let Some(subtext) = &self.options.center_subtext {
            node.push(
                text(center.x, center.y + inner * 0.35, subtext, TextAnchor::Middle)
                    .class("nc-donut-center-subtext")
                    .attr("fill", CHROME.text_muted)
                    .attr("font-size", "11"),
            );
        }
        Some(node)
    }

    fn legend(&self, arcs: &[SegmentArc], viewport: Viewport) -> SvgNode {
        let x = viewport.width - self.options.legend_width.max(0.0) + 8.0;
        let top = (viewport.height - arcs.len() as f64 * 18.0).max(0.0) / 2.0;
        let mut legend = group("nc-legend");
        for (row, arc) in arcs.iter().enumerate() {
            let y = top + row as f64 * 18.0;
            let label = format!("{} ({}%)", arc.label, format_decimal(arc.percentage, 1));
            legend.push(
                group("nc-legend-item")
                    .child(title(label.clone()))
                    .child(rect(x, y, 10.0, 10.0).attr("fill", &arc.color).attr("rx", "2"))
                    .child(
                        text(x + 14.0, y + 9.0, label, TextAnchor::Start)
                            .attr("fill", CHROME.text)
                            .attr("font-size", "11"),
                    ),
            );
        }
        legend
    }

    fn arc_for(&self, index: usize) -> Option<SegmentArc> {
        self.layout().into_iter().find(|arc| arc.index == index)
    }

    fn set_hover(&mut self, index: Option<usize>) {
        if self.hovered == index {
            return;
        }
        let (center, _) = self.geometry();
        if let Some(previous) = self.hovered.take() {
            self.core.patch(
                &NodePatch::new(format!("segment-{previous}"))
                    .attr("transform", Self::hover_transform(center, 1.0)),
            );
        }
        if let Some(current) = index {
            self.core.patch(
                &NodePatch::new(format!("segment-{current}"))
                    .attr("transform", Self::hover_transform(center, self.options.hover_scale)),
            );
        }
        self.hovered = index;
    }

    fn segment_event(arc: &SegmentArc) -> EventData {
        EventData::Segment {
            index: arc.index,
            label: arc.label.clone(),
            value: arc.value,
            percentage: arc.percentage,
        }
    }
}

impl<H: Host> Chart for DonutChart<H> {
    fn kind(&self) -> ChartKind {
        ChartKind::Donut
    }

    fn render(&mut self) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        self.core.clear_hits();
        self.hovered = None;
        let viewport = self.core.viewport();
        let animated = self.core.should_animate(&self.options.base.animation);
        let animation = self.options.base.animation.clone();
        let (center, outer) = self.geometry();
        let inner = outer * self.options.inner_radius.clamp(0.0, 0.95);
        let arcs = self.layout();

        let mut content = group("nc-content");
        let mut wedges = group("nc-segments");
        for (order, arc) in arcs.iter().enumerate() {
            let key = self.core.register_hit(HitTarget::Segment { index: arc.index });
            let mut wedge = path(donut_segment_path(
                center.x,
                center.y,
                outer,
                inner,
                arc.start_angle,
                arc.end_angle,
            ))
            .class("nc-segment")
            .key(key)
            .attr("fill", &arc.color)
            .attr("stroke", CHROME.background)
            .attr("stroke-width", 1)
            .attr("cursor", "pointer")
            .attr("transform", Self::hover_transform(center, 1.0))
            .attr_opt("filter", self.core.glow_ref(&self.options.base))
            .child(title(format!(
                "{}: {}",
                arc.label,
                format_decimal(arc.value, 2)
            )));
            if animated {
                wedge = wedge.attr("opacity", "0").child(animate(
                    "opacity",
                    0,
                    1,
                    animation.duration,
                    order as f64 * animation.stagger,
                    animation.easing,
                ));
            }
            wedges.push(wedge);
        }
        content.push(wedges);

        if let Some(labels) = self.center_labels(center, inner) {
            content.push(labels);
        }
        if self.options.show_legend && !arcs.is_empty() {
            content.push(self.legend(&arcs, viewport));
        }

        self.core.mount(&self.options.base, content);
        Ok(())
    }

    fn update(&mut self, data: ChartData) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        match data {
            ChartData::Segments(segments) => {
                self.options.data = segments;
                self.render()
            }
            // an empty JSON array deserializes as the first untagged variant
            ChartData::Series(series) if series.is_empty() => {
                self.options.data.clear();
                self.render()
            }
            other => Err(ChartError::InvalidData(format!(
                "donut expects segments, got {}",
                other.variant_name()
            ))),
        }
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
        self.hovered = None;
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
        let Some(HitTarget::Segment { index }) = self.core.hit(&input) else {
            if input.kind == PointerKind::Leave {
                self.set_hover(None);
                self.core.hide_tooltip();
            }
            return;
        };
        let Some(arc) = self.arc_for(index) else {
            return;
        };

        match input.kind {
            PointerKind::Enter | PointerKind::Move => {
                self.set_hover(Some(index));
                if self.options.base.tooltip.enabled {
                    let content = TooltipContent::new(arc.color.clone())
                        .title(arc.label.clone())
                        .row(TooltipRow::new("Value", format_decimal(arc.value, 2)))
                        .row(TooltipRow::new(
                            "Share",
                            format!("{}%", format_decimal(arc.percentage, 1)),
                        ));
                    self.core.show_tooltip(&content, input.client_x, input.client_y);
                }
                if input.kind == PointerKind::Enter {
                    self.core.emit(
                        ChartEventKind::SegmentHover,
                        input.target_key.clone(),
                        Self::segment_event(&arc),
                        Some(input),
                    );
                }
            }
            PointerKind::Leave => {
                self.set_hover(None);
                self.core.hide_tooltip();
            }
            PointerKind::Click => {
                self.core.emit(
                    ChartEventKind::SegmentClick,
                    input.target_key.clone(),
                    Self::segment_event(&arc),
                    Some(input),
                );
            }
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
