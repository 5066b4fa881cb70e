use std::cell::RefCell;
use std::rc::Rc;

use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::color::CHROME;
use crate::core::path::coord;
use crate::core::primitives::format_decimal;
use crate::core::{GaugeThreshold, Point, Viewport, clamp, lerp};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ChartEventKind, EventHandler, PointerInput, SubscriptionId};
use crate::platform::{ContainerRef, FrameHandle, Host, NodePatch};
use crate::render::{
    SvgNode, TextAnchor, arc_path, circle, group, line, path, polar_to_cartesian, text,
};

use super::chart_core::ChartCore;
use super::options::{GaugeOptions, apply_options_patch};
use super::validation::{validate_bounds, validate_padding};
use super::{Chart, ChartData, ChartKind};

const VALUE_ARC_KEY: &str = "gauge-value-arc";
const INDICATOR_KEY: &str = "gauge-indicator";
const VALUE_TEXT_KEY: &str = "gauge-value-text";

/// In-flight value transition. `started_at` is set by the first frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ValueAnimation {
    from: f64,
    to: f64,
    started_at: Option<f64>,
}

/// Geometry shared by the static and dynamic parts of the gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GaugeGeometry {
    center: Point,
    radius: f64,
    min: f64,
    max: f64,
    start_angle: f64,
    end_angle: f64,
}

impl GaugeGeometry {
    fn angle_for(self, value: f64) -> f64 {
        let ratio = (clamp(value, self.min, self.max) - self.min) / (self.max - self.min);
        lerp(self.start_angle, self.end_angle, ratio)
    }
}

/// Radial gauge whose value changes animate frame by frame.
///
/// Full renders rebuild the track, ticks, threshold zones and labels. Value
/// frames only patch the three dynamic nodes (value arc, indicator and
/// value text) in the mounted scene.
pub struct GaugeChart<H: Host> {
    core: ChartCore<H>,
    options: GaugeOptions,
    current: f64,
    animation: Option<ValueAnimation>,
}

impl<H: Host> GaugeChart<H> {
    pub fn new(
        host: Rc<RefCell<H>>,
        container: impl Into<ContainerRef>,
        mut options: GaugeOptions,
    ) -> ChartResult<Self> {
        let core = ChartCore::new(host, container.into(), ChartKind::Gauge, &options.base)?;
        (options.min, options.max) = validate_bounds("gauge", options.min, options.max);
        if !options.value.is_finite() {
            warn!(
                chart = "gauge",
                value = options.value,
                min = options.min,
                "non-finite gauge value, using min"
            );
            options.value = options.min;
        }
        let current = options.min;
        let mut chart = Self {
            core,
            options,
            current,
            animation: None,
        };
        chart.core.configure(&mut chart.options.base);
        chart.core.set_defs(chart.core.standard_defs(&chart.options.base));
        chart.render()?;
        chart.animate_to(chart.options.value);
        Ok(chart)
    }

    #[must_use]
    pub fn options(&self) -> &GaugeOptions {
        &self.options
    }

    /// Target reading.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.options.value
    }

    /// Reading currently displayed, which trails the target while animating.
    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.current
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Color of the arc and indicator for the displayed reading.
    #[must_use]
    pub fn active_color(&self) -> String {
        self.color_for(self.current)
    }

    /// Sets a new target reading and animates toward it.
    pub fn set_value(&mut self, value: f64) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        if !value.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "gauge value must be finite, got {value}"
            )));
        }
        self.options.value = value;
        self.animate_to(value);
        Ok(())
    }

    /// Replaces all options. When only `value` differs the static layer is
    /// kept and the dynamic nodes animate in place.
    pub fn set_typed_options(&mut self, mut options: GaugeOptions) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        if !options.value.is_finite() {
            return Err(ChartError::InvalidOptions(format!(
                "gauge value must be finite, got {}",
                options.value
            )));
        }
        (options.min, options.max) = validate_bounds("gauge", options.min, options.max);
        let mut static_probe = options.clone();
        static_probe.value = self.options.value;
        let value_only = static_probe == self.options;
        let target = options.value;
        self.options = options;

        if !value_only {
            self.core.configure(&mut self.options.base);
            self.core.set_defs(self.core.standard_defs(&self.options.base));
            self.render()?;
        }
        self.animate_to(target);
        Ok(())
    }

    /// The active color is the last threshold, by ascending value, that the
    /// reading has reached; below every threshold it is the theme color.
    fn color_for(&self, value: f64) -> String {
        let mut thresholds: Vec<&GaugeThreshold> = self.options.thresholds.iter().collect();
        thresholds.sort_by_key(|threshold| OrderedFloat(threshold.value));
        thresholds
            .iter()
            .rev()
            .find(|threshold| value >= threshold.value)
            .map_or_else(
                || self.options.base.theme.primary().to_owned(),
                |threshold| threshold_color(threshold, self.options.base.theme.primary()),
            )
    }

    fn geometry(&self) -> GaugeGeometry {
        let viewport = self.core.viewport();
        let padding = validate_padding("gauge", self.options.base.padding);
        let (min, max) = validate_bounds("gauge", self.options.min, self.options.max);
        let width = (viewport.width - padding.left - padding.right).max(0.0);
        let height = (viewport.height - padding.top - padding.bottom).max(0.0);
        let radius = (width.min(height) / 2.0 - self.options.thickness / 2.0).max(0.0);
        GaugeGeometry {
            center: Point::new(padding.left + width / 2.0, padding.top + height / 2.0),
            radius,
            min,
            max,
            start_angle: self.options.start_angle,
            end_angle: self.options.end_angle,
        }
    }

    fn value_text(&self, value: f64) -> String {
        format!(
            "{}{}",
            format_decimal(value, self.options.value_precision),
            self.options.unit
        )
    }

    fn static_layer(&self, geometry: GaugeGeometry) -> SvgNode {
        let GaugeGeometry { center, radius, .. } = geometry;
        let mut layer = group("nc-gauge-static");
        layer.push(
            path(arc_path(center.x, center.y, radius, geometry.start_angle, geometry.end_angle))
                .class("nc-gauge-track")
                .attr("fill", "none")
                .attr("stroke", CHROME.track)
                .attr("stroke-width", self.options.thickness)
                .attr("stroke-linecap", "round"),
        );

        let mut thresholds: Vec<&GaugeThreshold> = self.options.thresholds.iter().collect();
        thresholds.sort_by_key(|threshold| OrderedFloat(threshold.value));
        let zone_radius = radius + self.options.thickness / 2.0 + 3.0;
        for (index, threshold) in thresholds.iter().enumerate() {
            let end = thresholds
                .get(index + 1)
                .map_or(geometry.max, |next| next.value);
            let d = arc_path(
                center.x,
                center.y,
                zone_radius,
                geometry.angle_for(threshold.value),
                geometry.angle_for(end),
            );
            if d.is_empty() {
                continue;
            }
            layer.push(
                path(d)
                    .class("nc-gauge-zone")
                    .attr("fill", "none")
                    .attr("stroke", threshold_color(threshold, self.options.base.theme.primary()))
                    .attr("stroke-width", 3)
                    .attr("stroke-opacity", "0.6"),
            );
        }

        if self.options.show_ticks && self.options.tick_count > 0 {
            let inner = radius - self.options.thickness / 2.0 - 4.0;
            for tick in 0..=self.options.tick_count {
                let ratio = tick as f64 / self.options.tick_count as f64;
                let value = lerp(geometry.min, geometry.max, ratio);
                let angle = geometry.angle_for(value);
                let major = tick % 5 == 0;
                let length = if major { 8.0 } else { 4.0 };
                let from = polar_to_cartesian(center.x, center.y, inner, angle);
                let to = polar_to_cartesian(center.x, center.y, inner - length, angle);
                layer.push(
                    line(from.x, from.y, to.x, to.y)
                        .class("nc-gauge-tick")
                        .attr("stroke", CHROME.text_muted)
                        .attr("stroke-width", if major { 2 } else { 1 }),
                );
                if major {
                    let anchor = polar_to_cartesian(center.x, center.y, inner - length - 8.0, angle);
                    layer.push(
                        text(anchor.x, anchor.y, format_decimal(value, 0), TextAnchor::Middle)
                            .class("nc-gauge-tick-label")
                            .attr("fill", CHROME.text_muted)
                            .attr("font-size", "8")
                            .attr("dominant-baseline", "middle"),
                    );
                }
            }
        }

        let min_point = polar_to_cartesian(center.x, center.y, radius, geometry.start_angle);
        let max_point = polar_to_cartesian(center.x, center.y, radius, geometry.end_angle);
        layer.push(
            text(min_point.x, min_point.y + 18.0, format_decimal(geometry.min, 0), TextAnchor::Middle)
                .class("nc-gauge-min")
                .attr("fill", CHROME.text_muted)
                .attr("font-size", "10"),
        );
        layer.push(
            text(max_point.x, max_point.y + 18.0, format_decimal(geometry.max, 0), TextAnchor::Middle)
                .class("nc-gauge-max")
                .attr("fill", CHROME.text_muted)
                .attr("font-size", "10"),
        );
        if let Some(label) = &self.options.label {
            layer.push(
                text(center.x, center.y + radius * 0.45, label, TextAnchor::Middle)
                    .class("nc-gauge-label")
                    .attr("fill", CHROME.text)
                    .attr("font-size", "12"),
            );
        }
        layer
    }

    fn dynamic_layer(&self, geometry: GaugeGeometry, value: f64) -> SvgNode {
        let color = self.color_for(value);
        let angle = geometry.angle_for(value);
        let tip = polar_to_cartesian(geometry.center.x, geometry.center.y, geometry.radius, angle);
        let mut layer = group("nc-gauge-dynamic")
            .child(
                path(arc_path(
                    geometry.center.x,
                    geometry.center.y,
                    geometry.radius,
                    geometry.start_angle,
                    angle,
                ))
                .class("nc-gauge-value")
                .key(VALUE_ARC_KEY)
                .attr("fill", "none")
                .attr("stroke", &color)
                .attr("stroke-width", self.options.thickness)
                .attr("stroke-linecap", "round")
                .attr_opt("filter", self.core.glow_ref(&self.options.base)),
            )
            .child(
                circle(tip.x, tip.y, self.options.thickness / 2.0 + 2.0)
                    .class("nc-gauge-indicator")
                    .key(INDICATOR_KEY)
                    .attr("fill", &color)
                    .attr("stroke", CHROME.background)
                    .attr("stroke-width", 2),
            );
        if self.options.show_value {
            layer.push(
                text(geometry.center.x, geometry.center.y, self.value_text(value), TextAnchor::Middle)
                    .class("nc-gauge-value-text")
                    .key(VALUE_TEXT_KEY)
                    .attr("fill", &color)
                    .attr("font-size", coord(geometry.radius * 0.4))
                    .attr("dominant-baseline", "middle"),
            );
        }
        layer
    }

    /// Patches the mounted dynamic nodes for `value`.
    fn patch_dynamic(&mut self, value: f64) {
        let geometry = self.geometry();
        let color = self.color_for(value);
        let angle = geometry.angle_for(value);
        let tip = polar_to_cartesian(geometry.center.x, geometry.center.y, geometry.radius, angle);
        let arc = arc_path(
            geometry.center.x,
            geometry.center.y,
            geometry.radius,
            geometry.start_angle,
            angle,
        );
        self.core.patch(
            &NodePatch::new(VALUE_ARC_KEY)
                .attr("d", arc)
                .attr("stroke", &color),
        );
        self.core.patch(
            &NodePatch::new(INDICATOR_KEY)
                .attr("cx", coord(tip.x))
                .attr("cy", coord(tip.y))
                .attr("fill", &color),
        );
        if self.options.show_value {
            let content = self.value_text(value);
            self.core.patch(
                &NodePatch::new(VALUE_TEXT_KEY)
                    .attr("fill", &color)
                    .text(content),
            );
        }
    }

    /// Starts a frame-driven transition from the displayed reading, or snaps
    /// when animation is off.
    fn animate_to(&mut self, target: f64) {
        if self.core.should_animate(&self.options.base.animation) && target != self.current {
            self.animation = Some(ValueAnimation {
                from: self.current,
                to: target,
                started_at: None,
            });
            self.core.request_frame();
        } else {
            self.core.cancel_animation();
            self.animation = None;
            self.current = target;
            self.patch_dynamic(target);
        }
    }

    fn step_animation(&mut self, now_ms: f64) {
        let Some(mut animation) = self.animation else {
            return;
        };
        let started_at = *animation.started_at.get_or_insert(now_ms);
        let duration = self.options.base.animation.duration.max(1.0);
        let progress = ((now_ms - started_at) / duration).clamp(0.0, 1.0);
        let eased = self.options.base.animation.easing.apply(progress);
        self.current = lerp(animation.from, animation.to, eased);

        if progress >= 1.0 {
            self.current = animation.to;
            self.animation = None;
            debug!(value = self.current, "gauge animation complete");
        } else {
            self.animation = Some(animation);
            self.core.request_frame();
        }
        self.patch_dynamic(self.current);
    }
}

fn threshold_color(threshold: &GaugeThreshold, fallback: &str) -> String {
    match (&threshold.color, threshold.theme) {
        (Some(color), _) => color.clone(),
        (None, Some(theme)) => theme.primary().to_owned(),
        (None, None) => fallback.to_owned(),
    }
}

impl<H: Host> Chart for GaugeChart<H> {
    fn kind(&self) -> ChartKind {
        ChartKind::Gauge
    }

    fn render(&mut self) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        let geometry = self.geometry();
        let content = group("nc-content")
            .child(self.static_layer(geometry))
            .child(self.dynamic_layer(geometry, self.current));
        self.core.mount(&self.options.base, content);
        Ok(())
    }

    fn update(&mut self, data: ChartData) -> ChartResult<()> {
        match data {
            ChartData::Value(value) => self.set_value(value),
            other => Err(ChartError::InvalidData(format!(
                "gauge expects a single value, got {}",
                other.variant_name()
            ))),
        }
    }

    fn set_options(&mut self, patch: serde_json::Value) -> ChartResult<()> {
        if self.core.is_destroyed() {
            return Ok(());
        }
        let next: GaugeOptions = apply_options_patch(&self.options, &patch)?;
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
        self.animation = None;
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

    fn animation_frame(&mut self, handle: FrameHandle, now_ms: f64) {
        if let Some(size) = self.core.take_resize(handle) {
            let result = self.resize(Some(size.width), Some(size.height));
            self.core.report("resize", result);
            return;
        }
        if self.core.take_animation_frame(handle) {
            self.step_animation(now_ms);
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
