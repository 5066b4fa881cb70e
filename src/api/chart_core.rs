use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::color::{Theme, resolve_color};
use crate::core::Viewport;
use crate::core::path::coord;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    ChartEvent, ChartEventKind, EventData, EventEmitter, EventHandler, PointerInput,
    ResponsiveManager, SubscriptionId, TooltipContent, TooltipManager,
};
use crate::platform::{ContainerId, ContainerRef, FrameHandle, Host, NodePatch};
use crate::render::{SvgNode, glow_filter, rect, scanline_pattern, svg_root, to_markup};

use super::ChartKind;
use super::options::{AnimationConfig, BaseOptions};
use super::validation::validate_dimensions;

/// Display color of the `index`-th series: explicit color, then the
/// series theme, then the chart theme for the first series and the series
/// palette for the rest.
pub(crate) fn series_accent(
    explicit: Option<&str>,
    theme: Option<Theme>,
    chart_theme: Theme,
    index: usize,
) -> String {
    let theme = theme.or((index == 0).then_some(chart_theme));
    resolve_color(explicit, theme, index)
}

/// Data behind an interactive scene node, rebuilt on every render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum HitTarget {
    Point { series: usize, index: usize },
    Bar { series: usize, index: usize },
    Segment { index: usize },
    Legend { series: usize },
}

/// Lifecycle state every engine composes: container, scene, managers and
/// the single in-flight animation handle.
pub(crate) struct ChartCore<H: Host> {
    host: Rc<RefCell<H>>,
    container: ContainerId,
    kind: ChartKind,
    uid: String,
    viewport: Viewport,
    defs: SvgNode,
    root: Option<SvgNode>,
    emitter: EventEmitter,
    tooltip: TooltipManager,
    responsive: ResponsiveManager,
    animation: Option<FrameHandle>,
    hits: IndexMap<String, HitTarget>,
    destroyed: bool,
}

impl<H: Host> ChartCore<H> {
    pub(crate) fn new(
        host: Rc<RefCell<H>>,
        container: ContainerRef,
        kind: ChartKind,
        base: &BaseOptions,
    ) -> ChartResult<Self> {
        let container = match container {
            ContainerRef::Element(id) => id,
            ContainerRef::Selector(selector) => host
                .borrow()
                .query_selector(&selector)
                .ok_or(ChartError::ContainerNotFound { selector })?,
        };

        let fallback = kind.default_size();
        let viewport = validate_dimensions(kind.as_str(), base.width, base.height, fallback);
        let uid = format!("nc-{}-{}", kind.as_str(), container.0);
        debug!(chart = kind.as_str(), %uid, "chart created");

        Ok(Self {
            host,
            container,
            kind,
            uid,
            viewport,
            defs: SvgNode::new("defs"),
            root: None,
            emitter: EventEmitter::new(),
            tooltip: TooltipManager::new(base.tooltip.offset),
            responsive: ResponsiveManager::new(),
            animation: None,
            hits: IndexMap::new(),
            destroyed: false,
        })
    }

    /// Document-unique id for a def owned by this chart.
    pub(crate) fn def_id(&self, name: &str) -> String {
        format!("{}-{name}", self.uid)
    }

    pub(crate) fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Applies option-driven state: dimensions, tooltip offset and resize
    /// observation. Corrected dimensions are written back so the options
    /// stay serializable.
    pub(crate) fn configure(&mut self, base: &mut BaseOptions) {
        self.viewport = validate_dimensions(
            self.kind.as_str(),
            base.width,
            base.height,
            self.kind.default_size(),
        );
        base.width = self.viewport.width;
        base.height = self.viewport.height;
        self.tooltip.set_offset(base.tooltip.offset);
        if !base.tooltip.enabled {
            self.hide_tooltip();
        }
        let mut host = self.host.borrow_mut();
        if base.responsive {
            if self.responsive.observe(&mut *host, self.container) {
                // an observer reports the current size once on connect
                if let Some(size) = host.client_size(self.container) {
                    if size != self.viewport {
                        self.responsive.notify(&mut *host, size);
                    }
                }
            }
        } else if self.responsive.is_observing() {
            self.responsive.disconnect(&mut *host);
        }
    }

    /// Animations run only when requested and the platform does not prefer
    /// reduced motion. Checked on every render.
    pub(crate) fn should_animate(&self, animation: &AnimationConfig) -> bool {
        animation.enabled && animation.duration > 0.0 && !self.host.borrow().prefers_reduced_motion()
    }

    /// Defs every chart carries: the glow filter and scanline pattern when
    /// enabled.
    pub(crate) fn standard_defs(&self, base: &BaseOptions) -> SvgNode {
        let mut defs = SvgNode::new("defs");
        if base.glow.enabled {
            defs.push(glow_filter(&self.def_id("glow"), base.glow.intensity));
        }
        if base.scanlines {
            defs.push(scanline_pattern(&self.def_id("scanlines")));
        }
        defs
    }

    /// `filter` attribute value for glowing strokes, if glow is on.
    pub(crate) fn glow_ref(&self, base: &BaseOptions) -> Option<String> {
        base.glow
            .enabled
            .then(|| format!("url(#{})", self.def_id("glow")))
    }

    pub(crate) fn set_defs(&mut self, defs: SvgNode) {
        self.defs = defs;
    }

    pub(crate) fn clear_hits(&mut self) {
        self.hits.clear();
    }

    /// Registers an interactive node and returns the key to tag it with.
    pub(crate) fn register_hit(&mut self, target: HitTarget) -> String {
        let key = match target {
            HitTarget::Point { series, index } => format!("point-{series}-{index}"),
            HitTarget::Bar { series, index } => format!("bar-{series}-{index}"),
            HitTarget::Segment { index } => format!("segment-{index}"),
            HitTarget::Legend { series } => format!("legend-{series}"),
        };
        self.hits.insert(key.clone(), target);
        key
    }

    pub(crate) fn hit(&self, input: &PointerInput) -> Option<HitTarget> {
        input
            .target_key
            .as_deref()
            .and_then(|key| self.hits.get(key))
            .copied()
    }

    /// Wraps `content` in a fresh root with the cached defs and mounts it,
    /// replacing whatever the container held.
    pub(crate) fn mount(&mut self, base: &BaseOptions, content: SvgNode) {
        if self.destroyed {
            return;
        }
        let aria_label = base
            .aria_label
            .clone()
            .unwrap_or_else(|| format!("{} chart", self.kind.as_str()));
        let mut root = svg_root(self.viewport.width, self.viewport.height, &aria_label)
            .attr("id", &self.uid)
            .child(self.defs.clone())
            .child(content.class("nc-content"));
        if base.scanlines {
            root.push(
                rect(0.0, 0.0, self.viewport.width, self.viewport.height)
                    .class("nc-scanlines")
                    .attr("fill", format!("url(#{})", self.def_id("scanlines")))
                    .attr("pointer-events", "none"),
            );
        }

        self.host.borrow_mut().replace_children(self.container, &root);
        self.root = Some(root);
        debug!(chart = self.kind.as_str(), uid = %self.uid, "rendered");
    }

    /// Mutates one mounted node in place, mirroring the change in the
    /// retained scene.
    pub(crate) fn patch(&mut self, patch: &NodePatch) {
        if self.destroyed {
            return;
        }
        if let Some(root) = self.root.as_mut() {
            patch.apply(root);
        }
        self.host.borrow_mut().patch_node(self.container, patch);
    }

    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(root) = self.root.as_mut() {
            root.set_attr("width", coord(viewport.width));
            root.set_attr("height", coord(viewport.height));
            root.set_attr(
                "viewBox",
                format!("0 0 {} {}", coord(viewport.width), coord(viewport.height)),
            );
        }
    }

    /// New dimensions for `resize`, keeping the current value for omitted or
    /// invalid axes.
    pub(crate) fn resolve_resize(&self, width: Option<f64>, height: Option<f64>) -> Viewport {
        validate_dimensions(
            self.kind.as_str(),
            width.unwrap_or(self.viewport.width),
            height.unwrap_or(self.viewport.height),
            self.viewport,
        )
    }

    pub(crate) fn on(&mut self, kind: ChartEventKind, handler: EventHandler) -> SubscriptionId {
        self.emitter.on(kind, handler)
    }

    pub(crate) fn off(&mut self, kind: ChartEventKind, id: Option<SubscriptionId>) {
        self.emitter.off(kind, id);
    }

    pub(crate) fn emit(
        &mut self,
        kind: ChartEventKind,
        target: Option<String>,
        data: EventData,
        original_event: Option<PointerInput>,
    ) {
        if self.destroyed {
            return;
        }
        self.emitter.emit(&ChartEvent {
            kind,
            target,
            data,
            original_event,
        });
    }

    pub(crate) fn emit_resize(&mut self) {
        let Viewport { width, height } = self.viewport;
        self.emit(
            ChartEventKind::Resize,
            None,
            EventData::Resize { width, height },
            None,
        );
    }

    pub(crate) fn show_tooltip(&mut self, content: &TooltipContent, x: f64, y: f64) {
        let mut host = self.host.borrow_mut();
        self.tooltip.show(&mut *host, content, x, y);
    }

    pub(crate) fn hide_tooltip(&mut self) {
        let mut host = self.host.borrow_mut();
        self.tooltip.hide(&mut *host);
    }

    pub(crate) fn container_resized(&mut self, width: f64, height: f64) {
        if self.destroyed {
            return;
        }
        let mut host = self.host.borrow_mut();
        self.responsive.notify(&mut *host, Viewport::new(width, height));
    }

    /// Pending observed size when `handle` is the resize frame.
    pub(crate) fn take_resize(&mut self, handle: FrameHandle) -> Option<Viewport> {
        if self.destroyed {
            return None;
        }
        self.responsive.take_pending(handle)
    }

    /// Schedules the next animation frame, replacing any outstanding one.
    pub(crate) fn request_frame(&mut self) -> FrameHandle {
        let mut host = self.host.borrow_mut();
        if let Some(previous) = self.animation.take() {
            host.cancel_animation_frame(previous);
        }
        let handle = host.request_animation_frame();
        self.animation = Some(handle);
        handle
    }

    /// Consumes the animation handle if `handle` is it.
    pub(crate) fn take_animation_frame(&mut self, handle: FrameHandle) -> bool {
        if self.destroyed || self.animation != Some(handle) {
            return false;
        }
        self.animation = None;
        true
    }

    pub(crate) fn cancel_animation(&mut self) {
        if let Some(handle) = self.animation.take() {
            self.host.borrow_mut().cancel_animation_frame(handle);
        }
    }

    /// Releases every document resource. Safe to call repeatedly.
    pub(crate) fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        {
            let mut host = self.host.borrow_mut();
            if let Some(handle) = self.animation.take() {
                host.cancel_animation_frame(handle);
            }
            self.responsive.disconnect(&mut *host);
            self.tooltip.destroy(&mut *host);
            host.clear_children(self.container);
        }
        self.root = None;
        self.hits.clear();
        self.emitter.clear();
        debug!(chart = self.kind.as_str(), uid = %self.uid, "destroyed");
    }

    pub(crate) fn get_svg(&self) -> ChartResult<&SvgNode> {
        self.root.as_ref().ok_or(ChartError::NotInitialized)
    }

    pub(crate) fn to_svg(&self) -> ChartResult<String> {
        self.get_svg().map(to_markup)
    }

    /// Logs and swallows a render failure raised from an async trigger.
    pub(crate) fn report(&self, operation: &str, result: ChartResult<()>) {
        if let Err(err) = result {
            warn!(chart = self.kind.as_str(), operation, error = %err, "chart operation failed");
        }
    }
}
