//! Stateless constructors for scene-graph nodes.

use crate::core::Easing;
use crate::core::math::degrees_to_radians;
use crate::core::path::coord;
use crate::core::types::Point;

use super::SvgNode;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Root `<svg>` element with declared size and matching viewBox.
#[must_use]
pub fn svg_root(width: f64, height: f64, aria_label: &str) -> SvgNode {
    SvgNode::new("svg")
        .attr("xmlns", SVG_NAMESPACE)
        .attr("width", coord(width))
        .attr("height", coord(height))
        .attr("viewBox", format!("0 0 {} {}", coord(width), coord(height)))
        .attr("role", "img")
        .attr("aria-label", aria_label)
        .class("nc-chart")
}

#[must_use]
pub fn group(class: &str) -> SvgNode {
    SvgNode::new("g").class(class)
}

#[must_use]
pub fn path(d: impl Into<String>) -> SvgNode {
    SvgNode::new("path").attr("d", d.into())
}

#[must_use]
pub fn circle(cx: f64, cy: f64, r: f64) -> SvgNode {
    SvgNode::new("circle")
        .attr("cx", coord(cx))
        .attr("cy", coord(cy))
        .attr("r", coord(r))
}

/// Rectangle; negative sizes are normalized so the node stays valid.
#[must_use]
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> SvgNode {
    let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
    let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
    SvgNode::new("rect")
        .attr("x", coord(x))
        .attr("y", coord(y))
        .attr("width", coord(width))
        .attr("height", coord(height))
}

#[must_use]
pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> SvgNode {
    SvgNode::new("line")
        .attr("x1", coord(x1))
        .attr("y1", coord(y1))
        .attr("x2", coord(x2))
        .attr("y2", coord(y2))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[must_use]
pub fn text(x: f64, y: f64, content: impl Into<String>, anchor: TextAnchor) -> SvgNode {
    SvgNode::new("text")
        .attr("x", coord(x))
        .attr("y", coord(y))
        .attr("text-anchor", anchor.as_str())
        .text(content)
}

/// Accessible `<title>` child.
#[must_use]
pub fn title(content: impl Into<String>) -> SvgNode {
    SvgNode::new("title").text(content)
}

/// One stop of a gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
    pub opacity: f64,
}

impl GradientStop {
    #[must_use]
    pub fn new(offset: f64, color: impl Into<String>, opacity: f64) -> Self {
        Self {
            offset,
            color: color.into(),
            opacity,
        }
    }
}

/// `<linearGradient>`; vertical gradients run top to bottom.
#[must_use]
pub fn linear_gradient(id: &str, stops: &[GradientStop], vertical: bool) -> SvgNode {
    let (x2, y2) = if vertical { ("0", "1") } else { ("1", "0") };
    SvgNode::new("linearGradient")
        .attr("id", id)
        .attr("x1", "0")
        .attr("y1", "0")
        .attr("x2", x2)
        .attr("y2", y2)
        .children(stops.iter().map(|stop| {
            SvgNode::new("stop")
                .attr("offset", format!("{}%", coord(stop.offset * 100.0)))
                .attr("stop-color", &stop.color)
                .attr("stop-opacity", coord(stop.opacity))
        }))
}

/// Neon glow: blurred copy of the source merged under the original.
#[must_use]
pub fn glow_filter(id: &str, std_deviation: f64) -> SvgNode {
    SvgNode::new("filter")
        .attr("id", id)
        .attr("x", "-50%")
        .attr("y", "-50%")
        .attr("width", "200%")
        .attr("height", "200%")
        .child(
            SvgNode::new("feGaussianBlur")
                .attr("in", "SourceGraphic")
                .attr("stdDeviation", coord(std_deviation))
                .attr("result", "blur"),
        )
        .child(
            SvgNode::new("feMerge")
                .child(SvgNode::new("feMergeNode").attr("in", "blur"))
                .child(SvgNode::new("feMergeNode").attr("in", "SourceGraphic")),
        )
}

/// Horizontal CRT scanline pattern.
#[must_use]
pub fn scanline_pattern(id: &str) -> SvgNode {
    SvgNode::new("pattern")
        .attr("id", id)
        .attr("width", "4")
        .attr("height", "4")
        .attr("patternUnits", "userSpaceOnUse")
        .child(
            rect(0.0, 0.0, 4.0, 1.0)
                .attr("fill", "#000000")
                .attr("fill-opacity", "0.25"),
        )
}

/// Point at `angle_deg` on a circle; 0° is twelve o'clock, angles grow clockwise.
#[must_use]
pub fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, angle_deg: f64) -> Point {
    let radians = degrees_to_radians(angle_deg - 90.0);
    Point::new(cx + radius * radians.cos(), cy + radius * radians.sin())
}

/// Open circular arc from `start_deg` to `end_deg` (clockwise).
#[must_use]
pub fn arc_path(cx: f64, cy: f64, radius: f64, start_deg: f64, end_deg: f64) -> String {
    let sweep = end_deg - start_deg;
    if sweep.abs() < f64::EPSILON || radius <= 0.0 {
        return String::new();
    }
    if sweep.abs() >= 360.0 {
        let half = start_deg + 180.0;
        let first = arc_path(cx, cy, radius, start_deg, half);
        let second = arc_path(cx, cy, radius, half, start_deg + 360.0);
        return format!("{first}{}", second.replacen('M', " M", 1));
    }

    let start = polar_to_cartesian(cx, cy, radius, start_deg);
    let end = polar_to_cartesian(cx, cy, radius, end_deg);
    let large_arc = u8::from(sweep.abs() > 180.0);
    let sweep_flag = u8::from(sweep > 0.0);
    format!(
        "M{},{}A{},{} 0 {large_arc} {sweep_flag} {},{}",
        coord(start.x),
        coord(start.y),
        coord(radius),
        coord(radius),
        coord(end.x),
        coord(end.y)
    )
}

/// Annular wedge between `inner` and `outer` radius. An inner radius of zero
/// produces a pie slice.
#[must_use]
pub fn donut_segment_path(
    cx: f64,
    cy: f64,
    outer: f64,
    inner: f64,
    start_deg: f64,
    end_deg: f64,
) -> String {
    let sweep = end_deg - start_deg;
    if sweep <= 0.0 || outer <= 0.0 {
        return String::new();
    }
    // a closed 360° arc has coincident endpoints; stop just short of it
    let end_deg = if sweep >= 360.0 { start_deg + 359.99 } else { end_deg };
    let large_arc = u8::from(end_deg - start_deg > 180.0);

    let outer_start = polar_to_cartesian(cx, cy, outer, start_deg);
    let outer_end = polar_to_cartesian(cx, cy, outer, end_deg);
    let mut d = format!(
        "M{},{}A{},{} 0 {large_arc} 1 {},{}",
        coord(outer_start.x),
        coord(outer_start.y),
        coord(outer),
        coord(outer),
        coord(outer_end.x),
        coord(outer_end.y)
    );

    if inner > 0.0 {
        let inner_end = polar_to_cartesian(cx, cy, inner, end_deg);
        let inner_start = polar_to_cartesian(cx, cy, inner, start_deg);
        d.push_str(&format!(
            "L{},{}A{},{} 0 {large_arc} 0 {},{}Z",
            coord(inner_end.x),
            coord(inner_end.y),
            coord(inner),
            coord(inner),
            coord(inner_start.x),
            coord(inner_start.y)
        ));
    } else {
        d.push_str(&format!("L{},{}Z", coord(cx), coord(cy)));
    }
    d
}

/// Declarative `<animate>` child running once and holding its end value.
#[must_use]
pub fn animate(
    attribute: &str,
    from: impl ToString,
    to: impl ToString,
    duration_ms: f64,
    delay_ms: f64,
    easing: Easing,
) -> SvgNode {
    let node = SvgNode::new("animate")
        .attr("attributeName", attribute)
        .attr("from", from)
        .attr("to", to)
        .attr("dur", format!("{}ms", coord(duration_ms.max(0.0))))
        .attr("begin", format!("{}ms", coord(delay_ms.max(0.0))))
        .attr("fill", "freeze");
    match easing.key_splines() {
        Some(splines) => node
            .attr("calcMode", "spline")
            .attr("keyTimes", "0;1")
            .attr("keySplines", splines),
        None => node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_zero_degrees_is_twelve_o_clock() {
        let point = polar_to_cartesian(50.0, 50.0, 10.0, 0.0);
        assert!((point.x - 50.0).abs() < 1e-9);
        assert!((point.y - 40.0).abs() < 1e-9);
    }

    #[test]
    fn rect_normalizes_negative_sizes() {
        let node = rect(10.0, 10.0, -4.0, -6.0);
        assert_eq!(node.get_attr("x"), Some("6"));
        assert_eq!(node.get_attr("height"), Some("6"));
    }

    #[test]
    fn pie_slice_closes_at_center() {
        let d = donut_segment_path(0.0, 0.0, 10.0, 0.0, 0.0, 90.0);
        assert!(d.ends_with("L0,0Z"));
        assert!(donut_segment_path(0.0, 0.0, 10.0, 5.0, 0.0, 0.0).is_empty());
    }
}
