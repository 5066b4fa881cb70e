//! Vector scene graph, drawing primitives and markup export.

mod markup;
mod node;
pub mod primitives;

pub use markup::{escape_xml, to_markup};
pub use node::{KEY_ATTR, SvgNode};
pub use primitives::{
    GradientStop, TextAnchor, animate, arc_path, circle, donut_segment_path, glow_filter, group,
    line, linear_gradient, path, polar_to_cartesian, rect, scanline_pattern, svg_root, text, title,
};
