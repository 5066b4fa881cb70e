use chrono::Duration;

use crate::color::CHROME;
use crate::core::primitives::{format_decimal, precision_from_step, unix_millis_to_datetime};
use crate::core::{BandScale, LinearScale, PlotArea};
use crate::render::{SvgNode, TextAnchor, group, line, text};

use super::options::AxisConfig;

const LABEL_FONT_SIZE: &str = "10";
const LABEL_GAP_PX: f64 = 8.0;

/// Edge of the plot an axis is drawn along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AxisSide {
    Bottom,
    Left,
}

/// How continuous tick values print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TickFormat {
    Number,
    Time,
}

/// Every `step`-th label keeps categorical axes within `tick_count` labels.
#[must_use]
pub(super) fn label_step(category_count: usize, tick_count: usize) -> usize {
    if tick_count == 0 {
        return 1;
    }
    category_count.div_ceil(tick_count).max(1)
}

fn format_tick(value: f64, step: f64, format: TickFormat, precision: Option<u32>) -> String {
    match format {
        TickFormat::Number => {
            format_decimal(value, precision.unwrap_or_else(|| precision_from_step(step)))
        }
        TickFormat::Time => match unix_millis_to_datetime(value) {
            Some(time) if step < Duration::days(1).num_milliseconds() as f64 => {
                time.format("%H:%M").to_string()
            }
            Some(time) => time.format("%b %d").to_string(),
            None => String::new(),
        },
    }
}

fn label(x: f64, y: f64, content: String, anchor: TextAnchor) -> SvgNode {
    text(x, y, content, anchor)
        .class("nc-axis-label")
        .attr("fill", CHROME.text_muted)
        .attr("font-size", LABEL_FONT_SIZE)
}

fn grid_line(x1: f64, y1: f64, x2: f64, y2: f64) -> SvgNode {
    line(x1, y1, x2, y2)
        .class("nc-grid-line")
        .attr("stroke", CHROME.grid)
        .attr("stroke-dasharray", "2 4")
}

fn axis_line(plot: PlotArea, side: AxisSide) -> SvgNode {
    let node = match side {
        AxisSide::Bottom => line(plot.x, plot.bottom(), plot.right(), plot.bottom()),
        AxisSide::Left => line(plot.x, plot.y, plot.x, plot.bottom()),
    };
    node.class("nc-axis-line").attr("stroke", CHROME.axis)
}

fn axis_title(plot: PlotArea, side: AxisSide, title: &str) -> SvgNode {
    let node = match side {
        AxisSide::Bottom => text(
            plot.x + plot.width / 2.0,
            plot.bottom() + 32.0,
            title,
            TextAnchor::Middle,
        ),
        AxisSide::Left => {
            let x = plot.x - 38.0;
            let y = plot.y + plot.height / 2.0;
            text(x, y, title, TextAnchor::Middle)
                .attr("transform", format!("rotate(-90 {x} {y})"))
        }
    };
    node.class("nc-axis-title")
        .attr("fill", CHROME.text)
        .attr("font-size", "11")
}

/// Axis for a continuous scale: axis line, tick labels and optional grid
/// lines across the plot.
pub(super) fn linear_axis(
    plot: PlotArea,
    scale: LinearScale,
    side: AxisSide,
    config: &AxisConfig,
    format: TickFormat,
) -> SvgNode {
    let mut axis = group(match side {
        AxisSide::Bottom => "nc-axis nc-axis-x",
        AxisSide::Left => "nc-axis nc-axis-y",
    });
    if !config.show {
        return axis;
    }

    let ticks = scale.ticks(config.tick_count);
    let step = match ticks.as_slice() {
        [first, second, ..] => second - first,
        _ => 0.0,
    };
    for &tick in &ticks {
        let position = scale.map(tick);
        let content = format_tick(tick, step, format, config.precision);
        match side {
            AxisSide::Bottom => {
                if config.show_grid {
                    axis.push(grid_line(position, plot.y, position, plot.bottom()));
                }
                axis.push(label(
                    position,
                    plot.bottom() + LABEL_GAP_PX + 8.0,
                    content,
                    TextAnchor::Middle,
                ));
            }
            AxisSide::Left => {
                if config.show_grid {
                    axis.push(grid_line(plot.x, position, plot.right(), position));
                }
                axis.push(
                    label(plot.x - LABEL_GAP_PX, position, content, TextAnchor::End)
                        .attr("dominant-baseline", "middle"),
                );
            }
        }
    }

    axis.push(axis_line(plot, side));
    if let Some(title) = &config.label {
        axis.push(axis_title(plot, side, title));
    }
    axis
}

/// Axis for a band scale. Labels are thinned so at most `tick_count` show.
pub(super) fn band_axis(
    plot: PlotArea,
    scale: &BandScale,
    side: AxisSide,
    config: &AxisConfig,
) -> SvgNode {
    let mut axis = group(match side {
        AxisSide::Bottom => "nc-axis nc-axis-x",
        AxisSide::Left => "nc-axis nc-axis-y",
    });
    if !config.show {
        return axis;
    }

    let step = label_step(scale.len(), config.tick_count);
    for (index, category) in scale.categories().enumerate() {
        if index % step != 0 {
            continue;
        }
        let center = scale.center_at(index);
        let node = match side {
            AxisSide::Bottom => label(
                center,
                plot.bottom() + LABEL_GAP_PX + 8.0,
                category.to_owned(),
                TextAnchor::Middle,
            ),
            AxisSide::Left => label(plot.x - LABEL_GAP_PX, center, category.to_owned(), TextAnchor::End)
                .attr("dominant-baseline", "middle"),
        };
        axis.push(node);
    }

    axis.push(axis_line(plot, side));
    if let Some(title) = &config.label {
        axis.push(axis_title(plot, side, title));
    }
    axis
}
