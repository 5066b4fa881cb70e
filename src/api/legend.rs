use crate::color::CHROME;
use crate::core::{ChartPadding, Viewport};
use crate::platform::Host;
use crate::render::{SvgNode, TextAnchor, group, rect, text, title};

use super::chart_core::{ChartCore, HitTarget};
use super::options::{LegendConfig, LegendPosition};

const SWATCH_PX: f64 = 10.0;
const ITEM_GAP_PX: f64 = 16.0;
const CHAR_WIDTH_PX: f64 = 6.5;

/// One legend row: a series name with its resolved color.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct LegendEntry {
    /// Index of the series in the chart's full series list.
    pub series: usize,
    pub name: String,
    pub color: String,
    pub visible: bool,
}

/// Whether a legend applies: only with more than one visible series.
#[must_use]
pub(super) fn legend_needed(config: &LegendConfig, visible_series: usize) -> bool {
    config.show && visible_series > 1
}

/// Extra padding reserved for a shown legend.
#[must_use]
pub(super) fn legend_padding(config: &LegendConfig, padding: ChartPadding) -> ChartPadding {
    let mut padding = padding;
    match config.position {
        LegendPosition::Top => padding.top += 24.0,
        LegendPosition::Bottom => padding.bottom += 24.0,
        LegendPosition::Right => padding.right += 120.0,
    }
    padding
}

/// Legend items laid out in a row (top/bottom) or a column (right). Each
/// item is keyed so a click toggles its series.
pub(super) fn render_legend<H: Host>(
    core: &mut ChartCore<H>,
    entries: &[LegendEntry],
    config: &LegendConfig,
    viewport: Viewport,
) -> SvgNode {
    let mut legend = group("nc-legend");
    let mut x = match config.position {
        LegendPosition::Right => viewport.width - 110.0,
        LegendPosition::Top | LegendPosition::Bottom => 12.0,
    };
    let mut y = match config.position {
        LegendPosition::Top | LegendPosition::Right => 8.0,
        LegendPosition::Bottom => viewport.height - 18.0,
    };

    for entry in entries {
        let key = core.register_hit(HitTarget::Legend {
            series: entry.series,
        });
        let opacity = if entry.visible { "1" } else { "0.35" };
        legend.push(
            group("nc-legend-item")
                .key(key)
                .attr("opacity", opacity)
                .attr("cursor", "pointer")
                .child(title(&entry.name))
                .child(rect(x, y, SWATCH_PX, SWATCH_PX).attr("fill", &entry.color).attr("rx", "2"))
                .child(
                    text(x + SWATCH_PX + 4.0, y + SWATCH_PX - 1.0, &entry.name, TextAnchor::Start)
                        .attr("fill", CHROME.text)
                        .attr("font-size", "11"),
                ),
        );
        match config.position {
            LegendPosition::Right => y += SWATCH_PX + 8.0,
            LegendPosition::Top | LegendPosition::Bottom => {
                x += SWATCH_PX + 4.0 + entry.name.chars().count() as f64 * CHAR_WIDTH_PX + ITEM_GAP_PX;
            }
        }
    }
    legend
}
