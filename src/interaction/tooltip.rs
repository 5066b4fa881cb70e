use crate::color::Theme;
use crate::core::Viewport;
use crate::platform::{Host, OverlayId, OverlayState};
use crate::render::escape_xml;

const CHAR_WIDTH_PX: f64 = 7.0;
const ROW_HEIGHT_PX: f64 = 18.0;
const BOX_PADDING_PX: f64 = 12.0;

/// One `label: value` line of a tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
    pub color: Option<String>,
}

impl TooltipRow {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Structured tooltip content. Every string is escaped when converted to
/// overlay HTML, so data labels can never inject markup.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub title: Option<String>,
    pub rows: Vec<TooltipRow>,
    pub accent_color: String,
}

impl TooltipContent {
    #[must_use]
    pub fn new(accent_color: impl Into<String>) -> Self {
        Self {
            title: None,
            rows: Vec::new(),
            accent_color: accent_color.into(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn row(mut self, row: TooltipRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Single free-text body, as produced by a caller-supplied formatter.
    #[must_use]
    pub fn plain(text: impl Into<String>, accent_color: impl Into<String>) -> Self {
        Self {
            title: Some(text.into()),
            rows: Vec::new(),
            accent_color: accent_color.into(),
        }
    }

    /// Accent as a plain CSS color; anything else becomes the default theme
    /// color.
    #[must_use]
    pub fn accent(&self) -> &str {
        css_color(&self.accent_color).unwrap_or(Theme::default().primary())
    }

    /// Overlay markup. A row color that is not a plain CSS color token falls
    /// back to the accent.
    #[must_use]
    pub fn to_html(&self) -> String {
        let accent = self.accent();
        let mut html = String::new();
        if let Some(title) = &self.title {
            html.push_str(&format!(
                "<div class=\"nc-tooltip-title\" style=\"color:{}\">{}</div>",
                escape_xml(accent),
                escape_xml(title)
            ));
        }
        for row in &self.rows {
            let color = row.color.as_deref().and_then(css_color).unwrap_or(accent);
            html.push_str(&format!(
                "<div class=\"nc-tooltip-row\"><span class=\"nc-tooltip-swatch\" style=\"background:{}\"></span><span class=\"nc-tooltip-label\">{}</span><span class=\"nc-tooltip-value\">{}</span></div>",
                escape_xml(color),
                escape_xml(&row.label),
                escape_xml(&row.value)
            ));
        }
        html
    }

    /// Rough rendered size used for edge flipping.
    #[must_use]
    pub fn estimated_size(&self) -> (f64, f64) {
        let title_chars = self.title.as_ref().map_or(0, |title| title.chars().count());
        let row_chars = self
            .rows
            .iter()
            .map(|row| row.label.chars().count() + row.value.chars().count() + 4)
            .max()
            .unwrap_or(0);
        let lines = self.rows.len() + usize::from(self.title.is_some());
        (
            title_chars.max(row_chars) as f64 * CHAR_WIDTH_PX + BOX_PADDING_PX * 2.0,
            lines.max(1) as f64 * ROW_HEIGHT_PX + BOX_PADDING_PX,
        )
    }
}

/// Returns `raw` when it is a single CSS color token: `#hex`, an
/// `rgb()`/`rgba()`/`hsl()`/`hsla()` call with numeric arguments, or a
/// named color.
#[must_use]
pub fn css_color(raw: &str) -> Option<&str> {
    let value = raw.trim();
    if let Some(hex) = value.strip_prefix('#') {
        let valid =
            matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|ch| ch.is_ascii_hexdigit());
        return valid.then_some(value);
    }
    for function in ["rgba(", "rgb(", "hsla(", "hsl("] {
        if let Some(arguments) = value.strip_prefix(function) {
            let valid = arguments.strip_suffix(')').is_some_and(|inner| {
                !inner.is_empty()
                    && inner.chars().all(|ch| {
                        ch.is_ascii_digit()
                            || matches!(ch, '.' | ',' | '%' | ' ' | '/' | '-' | 'd' | 'e' | 'g')
                    })
            });
            return valid.then_some(value);
        }
    }
    let named = !value.is_empty()
        && value.len() <= 32
        && value.chars().all(|ch| ch.is_ascii_alphabetic());
    named.then_some(value)
}

/// Places a `size` box near `(x, y)`, flipping to the other side of the
/// pointer when it would cross the viewport's right or bottom edge.
#[must_use]
pub fn position_tooltip(x: f64, y: f64, size: (f64, f64), offset: f64, viewport: Viewport) -> (f64, f64) {
    let (width, height) = size;
    let mut left = x + offset;
    if left + width > viewport.width {
        left = x - offset - width;
    }
    let mut top = y + offset;
    if top + height > viewport.height {
        top = y - offset - height;
    }
    (left.max(0.0), top.max(0.0))
}

/// Owns at most one floating overlay per chart, created on first show.
#[derive(Debug, Default)]
pub struct TooltipManager {
    overlay: Option<OverlayId>,
    visible: bool,
    offset: f64,
}

impl TooltipManager {
    #[must_use]
    pub fn new(offset: f64) -> Self {
        Self {
            overlay: None,
            visible: false,
            offset,
        }
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn overlay(&self) -> Option<OverlayId> {
        self.overlay
    }

    pub fn show<H: Host + ?Sized>(&mut self, host: &mut H, content: &TooltipContent, x: f64, y: f64) {
        let overlay = match self.overlay {
            Some(overlay) => overlay,
            None => {
                let overlay = host.create_overlay();
                self.overlay = Some(overlay);
                overlay
            }
        };

        let (left, top) = position_tooltip(
            x,
            y,
            content.estimated_size(),
            self.offset,
            host.viewport_size(),
        );
        host.update_overlay(
            overlay,
            &OverlayState {
                visible: true,
                left,
                top,
                html: content.to_html(),
                accent_color: content.accent().to_owned(),
            },
        );
        self.visible = true;
    }

    /// Hides the overlay; a tooltip that was never shown is left alone.
    pub fn hide<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some(overlay) = self.overlay else {
            return;
        };
        if !self.visible {
            return;
        }
        host.update_overlay(overlay, &OverlayState::default());
        self.visible = false;
    }

    /// Removes the overlay from the document.
    pub fn destroy<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(overlay) = self.overlay.take() {
            host.remove_overlay(overlay);
        }
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_flips_at_viewport_edges() {
        let viewport = Viewport::new(200.0, 100.0);
        assert_eq!(position_tooltip(10.0, 10.0, (50.0, 20.0), 10.0, viewport), (20.0, 20.0));
        assert_eq!(position_tooltip(180.0, 90.0, (50.0, 20.0), 10.0, viewport), (120.0, 60.0));
    }

    #[test]
    fn html_is_escaped() {
        let content = TooltipContent::new("#fff")
            .title("<b>x</b>")
            .row(TooltipRow::new("a&b", "1"));
        let html = content.to_html();
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains("a&amp;b"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn only_plain_color_tokens_pass() {
        assert_eq!(css_color("#0ff"), Some("#0ff"));
        assert_eq!(css_color("rgba(255, 0, 0, 0.5)"), Some("rgba(255, 0, 0, 0.5)"));
        assert_eq!(css_color("hsl(120deg 50% 50%)"), Some("hsl(120deg 50% 50%)"));
        assert_eq!(css_color("rebeccapurple"), Some("rebeccapurple"));
        assert_eq!(css_color("red;background:url(//x)"), None);
        assert_eq!(css_color("rgb(1,2,3);x:y"), None);
        assert_eq!(css_color("#12345"), None);
    }
}
