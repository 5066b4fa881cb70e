mod events;
mod responsive;
mod tooltip;

use serde::{Deserialize, Serialize};

pub use events::{ChartEvent, ChartEventKind, EventData, EventEmitter, EventHandler, SubscriptionId};
pub use responsive::ResponsiveManager;
pub use tooltip::{TooltipContent, TooltipManager, TooltipRow, css_color, position_tooltip};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerKind {
    Enter,
    Move,
    Leave,
    Click,
}

/// Pointer event delivered by the host, addressed to a keyed scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerInput {
    pub kind: PointerKind,
    pub target_key: Option<String>,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerInput {
    #[must_use]
    pub fn new(kind: PointerKind, target_key: impl Into<String>, client_x: f64, client_y: f64) -> Self {
        Self {
            kind,
            target_key: Some(target_key.into()),
            client_x,
            client_y,
        }
    }

    #[must_use]
    pub fn enter(target_key: impl Into<String>, client_x: f64, client_y: f64) -> Self {
        Self::new(PointerKind::Enter, target_key, client_x, client_y)
    }

    #[must_use]
    pub fn leave(target_key: impl Into<String>) -> Self {
        Self::new(PointerKind::Leave, target_key, 0.0, 0.0)
    }

    #[must_use]
    pub fn click(target_key: impl Into<String>, client_x: f64, client_y: f64) -> Self {
        Self::new(PointerKind::Click, target_key, client_x, client_y)
    }
}
