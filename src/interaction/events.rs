use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::DataPoint;
use crate::error::ChartError;

use super::PointerInput;

/// Closed set of events an engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartEventKind {
    PointHover,
    PointClick,
    SegmentHover,
    SegmentClick,
    BarHover,
    BarClick,
    LegendClick,
    Resize,
}

impl ChartEventKind {
    pub const ALL: [ChartEventKind; 8] = [
        Self::PointHover,
        Self::PointClick,
        Self::SegmentHover,
        Self::SegmentClick,
        Self::BarHover,
        Self::BarClick,
        Self::LegendClick,
        Self::Resize,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PointHover => "pointHover",
            Self::PointClick => "pointClick",
            Self::SegmentHover => "segmentHover",
            Self::SegmentClick => "segmentClick",
            Self::BarHover => "barHover",
            Self::BarClick => "barClick",
            Self::LegendClick => "legendClick",
            Self::Resize => "resize",
        }
    }
}

impl fmt::Display for ChartEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartEventKind {
    type Err = ChartError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown event kind `{raw}`")))
    }
}

/// Payload delivered with an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventData {
    #[serde(rename_all = "camelCase")]
    Point {
        series_id: String,
        series_name: String,
        index: usize,
        point: DataPoint,
    },
    #[serde(rename_all = "camelCase")]
    Bar {
        series_id: String,
        series_name: String,
        index: usize,
        category: String,
        value: f64,
    },
    #[serde(rename_all = "camelCase")]
    Segment {
        index: usize,
        label: String,
        value: f64,
        percentage: f64,
    },
    #[serde(rename_all = "camelCase")]
    Legend { series_id: String, visible: bool },
    Resize { width: f64, height: f64 },
}

/// Event as seen by handlers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEvent {
    #[serde(rename = "type")]
    pub kind: ChartEventKind,
    /// Interaction key of the scene node involved, if any.
    pub target: Option<String>,
    pub data: EventData,
    pub original_event: Option<PointerInput>,
}

pub type EventHandler = Box<dyn FnMut(&ChartEvent)>;

/// Token returned by `on`, used to unsubscribe a single handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Typed publish/subscribe owned by one engine instance.
#[derive(Default)]
pub struct EventEmitter {
    next_id: u64,
    handlers: IndexMap<ChartEventKind, Vec<(SubscriptionId, EventHandler)>>,
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: IndexMap<_, _> = self
            .handlers
            .iter()
            .map(|(kind, handlers)| (*kind, handlers.len()))
            .collect();
        f.debug_struct("EventEmitter")
            .field("handlers", &counts)
            .finish()
    }
}

impl EventEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: ChartEventKind, handler: EventHandler) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.handlers.entry(kind).or_default().push((id, handler));
        id
    }

    /// Removes one handler, or every handler of `kind` when `id` is `None`.
    /// Unknown kinds and ids are ignored.
    pub fn off(&mut self, kind: ChartEventKind, id: Option<SubscriptionId>) {
        match id {
            None => {
                self.handlers.shift_remove(&kind);
            }
            Some(id) => {
                if let Some(handlers) = self.handlers.get_mut(&kind) {
                    handlers.retain(|(existing, _)| *existing != id);
                }
            }
        }
    }

    pub fn emit(&mut self, event: &ChartEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind) {
            for (_, handler) in handlers.iter_mut() {
                handler(event);
            }
        }
    }

    #[must_use]
    pub fn handler_count(&self, kind: ChartEventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}
