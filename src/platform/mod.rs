//! Document seam.
//!
//! Engines never touch a browser document directly: container lookup,
//! mounting, frame scheduling, resize observation and overlays all go through
//! [`Host`]. A web embedding implements it over the DOM; [`HeadlessHost`]
//! implements it in memory for tests and server-side export.

mod headless;

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::render::SvgNode;

pub use headless::HeadlessHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObserverHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(pub u64);

/// Container given at construction: an element or a selector to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRef {
    Element(ContainerId),
    Selector(String),
}

impl From<ContainerId> for ContainerRef {
    fn from(id: ContainerId) -> Self {
        Self::Element(id)
    }
}

impl From<&str> for ContainerRef {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_owned())
    }
}

impl From<String> for ContainerRef {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

/// Direct attribute mutation of one mounted node, addressed by its key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodePatch {
    pub key: String,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
}

impl NodePatch {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            attrs: Vec::new(),
            text: None,
        }
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.push((name.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Applies the patch to the node tagged with `key` inside `root`.
    /// Returns `false` when no such node exists.
    pub fn apply(&self, root: &mut SvgNode) -> bool {
        let Some(node) = root.find_by_key_mut(&self.key) else {
            return false;
        };
        for (name, value) in &self.attrs {
            node.set_attr(name.clone(), value);
        }
        if let Some(text) = &self.text {
            node.set_text(text.clone());
        }
        true
    }
}

/// Floating tooltip overlay as the document should display it.
///
/// `html` is already escaped; hosts insert it verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayState {
    pub visible: bool,
    pub left: f64,
    pub top: f64,
    pub html: String,
    pub accent_color: String,
}

/// Everything an engine needs from the surrounding document.
pub trait Host {
    fn query_selector(&self, selector: &str) -> Option<ContainerId>;
    fn client_size(&self, container: ContainerId) -> Option<Viewport>;

    /// Replaces the container's contents with the scene.
    fn replace_children(&mut self, container: ContainerId, root: &SvgNode);
    fn patch_node(&mut self, container: ContainerId, patch: &NodePatch);
    fn clear_children(&mut self, container: ContainerId);

    fn prefers_reduced_motion(&self) -> bool;
    fn viewport_size(&self) -> Viewport;

    fn request_animation_frame(&mut self) -> FrameHandle;
    fn cancel_animation_frame(&mut self, handle: FrameHandle);

    fn observe_resize(&mut self, container: ContainerId) -> ObserverHandle;
    fn disconnect_resize(&mut self, handle: ObserverHandle);

    fn create_overlay(&mut self) -> OverlayId;
    fn update_overlay(&mut self, overlay: OverlayId, state: &OverlayState);
    fn remove_overlay(&mut self, overlay: OverlayId);
}
