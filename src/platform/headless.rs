use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::core::Viewport;
use crate::render::{SvgNode, to_markup};

use super::{
    ContainerId, FrameHandle, Host, NodePatch, ObserverHandle, OverlayId, OverlayState,
};

#[derive(Debug, Clone)]
struct HeadlessContainer {
    selector: Option<String>,
    size: Viewport,
    mounted: Option<SvgNode>,
    mount_count: usize,
}

/// In-memory document.
///
/// Containers are registered up front (optionally under a selector), mounted
/// scenes are kept per container, and frame requests accumulate until the
/// driver collects them with [`HeadlessHost::take_pending_frames`].
#[derive(Debug)]
pub struct HeadlessHost {
    next_id: u64,
    containers: IndexMap<ContainerId, HeadlessContainer>,
    pending_frames: IndexSet<FrameHandle>,
    observers: IndexMap<ObserverHandle, ContainerId>,
    overlays: IndexMap<OverlayId, OverlayState>,
    reduced_motion: bool,
    viewport: Viewport,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self {
            next_id: 1,
            containers: IndexMap::new(),
            pending_frames: IndexSet::new(),
            observers: IndexMap::new(),
            overlays: IndexMap::new(),
            reduced_motion: false,
            viewport: Viewport::new(1280.0, 800.0),
        }
    }
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Registers a container reachable through `selector` (when given).
    pub fn add_container(&mut self, selector: Option<&str>, width: f64, height: f64) -> ContainerId {
        let id = ContainerId(self.next_id());
        self.containers.insert(
            id,
            HeadlessContainer {
                selector: selector.map(str::to_owned),
                size: Viewport::new(width, height),
                mounted: None,
                mount_count: 0,
            },
        );
        id
    }

    /// Changes a container's size and returns the observers that would be
    /// notified. The driver forwards the new size to the owning charts.
    pub fn set_container_size(
        &mut self,
        container: ContainerId,
        width: f64,
        height: f64,
    ) -> Vec<ObserverHandle> {
        if let Some(entry) = self.containers.get_mut(&container) {
            entry.size = Viewport::new(width, height);
        }
        self.observers
            .iter()
            .filter(|(_, observed)| **observed == container)
            .map(|(handle, _)| *handle)
            .collect()
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    #[must_use]
    pub fn mounted(&self, container: ContainerId) -> Option<&SvgNode> {
        self.containers
            .get(&container)
            .and_then(|entry| entry.mounted.as_ref())
    }

    #[must_use]
    pub fn mounted_markup(&self, container: ContainerId) -> Option<String> {
        self.mounted(container).map(to_markup)
    }

    #[must_use]
    pub fn is_empty(&self, container: ContainerId) -> bool {
        self.mounted(container).is_none()
    }

    #[must_use]
    pub fn mount_count(&self, container: ContainerId) -> usize {
        self.containers
            .get(&container)
            .map_or(0, |entry| entry.mount_count)
    }

    #[must_use]
    pub fn pending_frames(&self) -> Vec<FrameHandle> {
        self.pending_frames.iter().copied().collect()
    }

    /// Drains the frame queue, as the browser does when it runs callbacks.
    pub fn take_pending_frames(&mut self) -> Vec<FrameHandle> {
        self.pending_frames.drain(..).collect()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_observing(&self, container: ContainerId) -> bool {
        self.observers.values().any(|observed| *observed == container)
    }

    #[must_use]
    pub fn overlay(&self, overlay: OverlayId) -> Option<&OverlayState> {
        self.overlays.get(&overlay)
    }

    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// First overlay currently shown, if any.
    #[must_use]
    pub fn visible_overlay(&self) -> Option<&OverlayState> {
        self.overlays.values().find(|state| state.visible)
    }
}

impl Host for HeadlessHost {
    fn query_selector(&self, selector: &str) -> Option<ContainerId> {
        self.containers
            .iter()
            .find(|(_, entry)| entry.selector.as_deref() == Some(selector))
            .map(|(id, _)| *id)
    }

    fn client_size(&self, container: ContainerId) -> Option<Viewport> {
        self.containers.get(&container).map(|entry| entry.size)
    }

    fn replace_children(&mut self, container: ContainerId, root: &SvgNode) {
        if let Some(entry) = self.containers.get_mut(&container) {
            entry.mounted = Some(root.clone());
            entry.mount_count += 1;
        }
    }

    fn patch_node(&mut self, container: ContainerId, patch: &NodePatch) {
        let applied = self
            .containers
            .get_mut(&container)
            .and_then(|entry| entry.mounted.as_mut())
            .is_some_and(|root| patch.apply(root));
        if !applied {
            debug!(key = %patch.key, "patch target not mounted");
        }
    }

    fn clear_children(&mut self, container: ContainerId) {
        if let Some(entry) = self.containers.get_mut(&container) {
            entry.mounted = None;
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn viewport_size(&self) -> Viewport {
        self.viewport
    }

    fn request_animation_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.pending_frames.insert(handle);
        handle
    }

    fn cancel_animation_frame(&mut self, handle: FrameHandle) {
        self.pending_frames.shift_remove(&handle);
    }

    fn observe_resize(&mut self, container: ContainerId) -> ObserverHandle {
        let handle = ObserverHandle(self.next_id());
        self.observers.insert(handle, container);
        handle
    }

    fn disconnect_resize(&mut self, handle: ObserverHandle) {
        self.observers.shift_remove(&handle);
    }

    fn create_overlay(&mut self) -> OverlayId {
        let id = OverlayId(self.next_id());
        self.overlays.insert(id, OverlayState::default());
        id
    }

    fn update_overlay(&mut self, overlay: OverlayId, state: &OverlayState) {
        if let Some(entry) = self.overlays.get_mut(&overlay) {
            *entry = state.clone();
        }
    }

    fn remove_overlay(&mut self, overlay: OverlayId) {
        self.overlays.shift_remove(&overlay);
    }
}
