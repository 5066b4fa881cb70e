use crate::core::Viewport;
use crate::platform::{ContainerId, FrameHandle, Host, ObserverHandle};

/// Observes the container size and coalesces notifications so at most one
/// resize is applied per animation frame.
#[derive(Debug, Default)]
pub struct ResponsiveManager {
    observer: Option<ObserverHandle>,
    frame: Option<FrameHandle>,
    pending: Option<Viewport>,
}

impl ResponsiveManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    /// Starts observing `container`. Returns `true` when a new observer was
    /// connected.
    pub fn observe<H: Host + ?Sized>(&mut self, host: &mut H, container: ContainerId) -> bool {
        if self.observer.is_some() {
            return false;
        }
        self.observer = Some(host.observe_resize(container));
        true
    }

    /// Records the latest observed size. A frame is requested only when none
    /// is outstanding; later notifications overwrite the pending size.
    pub fn notify<H: Host + ?Sized>(&mut self, host: &mut H, size: Viewport) {
        if self.observer.is_none() {
            return;
        }
        self.pending = Some(size);
        if self.frame.is_none() {
            self.frame = Some(host.request_animation_frame());
        }
    }

    #[must_use]
    pub fn owns_frame(&self, handle: FrameHandle) -> bool {
        self.frame == Some(handle)
    }

    /// Consumes the pending size when `handle` is this manager's frame.
    pub fn take_pending(&mut self, handle: FrameHandle) -> Option<Viewport> {
        if !self.owns_frame(handle) {
            return None;
        }
        self.frame = None;
        self.pending.take()
    }

    /// Cancels any scheduled frame and stops observing.
    pub fn disconnect<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(frame) = self.frame.take() {
            host.cancel_animation_frame(frame);
        }
        if let Some(observer) = self.observer.take() {
            host.disconnect_resize(observer);
        }
        self.pending = None;
    }
}
