//! Visibility gate: defers the real fetch until the element nears the viewport.
//!
//! Wraps a host intersection primitive. The gate fires at most once per
//! attach lifetime; after firing it unsubscribes, and later visibility
//! changes are ignored.

/// One intersection record delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub is_intersecting: bool,
}

/// Host viewport-intersection primitive.
pub trait IntersectionObserver {
    /// Start delivering entries for the component. Any overlap with the
    /// viewport counts as intersecting.
    fn observe(&mut self);

    /// Stop delivering entries.
    fn unobserve(&mut self);
}

/// Observer for static rendering, where nothing ever scrolls into view.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl IntersectionObserver for NoopObserver {
    fn observe(&mut self) {}
    fn unobserve(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Idle,
    Watching,
    Closed,
}

pub struct VisibilityGate {
    observer: Box<dyn IntersectionObserver>,
    state: GateState,
    is_intersecting: bool,
}

impl std::fmt::Debug for VisibilityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityGate")
            .field("state", &self.state)
            .field("is_intersecting", &self.is_intersecting)
            .finish_non_exhaustive()
    }
}

impl VisibilityGate {
    pub fn new(observer: Box<dyn IntersectionObserver>) -> Self {
        Self {
            observer,
            state: GateState::Idle,
            is_intersecting: false,
        }
    }

    /// Subscribe to the primitive. No-op unless idle.
    pub fn observe(&mut self) {
        if self.state == GateState::Idle {
            self.observer.observe();
            self.state = GateState::Watching;
        }
    }

    /// Feed a batch of entries. Returns `true` exactly once: the first time
    /// the leading entry reports visibility while the gate is watching.
    pub fn on_entries(&mut self, entries: &[IntersectionEntry]) -> bool {
        if self.state != GateState::Watching {
            return false;
        }
        if !entries.first().is_some_and(|entry| entry.is_intersecting) {
            return false;
        }
        self.is_intersecting = true;
        self.close();
        tracing::debug!("visibility gate fired");
        true
    }

    /// Unsubscribe for good. Used after firing and when the controller is
    /// advanced without waiting for visibility.
    pub fn close(&mut self) {
        if self.state == GateState::Watching {
            self.observer.unobserve();
        }
        self.state = GateState::Closed;
    }

    /// Detach from the document. A later [`observe`](Self::observe)
    /// subscribes again.
    pub fn disconnect(&mut self) {
        if self.state == GateState::Watching {
            self.observer.unobserve();
        }
        self.state = GateState::Idle;
    }

    /// Latched: once true, stays true.
    pub fn is_intersecting(&self) -> bool {
        self.is_intersecting
    }

    pub fn is_watching(&self) -> bool {
        self.state == GateState::Watching
    }
}
