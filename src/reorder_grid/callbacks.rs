use std::rc::Rc;

use egui::{Pos2, Vec2};

/// A committed reorder: the item at `from` should end up at `to`.
///
/// Reported even when `from == to`; treating that as a no-op is up to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReorderEvent {
    pub from: usize,
    pub to: usize,
}

type DragStartFn = Rc<dyn Fn(usize)>;
type DragUpdateFn = Rc<dyn Fn(usize, Pos2, Vec2)>;
type ReorderFn = Rc<dyn Fn(ReorderEvent)>;

/// Notification hooks invoked at drag lifecycle points.
#[derive(Clone, Default)]
pub struct ReorderCallbacks {
    on_drag_start: Option<DragStartFn>,
    on_drag_update: Option<DragUpdateFn>,
    on_reorder: Option<ReorderFn>,
}

impl ReorderCallbacks {
    /// Called with the dragged index once a long-press turned into a drag.
    #[must_use]
    pub fn on_drag_start(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_drag_start = Some(Rc::new(f));
        self
    }

    /// Called on every pointer move during a drag with the dragged index, the global pointer
    /// position and the movement since the previous update.
    #[must_use]
    pub fn on_drag_update(mut self, f: impl Fn(usize, Pos2, Vec2) + 'static) -> Self {
        self.on_drag_update = Some(Rc::new(f));
        self
    }

    /// Called when a drag is released.
    #[must_use]
    pub fn on_reorder(mut self, f: impl Fn(ReorderEvent) + 'static) -> Self {
        self.on_reorder = Some(Rc::new(f));
        self
    }

    pub(super) fn drag_started(&self, index: usize) {
        if let Some(f) = &self.on_drag_start {
            f(index);
        }
    }

    pub(super) fn drag_updated(&self, index: usize, position: Pos2, delta: Vec2) {
        if let Some(f) = &self.on_drag_update {
            f(index, position, delta);
        }
    }

    pub(super) fn reordered(&self, event: ReorderEvent) {
        if let Some(f) = &self.on_reorder {
            f(event);
        }
    }
}

impl std::fmt::Debug for ReorderCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReorderCallbacks")
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag_update", &self.on_drag_update.is_some())
            .field("on_reorder", &self.on_reorder.is_some())
            .finish()
    }
}
