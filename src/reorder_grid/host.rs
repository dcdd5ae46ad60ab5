use std::rc::Rc;
use std::time::Duration;

use egui::{Pos2, Rect, Vec2};

use super::thumbnail::ThumbnailTicket;

/// One mounted grid cell, as seen by the reorder engine.
pub trait GridItem {
    /// Current bounds in container-local coordinates, `None` until the item has been laid out.
    fn rect(&self) -> Option<Rect>;
}

/// Shared handle to a mounted cell.
///
/// Identity is the identity of the allocation: two handles refer to the same cell only if they
/// were cloned from the same `Rc`.
pub type ItemHandle = Rc<dyn GridItem>;

pub(crate) fn same_item(a: &ItemHandle, b: &ItemHandle) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl<F: Fn() -> Option<Rect>> GridItem for F {
    fn rect(&self) -> Option<Rect> {
        self()
    }
}

/// A recurring task scheduled by the host (see [`GridHost::schedule_recurring`]).
pub trait CancellableTask {
    /// Stop the task. Must be synchronous and idempotent.
    fn cancel(&mut self);
}

/// Capabilities the hosting UI toolkit provides to the engine.
///
/// The engine never lays anything out itself; it only asks.
pub trait GridHost {
    /// Convert a global (screen) point into the grid container's local space.
    fn global_to_local(&self, point: Pos2) -> Pos2;

    /// Convert a container-local point into global (screen) space.
    fn local_to_global(&self, point: Pos2) -> Pos2;

    /// Visible part of the grid container, in container-local coordinates.
    fn container_rect(&self) -> Rect;

    /// The whole screen (or root window), in global coordinates.
    fn screen_rect(&self) -> Rect;

    /// Nudge the container's scroll offset.
    fn scroll_by(&mut self, delta: Vec2);

    /// Start rasterizing the item at `index`.
    ///
    /// The host reports the result later through [`super::ReorderGrid::complete_thumbnail`],
    /// passing back the same `ticket`.
    fn request_thumbnail(&mut self, index: usize, ticket: ThumbnailTicket);

    /// Schedule a recurring tick every `interval`.
    ///
    /// On each tick the host calls [`super::ReorderGrid::auto_scroll_tick`].
    fn schedule_recurring(&mut self, interval: Duration) -> Box<dyn CancellableTask>;

    /// The render state of the item at `index` changed.
    fn request_repaint(&mut self, index: usize);

    /// Drop any pointer capture held on behalf of the drag.
    fn release_pointer(&mut self);
}
