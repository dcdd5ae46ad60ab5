use std::sync::Arc;

use egui::{ColorImage, Pos2, Vec2};

use super::host::CancellableTask;
use super::thumbnail::ThumbnailState;

/// Where the engine is in the drag lifecycle.
///
/// A drag runs `Idle -> Starting -> Active` and finishes as a [`DragOutcome`]; after the
/// finishing reset the engine is `Idle` again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,

    /// The drag has started and its thumbnail is still being rasterized.
    ///
    /// Pointer moves are processed as usual; the visual uses a placeholder.
    Starting,

    Active,
}

/// How the most recent drag finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released: the host was told to move `from` to `to`.
    Committed { from: usize, to: usize },

    /// Cancelled (by the system, by the host, or by a newer drag). No reorder was reported.
    Cancelled { index: usize },
}

/// One in-flight drag.
pub struct DragSession {
    pub(super) id: u64,
    pub(super) drag_index: usize,
    pub(super) drop_index: usize,

    /// Global position of the drag visual's center.
    pub(super) pointer_center: Pos2,

    /// Latest raw pointer position, for deltas and edge proximity.
    pub(super) last_pointer: Pos2,

    /// Size of the dragged item when the drag started.
    pub(super) item_size: Vec2,

    pub(super) thumbnail: ThumbnailState,
    pub(super) auto_scroll: Option<Box<dyn CancellableTask>>,
}

impl DragSession {
    pub(super) fn new(
        id: u64,
        drag_index: usize,
        pointer: Pos2,
        center: Pos2,
        item_size: Vec2,
    ) -> Self {
        Self {
            id,
            drag_index,
            drop_index: drag_index,
            pointer_center: center,
            last_pointer: pointer,
            item_size,
            thumbnail: ThumbnailState::NotRequested,
            auto_scroll: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn drag_index(&self) -> usize {
        self.drag_index
    }

    pub fn drop_index(&self) -> usize {
        self.drop_index
    }

    pub fn pointer_center(&self) -> Pos2 {
        self.pointer_center
    }

    pub fn thumbnail(&self) -> Option<&Arc<ColorImage>> {
        self.thumbnail.image()
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.auto_scroll.is_some()
    }

    pub fn phase(&self) -> DragPhase {
        if self.thumbnail.is_pending() {
            DragPhase::Starting
        } else {
            DragPhase::Active
        }
    }

    /// Move the drag to a new raw pointer position. Returns the movement delta.
    pub(super) fn follow_pointer(&mut self, pointer: Pos2) -> Vec2 {
        let delta = pointer - self.last_pointer;
        self.last_pointer = pointer;
        self.pointer_center += delta;
        delta
    }

    /// Stop auto-scrolling, if it was running. Returns whether a task was cancelled.
    pub(super) fn stop_auto_scroll(&mut self) -> bool {
        match self.auto_scroll.take() {
            Some(mut task) => {
                task.cancel();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for DragSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragSession")
            .field("id", &self.id)
            .field("drag_index", &self.drag_index)
            .field("drop_index", &self.drop_index)
            .field("pointer_center", &self.pointer_center)
            .field("thumbnail", &self.thumbnail)
            .field("auto_scroll", &self.auto_scroll.is_some())
            .finish()
    }
}
