//! Long-press drag-to-reorder for egui grids.
//!
//! [`ReorderGrid`] tracks the mounted cells of a grid, turns a held press into a drag,
//! previews the pending move by sliding the cells between the origin and the slot under the
//! pointer, and reports `(from, to)` on release. The host toolkit supplies layout, scrolling
//! and timers through [`GridHost`].

#![forbid(unsafe_code)]

pub mod reorder_grid;

pub use reorder_grid::{
    AutoScrollPolicy, CancellableTask, DragOutcome, DragPhase, DragSession, DragVisual,
    EdgeAutoScroll, GridCoordinate, GridGeometry, GridHost, GridItem, ItemHandle,
    ItemRenderState, LayoutStrategy, PointerEvent, ReorderCallbacks, ReorderEvent, ReorderGrid,
    ReorderGridError, ReorderGridOptions, ThumbnailState, ThumbnailTicket, UniformGridGeometry,
    relative_displacement, to_coordinate,
};
