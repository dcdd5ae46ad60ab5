use std::time::{Duration, Instant};

use egui::{ColorImage, Pos2, Rect, Vec2};
use itertools::Itertools as _;

mod auto_scroll;
mod callbacks;
mod debug;
mod drag_visual;
mod error;
mod gap;
mod grid_math;
mod host;
mod layout;
mod options;
mod press;
mod registry;
mod session;
mod thumbnail;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod pointer_tests;

pub use auto_scroll::{AutoScrollPolicy, EdgeAutoScroll};
pub use callbacks::{ReorderCallbacks, ReorderEvent};
pub use drag_visual::DragVisual;
pub use error::ReorderGridError;
pub use grid_math::{GridCoordinate, relative_displacement, to_coordinate};
pub use host::{CancellableTask, GridHost, GridItem, ItemHandle};
pub use layout::{GridGeometry, LayoutStrategy, UniformGridGeometry};
pub use options::ReorderGridOptions;
pub use press::PointerEvent;
pub use registry::{ItemRegistry, RegisteredItem};
pub use session::{DragOutcome, DragPhase, DragSession};
pub use thumbnail::{ThumbnailState, ThumbnailTicket};

use debug::DebugEventLog;
use layout::PositionResolver;
use press::LongPressRecognizer;
use thumbnail::ThumbnailSettle;

/// What the host should render for one mounted item.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ItemRenderState {
    /// This item is the one being dragged (render it as the empty origin slot).
    pub is_dragging: bool,

    /// Translate the item by this much to preview the pending reorder.
    pub gap_offset: Vec2,

    /// The same displacement in grid cells, for hosts that animate per cell.
    pub cell_shift: GridCoordinate,
}

/// Long-press drag-to-reorder for a grid of items.
///
/// The host registers its mounted cells, feeds pointer input, and renders each cell with its
/// [`ItemRenderState`]. While a drag is in flight the engine keeps a single open gap between the
/// drag origin and the slot under the pointer; releasing reports `(from, to)` through
/// [`ReorderCallbacks::on_reorder`]. Applying the new order to the data is up to the host.
///
/// Everything runs on the UI thread. At most one drag is in flight per engine.
pub struct ReorderGrid {
    pub options: ReorderGridOptions,

    columns: usize,
    item_count: usize,
    layout: LayoutStrategy,
    registry: ItemRegistry,

    callbacks: ReorderCallbacks,
    auto_scroll_policy: Box<dyn AutoScrollPolicy>,

    press: LongPressRecognizer,
    session: Option<DragSession>,
    next_session_id: u64,
    last_outcome: Option<DragOutcome>,

    debug_log: DebugEventLog,
}

impl ReorderGrid {
    /// # Errors
    /// [`ReorderGridError::InvalidColumnCount`] if `columns == 0`.
    pub fn new(
        columns: usize,
        item_count: usize,
        layout: LayoutStrategy,
    ) -> Result<Self, ReorderGridError> {
        Self::new_with_options(columns, item_count, layout, ReorderGridOptions::default())
    }

    /// # Errors
    /// [`ReorderGridError::InvalidColumnCount`] if `columns == 0`.
    pub fn new_with_options(
        columns: usize,
        item_count: usize,
        layout: LayoutStrategy,
        options: ReorderGridOptions,
    ) -> Result<Self, ReorderGridError> {
        if columns == 0 {
            return Err(ReorderGridError::InvalidColumnCount { columns });
        }
        Ok(Self {
            options,
            columns,
            item_count,
            layout,
            registry: ItemRegistry::default(),
            callbacks: ReorderCallbacks::default(),
            auto_scroll_policy: Box::new(EdgeAutoScroll::default()),
            press: LongPressRecognizer::default(),
            session: None,
            next_session_id: 1,
            last_outcome: None,
            debug_log: DebugEventLog::default(),
        })
    }

    #[must_use]
    pub fn with_callbacks(mut self, callbacks: ReorderCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    #[must_use]
    pub fn with_auto_scroll_policy(mut self, policy: impl AutoScrollPolicy + 'static) -> Self {
        self.auto_scroll_policy = Box::new(policy);
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn layout(&self) -> &LayoutStrategy {
        &self.layout
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    /// Update the logical number of items.
    ///
    /// A drag whose origin no longer exists is cancelled; a drop target past the end is pulled
    /// back onto the last item.
    pub fn set_item_count(&mut self, item_count: usize, host: &mut dyn GridHost) {
        self.item_count = item_count;
        let Some(session) = &mut self.session else {
            return;
        };

        if session.drag_index >= item_count {
            log::warn!(
                "item count shrank to {item_count} under the dragged index {}; cancelling the drag",
                session.drag_index
            );
            self.cancel_drag(host);
        } else if session.drop_index >= item_count {
            session.drop_index = item_count - 1;
            self.refresh_gaps(host);
        }
    }

    // ------------------------------------------------------------------------------------
    // Registry

    /// A cell was mounted at `index`.
    ///
    /// If it is the dragged item coming back into view, it is flagged as dragging right away.
    pub fn register_item(&mut self, index: usize, handle: ItemHandle, host: &mut dyn GridHost) {
        let is_drag_origin = self
            .session
            .as_ref()
            .is_some_and(|session| session.drag_index == index);

        let item = self.registry.insert(index, handle);
        if is_drag_origin {
            item.is_dragging = true;
            host.request_repaint(index);
        }

        if self.session.is_some() {
            self.refresh_gaps(host);
        }
    }

    /// The cell `handle` at `index` was unmounted.
    ///
    /// Ignored if `index` has meanwhile been taken over by another cell.
    pub fn unregister_item(&mut self, index: usize, handle: &ItemHandle, host: &mut dyn GridHost) {
        if !self.registry.remove_if_same(index, handle) {
            return;
        }
        if self.session.is_some() {
            self.refresh_gaps(host);
        }
    }

    // ------------------------------------------------------------------------------------
    // Queries

    pub fn phase(&self) -> DragPhase {
        self.session
            .as_ref()
            .map_or(DragPhase::Idle, DragSession::phase)
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn drag_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.drag_index)
    }

    pub fn drop_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.drop_index)
    }

    /// How the most recent drag finished.
    pub fn last_outcome(&self) -> Option<DragOutcome> {
        self.last_outcome
    }

    fn resolver(&self) -> PositionResolver<'_> {
        PositionResolver {
            layout: &self.layout,
            registry: &self.registry,
            item_count: self.item_count,
        }
    }

    /// Container-local position of `index`, or zero if it cannot be resolved.
    pub fn position_of(&self, index: usize) -> Vec2 {
        self.resolver().position_of(index)
    }

    /// Position of the item `delta` slots away from `index`, clamped to the item range.
    pub fn position_offset_by(&self, index: usize, delta: isize) -> Vec2 {
        self.resolver().position_offset_by(index, delta)
    }

    /// Displacement `index` should currently render with, computed from the live session.
    pub fn gap_offset(&self, index: usize) -> Vec2 {
        match &self.session {
            Some(session) => gap::gap_offset(
                &self.resolver(),
                session.drag_index,
                session.drop_index,
                index,
            ),
            None => Vec2::ZERO,
        }
    }

    /// Render state of a mounted item, `None` if nothing is registered at `index`.
    pub fn item_state(&self, index: usize) -> Option<ItemRenderState> {
        let item = self.registry.get(index)?;
        let cell_shift = match &self.session {
            Some(session) if item.gap_offset != Vec2::ZERO => {
                gap::gap_neighbor(session.drag_index, session.drop_index, index)
                    .and_then(|neighbor| relative_displacement(index, neighbor, self.columns).ok())
                    .unwrap_or_default()
            }
            _ => GridCoordinate::ZERO,
        };
        Some(ItemRenderState {
            is_dragging: item.is_dragging,
            gap_offset: item.gap_offset,
            cell_shift,
        })
    }

    /// Where to draw the dragged item, `None` when no drag is in flight.
    pub fn drag_visual(&self, host: &dyn GridHost) -> Option<DragVisual> {
        let session = self.session.as_ref()?;
        let bounds = if self.options.restrict_drag_scope {
            let container = host.container_rect();
            Rect::from_two_pos(
                host.local_to_global(container.min),
                host.local_to_global(container.max),
            )
        } else {
            host.screen_rect()
        };
        Some(DragVisual {
            rect: drag_visual::place_within(session.pointer_center, session.item_size, bounds),
            thumbnail: session.thumbnail().cloned(),
        })
    }

    // ------------------------------------------------------------------------------------
    // Pointer input

    /// Feed one pointer event. `now` drives long-press recognition.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant, host: &mut dyn GridHost) {
        match event {
            PointerEvent::Down { pos } => {
                if self.session.is_some() {
                    return;
                }
                match hit_test::item_under_pointer(&self.registry, host, pos, self.item_count) {
                    Some(index) => self.press.down(index, pos, now),
                    None => self.press.reset(),
                }
                self.poll(now, host);
            }
            PointerEvent::Move { pos } => {
                self.poll(now, host);
                if self.session.is_some() {
                    self.update_drag(pos, host);
                } else {
                    self.press.moved(pos, self.options.press_slop);
                }
            }
            PointerEvent::Up { pos } => {
                self.poll(now, host);
                if self.session.is_some() {
                    self.update_drag(pos, host);
                    self.end_drag(host);
                } else {
                    self.press.reset();
                }
            }
            PointerEvent::Cancel => {
                self.press.reset();
                self.cancel_drag(host);
            }
        }
    }

    /// Promote a held press into a drag once `drag_start_delay` has elapsed.
    ///
    /// Call this every frame while [`Self::is_press_pending`] is true; pointer events call it too.
    pub fn poll(&mut self, now: Instant, host: &mut dyn GridHost) {
        if self.session.is_some() {
            return;
        }
        if let Some(press) = self
            .press
            .take_if_elapsed(now, self.options.drag_start_delay)
        {
            log::debug!(
                "long-press on {} at {:?} (now {:?})",
                press.index,
                press.origin,
                press.latest
            );
            self.start_drag(press.index, press.latest, host);
        }
    }

    pub fn is_press_pending(&self) -> bool {
        self.press.is_pending()
    }

    // ------------------------------------------------------------------------------------
    // Drag lifecycle

    /// Container-local rect of `index`: its rendered bounds, or the analytic ones.
    fn item_rect(&self, index: usize) -> Option<Rect> {
        self.registry
            .get(index)
            .and_then(|item| item.rect())
            .or_else(|| match &self.layout {
                LayoutStrategy::VirtualizedGrid(geometry) => {
                    Some(geometry.child_rect(geometry.corrected_index(index)))
                }
                LayoutStrategy::DirectBox => None,
            })
    }

    /// Start dragging `index` with the pointer at `pointer_global`.
    ///
    /// A drag already in flight is cancelled first (fully reset, no reorder reported).
    pub fn start_drag(&mut self, index: usize, pointer_global: Pos2, host: &mut dyn GridHost) {
        if index >= self.item_count {
            log::warn!(
                "ignoring drag start on index {index}: only {} items",
                self.item_count
            );
            return;
        }

        if let Some(previous) = &self.session {
            let (previous_id, previous_index) = (previous.id, previous.drag_index);
            log::warn!(
                "drag of index {index} started while index {previous_index} is still being dragged; cancelling the previous drag"
            );
            self.debug_log_event(format!(
                "session OVERLAP id={previous_id} index={previous_index} -> new index={index}"
            ));
            self.cancel_drag(host);
        }
        self.press.reset();

        let (center, item_size) = match self.item_rect(index) {
            Some(rect) => (host.local_to_global(rect.center()), rect.size()),
            None => (pointer_global, Vec2::ZERO),
        };

        let id = self.next_session_id.max(1);
        self.next_session_id = id.saturating_add(1);
        let mut session = DragSession::new(id, index, pointer_global, center, item_size);

        if let Some(item) = self.registry.get_mut(index) {
            item.is_dragging = true;
            host.request_repaint(index);
        }

        self.debug_log_event(format!("session START id={id} index={index}"));
        self.callbacks.drag_started(index);

        if self.options.use_screenshot_thumbnail {
            let ticket = ThumbnailTicket {
                session_id: id,
                index,
            };
            session.thumbnail = ThumbnailState::Pending(ticket);
            host.request_thumbnail(index, ticket);
        }

        self.session = Some(session);
        self.update_auto_scroll(host);
    }

    /// The drag pointer moved to `pointer_global`.
    pub fn update_drag(&mut self, pointer_global: Pos2, host: &mut dyn GridHost) {
        let Some(session) = &mut self.session else {
            return;
        };
        let delta = session.follow_pointer(pointer_global);
        self.callbacks
            .drag_updated(session.drag_index, pointer_global, delta);

        self.retarget(host);
        self.update_auto_scroll(host);
    }

    /// Release: report `(drag_index, drop_index)` and reset.
    ///
    /// The reorder is reported even if the item was dropped where it started.
    pub fn end_drag(&mut self, host: &mut dyn GridHost) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        let event = ReorderEvent {
            from: session.drag_index,
            to: session.drop_index,
        };
        self.callbacks.reordered(event);

        self.debug_log_event(format!(
            "session END id={} from={} to={}",
            session.id, event.from, event.to
        ));
        self.reset_after(&mut session, host);
        self.last_outcome = Some(DragOutcome::Committed {
            from: event.from,
            to: event.to,
        });
    }

    /// Abort the drag without reporting a reorder. Does nothing if no drag is in flight.
    pub fn cancel_drag(&mut self, host: &mut dyn GridHost) {
        self.press.reset();
        let Some(mut session) = self.session.take() else {
            return;
        };
        self.debug_log_event(format!(
            "session CANCEL id={} index={}",
            session.id, session.drag_index
        ));
        let index = session.drag_index;
        self.reset_after(&mut session, host);
        self.last_outcome = Some(DragOutcome::Cancelled { index });
    }

    /// Undo every visual side effect of `session`.
    fn reset_after(&mut self, session: &mut DragSession, host: &mut dyn GridHost) {
        if session.stop_auto_scroll() {
            self.debug_log_event("auto-scroll OFF (drag finished)");
        }

        let dragging = self.registry.clear_dragging();
        let gaps = self.registry.reset_all_gaps();
        for index in dragging.into_iter().chain(gaps).unique() {
            host.request_repaint(index);
        }

        host.release_pointer();
        self.press.reset();
    }

    /// Re-run the hit test; on a new drop index, recompute every gap.
    fn retarget(&mut self, host: &mut dyn GridHost) {
        let Some(session) = &self.session else {
            return;
        };
        let drop_index = hit_test::resolve_drop_index(
            &self.registry,
            host,
            session.pointer_center,
            self.item_count,
            session.drop_index,
        );
        if drop_index == session.drop_index {
            return;
        }

        let id = session.id;
        if let Some(session) = &mut self.session {
            session.drop_index = drop_index;
        }
        self.debug_log_event(format!("drop index id={id} -> {drop_index}"));
        self.refresh_gaps(host);
    }

    /// Write the current gap offset into every registered item, repainting those that changed.
    fn refresh_gaps(&mut self, host: &mut dyn GridHost) {
        let Some(session) = &self.session else {
            return;
        };
        let (drag_index, drop_index) = (session.drag_index, session.drop_index);
        let resolver = self.resolver();
        let offsets: Vec<(usize, Vec2)> = self
            .registry
            .indices()
            .iter()
            .map(|&index| {
                (
                    index,
                    gap::gap_offset(&resolver, drag_index, drop_index, index),
                )
            })
            .collect();

        for (index, offset) in offsets {
            if let Some(item) = self.registry.get_mut(index)
                && item.gap_offset != offset
            {
                item.gap_offset = offset;
                host.request_repaint(index);
            }
        }
    }

    // ------------------------------------------------------------------------------------
    // Thumbnail

    /// The host finished rasterizing for `ticket`. `None` (or an empty image) means it failed.
    ///
    /// Results for a drag that has already ended, or been replaced, are discarded.
    pub fn complete_thumbnail(
        &mut self,
        ticket: ThumbnailTicket,
        image: Option<ColorImage>,
        host: &mut dyn GridHost,
    ) {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|session| session.id == ticket.session_id)
        else {
            log::debug!(
                "discarding thumbnail of index {} from finished drag session {}",
                ticket.index,
                ticket.session_id
            );
            self.debug_log_event(format!("thumbnail STALE id={}", ticket.session_id));
            return;
        };

        match session.thumbnail.settle(ticket, image) {
            ThumbnailSettle::Applied => {
                self.debug_log_event(format!("thumbnail READY id={}", ticket.session_id));
                host.request_repaint(ticket.index);
            }
            ThumbnailSettle::Failed => {
                log::debug!(
                    "thumbnail of index {} produced no image; dragging without it",
                    ticket.index
                );
                self.debug_log_event(format!("thumbnail FAILED id={}", ticket.session_id));
                host.request_repaint(ticket.index);
            }
            ThumbnailSettle::Stale => {
                self.debug_log_event(format!("thumbnail STALE id={}", ticket.session_id));
            }
        }
    }

    // ------------------------------------------------------------------------------------
    // Auto-scroll

    /// Start or stop the recurring auto-scroll task depending on the pointer's edge proximity.
    fn update_auto_scroll(&mut self, host: &mut dyn GridHost) {
        let Some(session) = &self.session else {
            return;
        };
        let pointer_local = host.global_to_local(session.last_pointer);
        let velocity = self
            .auto_scroll_policy
            .velocity(pointer_local, host.container_rect());
        let wants_scroll = velocity != Vec2::ZERO;
        let is_scrolling = session.is_auto_scrolling();

        if wants_scroll && !is_scrolling {
            let task = host.schedule_recurring(self.options.auto_scroll_interval);
            if let Some(session) = &mut self.session {
                session.auto_scroll = Some(task);
            }
            self.debug_log_event("auto-scroll ON");
        } else if !wants_scroll && is_scrolling {
            if let Some(session) = &mut self.session {
                session.stop_auto_scroll();
            }
            self.debug_log_event("auto-scroll OFF");
        }
    }

    /// One tick of the recurring auto-scroll task, `dt` after the previous one.
    pub fn auto_scroll_tick(&mut self, dt: Duration, host: &mut dyn GridHost) {
        let Some(session) = &self.session else {
            return;
        };
        if !session.is_auto_scrolling() {
            // A tick that was already queued when the task got cancelled.
            return;
        }

        let pointer_local = host.global_to_local(session.last_pointer);
        let velocity = self
            .auto_scroll_policy
            .velocity(pointer_local, host.container_rect());
        if velocity == Vec2::ZERO {
            self.update_auto_scroll(host);
            return;
        }

        host.scroll_by(velocity * dt.as_secs_f32());
        self.retarget(host);
    }

    // ------------------------------------------------------------------------------------
    // Debug log

    fn debug_log_event(&mut self, message: impl Into<String>) {
        if !self.options.debug_event_log {
            return;
        }
        self.debug_log
            .push(self.options.debug_event_log_capacity, message.into());
    }

    /// The recorded lifecycle events, one per line (empty unless `options.debug_event_log`).
    pub fn debug_log_text(&self) -> String {
        self.debug_log.text()
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }
}

impl std::fmt::Debug for ReorderGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReorderGrid")
            .field("options", &self.options)
            .field("columns", &self.columns)
            .field("item_count", &self.item_count)
            .field("layout", &self.layout)
            .field("registry", &self.registry)
            .field("session", &self.session)
            .field("last_outcome", &self.last_outcome)
            .finish_non_exhaustive()
    }
}
