use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use egui::{Pos2, Rect, Vec2, vec2};

use super::host::{CancellableTask, GridHost, ItemHandle};
use super::registry::ItemRegistry;
use super::thumbnail::ThumbnailTicket;

pub(super) const CELL: f32 = 100.0;

/// A cell whose container-local rect tracks a shared scroll offset.
pub(super) struct FakeCell {
    rect: Rect,
    scroll: Rc<Cell<Vec2>>,
}

impl super::host::GridItem for FakeCell {
    fn rect(&self) -> Option<Rect> {
        Some(self.rect.translate(-self.scroll.get()))
    }
}

/// `CELL`-sized cell at row-major position `index` of a `columns`-wide grid.
pub(super) fn grid_cell(index: usize, columns: usize, scroll: &Rc<Cell<Vec2>>) -> ItemHandle {
    let min = Pos2::new(
        (index % columns) as f32 * CELL,
        (index / columns) as f32 * CELL,
    );
    Rc::new(FakeCell {
        rect: Rect::from_min_size(min, vec2(CELL, CELL)),
        scroll: Rc::clone(scroll),
    })
}

/// Six cells, three columns, registered in index order.
pub(super) fn six_cell_registry() -> ItemRegistry {
    let scroll = Rc::new(Cell::new(Vec2::ZERO));
    let mut registry = ItemRegistry::default();
    for index in 0..6 {
        registry.insert(index, grid_cell(index, 3, &scroll));
    }
    registry
}

pub(super) struct FakeTask {
    cancelled: Rc<Cell<bool>>,
}

impl CancellableTask for FakeTask {
    fn cancel(&mut self) {
        self.cancelled.set(true);
    }
}

/// Records everything the engine asks of its host.
#[derive(Default)]
pub(super) struct FakeHost {
    /// Global position of the container's top-left corner.
    pub(super) origin: Pos2,
    pub(super) container_size: Option<Vec2>,
    /// Scroll offset shared with the cells built by [`Self::cell`].
    pub(super) scroll: Rc<Cell<Vec2>>,
    pub(super) thumbnail_requests: Vec<ThumbnailTicket>,
    pub(super) scheduled: Vec<(Duration, Rc<Cell<bool>>)>,
    pub(super) repaints: Vec<usize>,
    pub(super) pointer_releases: usize,
}

impl FakeHost {
    pub(super) fn with_origin(origin: Pos2) -> Self {
        Self {
            origin,
            ..Default::default()
        }
    }

    pub(super) fn cell(&self, index: usize, columns: usize) -> ItemHandle {
        grid_cell(index, columns, &self.scroll)
    }

    /// Number of auto-scroll tasks still running.
    pub(super) fn running_tasks(&self) -> usize {
        self.scheduled
            .iter()
            .filter(|(_, cancelled)| !cancelled.get())
            .count()
    }

    pub(super) fn take_repaints(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.repaints)
    }
}

impl GridHost for FakeHost {
    fn global_to_local(&self, point: Pos2) -> Pos2 {
        point - self.origin.to_vec2()
    }

    fn local_to_global(&self, point: Pos2) -> Pos2 {
        point + self.origin.to_vec2()
    }

    fn container_rect(&self) -> Rect {
        Rect::from_min_size(
            Pos2::ZERO,
            self.container_size.unwrap_or(vec2(3.0 * CELL, 4.0 * CELL)),
        )
    }

    fn screen_rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(1920.0, 1080.0))
    }

    fn scroll_by(&mut self, delta: Vec2) {
        self.scroll.set(self.scroll.get() + delta);
    }

    fn request_thumbnail(&mut self, _index: usize, ticket: ThumbnailTicket) {
        self.thumbnail_requests.push(ticket);
    }

    fn schedule_recurring(&mut self, interval: Duration) -> Box<dyn CancellableTask> {
        let cancelled = Rc::new(Cell::new(false));
        self.scheduled.push((interval, Rc::clone(&cancelled)));
        Box::new(FakeTask { cancelled })
    }

    fn request_repaint(&mut self, index: usize) {
        self.repaints.push(index);
    }

    fn release_pointer(&mut self) {
        self.pointer_releases += 1;
    }
}

/// Seeded LCG: deterministic, fast, no dependency.
#[derive(Clone)]
pub(super) struct Rng(u64);

impl Rng {
    pub(super) fn new(seed: u64) -> Self {
        Self(seed ^ 0x9E37_79B9_7F4A_7C15)
    }

    pub(super) fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0
    }

    pub(super) fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        ((self.next_u64() >> 33) as usize) % upper
    }

    pub(super) fn next_f32(&mut self, lo: f32, hi: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        lo + unit * (hi - lo)
    }
}
