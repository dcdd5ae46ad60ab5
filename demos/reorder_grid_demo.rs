#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use egui_reorder_grid::{
    CancellableTask, DragPhase, GridHost, ItemHandle, LayoutStrategy, PointerEvent,
    ReorderCallbacks, ReorderEvent, ReorderGrid, ReorderGridOptions, ThumbnailTicket,
};

const COLUMNS: usize = 4;
const TILE_COUNT: usize = 30;
const TILE: f32 = 96.0;
const SPACING: f32 = 8.0;

#[derive(Clone, Copy, Debug)]
struct Tile {
    label: usize,
    color: egui::Color32,
}

/// Frame-driven stand-in for a timer: the app ticks auto-scroll while the flag is set.
struct FlagTask(Rc<Cell<bool>>);

impl CancellableTask for FlagTask {
    fn cancel(&mut self) {
        self.0.set(false);
    }
}

struct DemoHost {
    /// Visible part of the scroll area, in screen space.
    container: egui::Rect,
    screen: egui::Rect,
    pending_scroll: egui::Vec2,
    auto_scroll: Rc<Cell<bool>>,
    thumbnail_requests: Vec<(usize, ThumbnailTicket)>,
    needs_repaint: bool,
}

impl Default for DemoHost {
    fn default() -> Self {
        Self {
            container: egui::Rect::ZERO,
            screen: egui::Rect::ZERO,
            pending_scroll: Default::default(),
            auto_scroll: Default::default(),
            thumbnail_requests: Default::default(),
            needs_repaint: Default::default(),
        }
    }
}

impl GridHost for DemoHost {
    fn global_to_local(&self, point: egui::Pos2) -> egui::Pos2 {
        point - self.container.min.to_vec2()
    }

    fn local_to_global(&self, point: egui::Pos2) -> egui::Pos2 {
        point + self.container.min.to_vec2()
    }

    fn container_rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, self.container.size())
    }

    fn screen_rect(&self) -> egui::Rect {
        self.screen
    }

    fn scroll_by(&mut self, delta: egui::Vec2) {
        self.pending_scroll += delta;
    }

    fn request_thumbnail(&mut self, index: usize, ticket: ThumbnailTicket) {
        self.thumbnail_requests.push((index, ticket));
    }

    fn schedule_recurring(&mut self, _interval: Duration) -> Box<dyn CancellableTask> {
        let flag = Rc::new(Cell::new(true));
        self.auto_scroll = Rc::clone(&flag);
        Box::new(FlagTask(flag))
    }

    fn request_repaint(&mut self, _index: usize) {
        self.needs_repaint = true;
    }

    fn release_pointer(&mut self) {
        // egui has no explicit pointer capture.
    }
}

struct App {
    tiles: Vec<Tile>,
    /// Last laid-out rect of each slot, container-local. Shared with the registered handles.
    slots: Vec<Rc<Cell<Option<egui::Rect>>>>,
    grid: ReorderGrid,
    host: DemoHost,
    reorders: Rc<RefCell<Vec<ReorderEvent>>>,
    scroll_offset: f32,
    /// Thumbnails waiting for the next viewport screenshot, with the tile's screen rect.
    pending_screenshots: Vec<(ThumbnailTicket, egui::Rect)>,
    thumbnail_texture: Option<(u64, egui::TextureHandle)>,
}

impl App {
    fn new() -> Self {
        let tiles: Vec<Tile> = (0..TILE_COUNT)
            .map(|label| Tile {
                label,
                color: egui::epaint::Hsva::new(label as f32 / TILE_COUNT as f32, 0.55, 0.75, 1.0)
                    .into(),
            })
            .collect();

        let reorders = Rc::new(RefCell::new(Vec::new()));
        let callbacks = ReorderCallbacks::default()
            .on_drag_start(|index| log::info!("drag start {index}"))
            .on_reorder({
                let reorders = Rc::clone(&reorders);
                move |event| reorders.borrow_mut().push(event)
            });
        let options = ReorderGridOptions {
            use_screenshot_thumbnail: true,
            debug_event_log: true,
            ..Default::default()
        };
        let mut grid =
            ReorderGrid::new_with_options(COLUMNS, tiles.len(), LayoutStrategy::DirectBox, options)
                .expect("COLUMNS is non-zero")
                .with_callbacks(callbacks);

        let mut host = DemoHost::default();
        let mut slots = Vec::with_capacity(tiles.len());
        for index in 0..tiles.len() {
            let slot = Rc::new(Cell::new(None));
            let handle: ItemHandle = Rc::new({
                let slot = Rc::clone(&slot);
                move || slot.get()
            });
            grid.register_item(index, handle, &mut host);
            slots.push(slot);
        }

        Self {
            tiles,
            slots,
            grid,
            host,
            reorders,
            scroll_offset: 0.0,
            pending_screenshots: Vec::new(),
            thumbnail_texture: None,
        }
    }

    fn options_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Options");
        let options = &mut self.grid.options;
        let mut delay_ms = options.drag_start_delay.as_millis() as u64;
        ui.add(egui::Slider::new(&mut delay_ms, 0..=1500).text("long-press delay (ms)"));
        options.drag_start_delay = Duration::from_millis(delay_ms);
        ui.checkbox(&mut options.restrict_drag_scope, "Keep drag visual inside the grid");
        ui.checkbox(&mut options.use_screenshot_thumbnail, "Thumbnail");
        ui.checkbox(&mut options.debug_event_log, "Debug event log");

        ui.separator();
        ui.label(format!("Phase: {:?}", self.grid.phase()));
        ui.label(format!("Last outcome: {:?}", self.grid.last_outcome()));

        ui.separator();
        if ui.button("Clear log").clicked() {
            self.grid.debug_log_clear();
        }
        egui::ScrollArea::vertical()
            .id_salt("debug_log")
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.monospace(self.grid.debug_log_text());
            });
    }

    fn grid_ui(&mut self, ui: &mut egui::Ui) {
        let stride = TILE + SPACING;
        let rows = self.tiles.len().div_ceil(COLUMNS);
        let content = egui::vec2(COLUMNS as f32 * stride, rows as f32 * stride);
        let scroll_delta = std::mem::take(&mut self.host.pending_scroll);

        let output = egui::ScrollArea::vertical()
            .id_salt("reorder_grid")
            .vertical_scroll_offset(self.scroll_offset + scroll_delta.y)
            .show(ui, |ui| {
                self.host.container = ui.clip_rect();
                let origin = self.host.container.min.to_vec2();
                let (rect, _) = ui.allocate_exact_size(content, egui::Sense::hover());
                let painter = ui.painter();

                for (index, tile) in self.tiles.iter().enumerate() {
                    let min = rect.min
                        + egui::vec2(
                            (index % COLUMNS) as f32 * stride,
                            (index / COLUMNS) as f32 * stride,
                        );
                    let cell = egui::Rect::from_min_size(min, egui::Vec2::splat(TILE));
                    self.slots[index].set(Some(cell.translate(-origin)));

                    let state = self.grid.item_state(index).unwrap_or_default();
                    // Keep the tile visible until its screenshot has been taken.
                    if state.is_dragging && self.grid.phase() != DragPhase::Starting {
                        painter.rect_stroke(
                            cell,
                            6.0,
                            egui::Stroke::new(1.0, ui.visuals().weak_text_color()),
                            egui::StrokeKind::Inside,
                        );
                        continue;
                    }

                    let offset = egui::vec2(
                        ui.ctx().animate_value_with_time(
                            egui::Id::new(("gap_x", index)),
                            state.gap_offset.x,
                            0.12,
                        ),
                        ui.ctx().animate_value_with_time(
                            egui::Id::new(("gap_y", index)),
                            state.gap_offset.y,
                            0.12,
                        ),
                    );
                    paint_tile(painter, cell.translate(offset), tile, tile.color);
                }
            });
        self.scroll_offset = output.state.offset.y;
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let events = ctx.input(|i| {
            let mut events = Vec::new();
            if i.key_pressed(egui::Key::Escape) {
                events.push(PointerEvent::Cancel);
            }
            if let Some(pos) = i.pointer.interact_pos() {
                if i.pointer.primary_pressed() {
                    events.push(PointerEvent::Down { pos });
                } else if i.pointer.primary_released() {
                    events.push(PointerEvent::Up { pos });
                } else if i.pointer.delta() != egui::Vec2::ZERO {
                    events.push(PointerEvent::Move { pos });
                }
            }
            events
        });
        for event in events {
            self.grid.handle_pointer(event, now, &mut self.host);
        }
        self.grid.poll(now, &mut self.host);

        if self.host.auto_scroll.get() {
            let dt = ctx.input(|i| i.stable_dt);
            self.grid
                .auto_scroll_tick(Duration::from_secs_f32(dt), &mut self.host);
        }

        self.settle_thumbnails(ctx);
    }

    /// Thumbnails are cut out of a viewport screenshot, which egui delivers in a later frame.
    fn settle_thumbnails(&mut self, ctx: &egui::Context) {
        let screenshot = ctx.input(|i| {
            i.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                _ => None,
            })
        });
        if let Some(screenshot) = screenshot {
            let pixels_per_point = ctx.pixels_per_point();
            for (ticket, rect) in self.pending_screenshots.drain(..) {
                let image = screenshot.region(&rect, Some(pixels_per_point));
                self.grid.complete_thumbnail(ticket, Some(image), &mut self.host);
            }
        }

        for (index, ticket) in std::mem::take(&mut self.host.thumbnail_requests) {
            let origin = self.host.container.min.to_vec2();
            match self.slots.get(index).and_then(|slot| slot.get()) {
                Some(local) => {
                    self.pending_screenshots.push((ticket, local.translate(origin)));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(
                        egui::UserData::default(),
                    ));
                }
                None => self.grid.complete_thumbnail(ticket, None, &mut self.host),
            }
        }
    }

    fn paint_drag_visual(&mut self, ctx: &egui::Context) {
        let Some(visual) = self.grid.drag_visual(&self.host) else {
            return;
        };
        let Some(tile) = self.grid.drag_index().and_then(|index| self.tiles.get(index)) else {
            return;
        };
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Tooltip,
            egui::Id::new("reorder_grid_drag_visual"),
        ));

        let session_id = self.grid.session().map_or(0, |session| session.id());
        match &visual.thumbnail {
            Some(image) => {
                let stale = self
                    .thumbnail_texture
                    .as_ref()
                    .is_none_or(|(id, _)| *id != session_id);
                if stale {
                    let texture = ctx.load_texture(
                        "reorder_grid_thumbnail",
                        (**image).clone(),
                        egui::TextureOptions::NEAREST,
                    );
                    self.thumbnail_texture = Some((session_id, texture));
                }
                if let Some((_, texture)) = &self.thumbnail_texture {
                    painter.image(
                        texture.id(),
                        visual.rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::from_white_alpha(220),
                    );
                }
                paint_label(&painter, visual.rect, tile);
            }
            None => paint_tile(&painter, visual.rect, tile, tile.color.gamma_multiply(0.6)),
        }
    }

    fn apply_reorders(&mut self) {
        for ReorderEvent { from, to } in self.reorders.borrow_mut().drain(..) {
            if from != to && from < self.tiles.len() && to < self.tiles.len() {
                let tile = self.tiles.remove(from);
                self.tiles.insert(to, tile);
            }
        }
    }
}

fn paint_tile(painter: &egui::Painter, rect: egui::Rect, tile: &Tile, fill: egui::Color32) {
    painter.rect_filled(rect, 6.0, fill);
    paint_label(painter, rect, tile);
}

fn paint_label(painter: &egui::Painter, rect: egui::Rect, tile: &Tile) {
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        tile.label.to_string(),
        egui::FontId::proportional(22.0),
        egui::Color32::WHITE,
    );
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.host.screen = ctx.screen_rect();
        self.host.needs_repaint = false;

        egui::TopBottomPanel::top("reorder_grid_demo_help").show(ctx, |ui| {
            ui.add(
                egui::Label::new(
                    "Tip: Press and hold a tile to pick it up, drag it over another slot and release. \
                     Drag near the top or bottom edge to scroll. Escape cancels.",
                )
                .selectable(false),
            );
        });
        egui::SidePanel::right("reorder_grid_demo_options")
            .min_width(240.0)
            .show(ctx, |ui| self.options_ui(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.grid_ui(ui));

        self.handle_input(ctx);
        self.paint_drag_visual(ctx);
        self.apply_reorders();

        if self.grid.is_press_pending() || self.grid.is_dragging() || self.host.needs_repaint {
            ctx.request_repaint();
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 560.0])
            .with_title("egui_reorder_grid demo"),
        ..Default::default()
    };

    eframe::run_native(
        "egui_reorder_grid demo",
        options,
        Box::new(|_cc| Ok(Box::new(App::new()))),
    )
}
