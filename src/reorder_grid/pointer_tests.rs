use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use egui::{Pos2, Vec2, vec2};

use super::test_support::{CELL, FakeHost};
use super::*;

const DELAY: Duration = Duration::from_millis(500);

type Updates = Rc<RefCell<Vec<(usize, Pos2, Vec2)>>>;

type Reorders = Rc<RefCell<Vec<ReorderEvent>>>;

fn grid_with(options: ReorderGridOptions) -> (ReorderGrid, FakeHost, Reorders, Updates) {
    let _ = env_logger::builder().is_test(true).try_init();
    let reorders = Rc::new(RefCell::new(Vec::new()));
    let updates: Updates = Rc::new(RefCell::new(Vec::new()));
    let callbacks = ReorderCallbacks::default()
        .on_drag_update({
            let updates = Rc::clone(&updates);
            move |index, pos, delta| updates.borrow_mut().push((index, pos, delta))
        })
        .on_reorder({
            let reorders = Rc::clone(&reorders);
            move |event| reorders.borrow_mut().push(event)
        });
    let mut grid = ReorderGrid::new_with_options(3, 6, LayoutStrategy::DirectBox, options)
        .unwrap()
        .with_callbacks(callbacks);
    let mut host = FakeHost::default();
    for index in 0..6 {
        let cell = host.cell(index, 3);
        grid.register_item(index, cell, &mut host);
    }
    (grid, host, reorders, updates)
}

fn center(index: usize) -> Pos2 {
    Pos2::new(
        ((index % 3) as f32 + 0.5) * CELL,
        ((index / 3) as f32 + 0.5) * CELL,
    )
}

#[test]
fn long_press_starts_a_drag_after_the_delay() {
    let (mut grid, mut host, _, _) = grid_with(ReorderGridOptions::default());
    let t0 = Instant::now();

    grid.handle_pointer(PointerEvent::Down { pos: center(1) }, t0, &mut host);
    assert!(grid.is_press_pending());
    assert_eq!(grid.phase(), DragPhase::Idle);

    grid.poll(t0 + Duration::from_millis(499), &mut host);
    assert_eq!(grid.phase(), DragPhase::Idle);

    grid.poll(t0 + DELAY, &mut host);
    assert!(!grid.is_press_pending());
    assert_eq!(grid.phase(), DragPhase::Active);
    assert_eq!(grid.drag_index(), Some(1));
}

#[test]
fn moving_past_the_slop_abandons_the_press() {
    let (mut grid, mut host, _, _) = grid_with(ReorderGridOptions::default());
    let t0 = Instant::now();

    grid.handle_pointer(PointerEvent::Down { pos: center(1) }, t0, &mut host);
    // Within the slop: still waiting.
    grid.handle_pointer(
        PointerEvent::Move {
            pos: center(1) + vec2(5.0, 0.0),
        },
        t0 + Duration::from_millis(100),
        &mut host,
    );
    assert!(grid.is_press_pending());

    grid.handle_pointer(
        PointerEvent::Move {
            pos: center(1) + vec2(30.0, 0.0),
        },
        t0 + Duration::from_millis(200),
        &mut host,
    );
    assert!(!grid.is_press_pending());

    grid.poll(t0 + DELAY * 2, &mut host);
    assert!(!grid.is_dragging());
}

#[test]
fn release_before_the_delay_is_a_click() {
    let (mut grid, mut host, reorders, _) = grid_with(ReorderGridOptions::default());
    let t0 = Instant::now();

    grid.handle_pointer(PointerEvent::Down { pos: center(2) }, t0, &mut host);
    grid.handle_pointer(
        PointerEvent::Up { pos: center(2) },
        t0 + Duration::from_millis(100),
        &mut host,
    );
    grid.poll(t0 + DELAY, &mut host);

    assert!(!grid.is_dragging());
    assert!(reorders.borrow().is_empty());
    assert_eq!(grid.last_outcome(), None);
}

#[test]
fn release_after_the_delay_without_a_poll_still_drags() {
    let (mut grid, mut host, reorders, _) = grid_with(ReorderGridOptions::default());
    let t0 = Instant::now();

    grid.handle_pointer(PointerEvent::Down { pos: center(2) }, t0, &mut host);
    // No frame in between: the release itself must promote the held press.
    grid.handle_pointer(
        PointerEvent::Up { pos: center(2) },
        t0 + Duration::from_millis(800),
        &mut host,
    );

    assert!(!grid.is_dragging());
    assert_eq!(reorders.borrow().as_slice(), &[ReorderEvent { from: 2, to: 2 }]);
    assert_eq!(
        grid.last_outcome(),
        Some(DragOutcome::Committed { from: 2, to: 2 })
    );
    assert_eq!(host.pointer_releases, 1);
}

#[test]
fn full_gesture_reports_the_reorder() {
    let (mut grid, mut host, reorders, updates) = grid_with(ReorderGridOptions::default());
    let t0 = Instant::now();

    grid.handle_pointer(PointerEvent::Down { pos: center(1) }, t0, &mut host);
    // The move that arrives after the delay first promotes the press, then drives the drag.
    grid.handle_pointer(
        PointerEvent::Move { pos: center(4) },
        t0 + Duration::from_millis(600),
        &mut host,
    );
    assert_eq!(grid.drop_index(), Some(4));
    assert_eq!(
        updates.borrow().as_slice(),
        &[(1, center(4), vec2(0.0, CELL))]
    );

    grid.handle_pointer(
        PointerEvent::Up { pos: center(4) },
        t0 + Duration::from_millis(700),
        &mut host,
    );
    assert!(!grid.is_dragging());
    assert_eq!(reorders.borrow().as_slice(), &[ReorderEvent { from: 1, to: 4 }]);
    assert_eq!(
        grid.last_outcome(),
        Some(DragOutcome::Committed { from: 1, to: 4 })
    );
    assert_eq!(host.pointer_releases, 1);
}

#[test]
fn cancel_mid_drag_reports_nothing() {
    let (mut grid, mut host, reorders, _) = grid_with(ReorderGridOptions::default());
    let t0 = Instant::now();

    grid.handle_pointer(PointerEvent::Down { pos: center(0) }, t0, &mut host);
    grid.poll(t0 + DELAY, &mut host);
    grid.handle_pointer(
        PointerEvent::Move { pos: center(5) },
        t0 + Duration::from_millis(600),
        &mut host,
    );
    grid.handle_pointer(PointerEvent::Cancel, t0 + Duration::from_millis(700), &mut host);

    assert!(!grid.is_dragging());
    assert!(reorders.borrow().is_empty());
    assert_eq!(grid.last_outcome(), Some(DragOutcome::Cancelled { index: 0 }));
    for item in grid.registry().iter() {
        assert_eq!(item.gap_offset(), Vec2::ZERO);
        assert!(!item.is_dragging());
    }
}

#[test]
fn zero_delay_starts_on_press() {
    let options = ReorderGridOptions {
        drag_start_delay: Duration::ZERO,
        ..Default::default()
    };
    let (mut grid, mut host, _, _) = grid_with(options);

    grid.handle_pointer(PointerEvent::Down { pos: center(3) }, Instant::now(), &mut host);
    assert_eq!(grid.drag_index(), Some(3));
}

#[test]
fn press_on_empty_space_does_nothing() {
    let (mut grid, mut host, _, _) = grid_with(ReorderGridOptions::default());
    let t0 = Instant::now();

    grid.handle_pointer(
        PointerEvent::Down {
            pos: Pos2::new(150.0, 350.0),
        },
        t0,
        &mut host,
    );
    assert!(!grid.is_press_pending());
    grid.poll(t0 + DELAY, &mut host);
    assert!(!grid.is_dragging());
}

#[test]
fn second_press_during_a_drag_is_ignored() {
    let options = ReorderGridOptions {
        drag_start_delay: Duration::ZERO,
        ..Default::default()
    };
    let (mut grid, mut host, _, _) = grid_with(options);
    let t0 = Instant::now();

    grid.handle_pointer(PointerEvent::Down { pos: center(0) }, t0, &mut host);
    let id = grid.session().map(DragSession::id);

    grid.handle_pointer(PointerEvent::Down { pos: center(4) }, t0, &mut host);
    assert_eq!(grid.drag_index(), Some(0));
    assert_eq!(grid.session().map(DragSession::id), id);
    assert!(!grid.is_press_pending());
}
