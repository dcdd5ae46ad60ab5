use std::time::{Duration, Instant};

use egui::Pos2;

/// Unified pointer input, as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { pos: Pos2 },
    Move { pos: Pos2 },
    Up { pos: Pos2 },

    /// The gesture was interrupted (e.g. taken over by the system).
    Cancel,
}

#[derive(Clone, Copy, Debug)]
struct PendingPress {
    index: usize,
    origin: Pos2,
    latest: Pos2,
    pressed_at: Instant,
}

/// A press that became a long-press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct LongPress {
    pub(super) index: usize,
    pub(super) origin: Pos2,
    pub(super) latest: Pos2,
}

/// Turns a held press into a drag start after a delay.
#[derive(Debug, Default)]
pub(super) struct LongPressRecognizer {
    pending: Option<PendingPress>,
}

impl LongPressRecognizer {
    pub(super) fn down(&mut self, index: usize, pos: Pos2, now: Instant) {
        self.pending = Some(PendingPress {
            index,
            origin: pos,
            latest: pos,
            pressed_at: now,
        });
    }

    /// Track pointer travel. Abandons the press once it moved further than `slop`.
    pub(super) fn moved(&mut self, pos: Pos2, slop: f32) {
        let Some(press) = &mut self.pending else {
            return;
        };
        if press.origin.distance(pos) > slop {
            log::trace!("long-press on {} abandoned: moved past slop", press.index);
            self.pending = None;
        } else {
            press.latest = pos;
        }
    }

    /// Takes the press if it has been held for at least `delay`.
    pub(super) fn take_if_elapsed(&mut self, now: Instant, delay: Duration) -> Option<LongPress> {
        let press = self.pending?;
        if now.saturating_duration_since(press.pressed_at) < delay {
            return None;
        }
        self.pending = None;
        Some(LongPress {
            index: press.index,
            origin: press.origin,
            latest: press.latest,
        })
    }

    pub(super) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(super) fn reset(&mut self) {
        self.pending = None;
    }
}
