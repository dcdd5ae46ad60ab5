use egui::{Pos2, Rect, Vec2};

/// Decides how fast the grid should scroll while a drag hovers near its edges.
///
/// The engine only cares whether the answer is zero: a non-zero velocity starts the recurring
/// auto-scroll task, a zero velocity stops it.
pub trait AutoScrollPolicy {
    /// Scroll velocity in points per second for a pointer at `pointer_local`
    /// (container-local) over the visible `viewport`.
    fn velocity(&self, pointer_local: Pos2, viewport: Rect) -> Vec2;
}

/// Scrolls when the pointer is within `edge_band` points of a viewport edge (or past it),
/// ramping linearly up to `max_speed` at the edge itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeAutoScroll {
    pub edge_band: f32,
    pub max_speed: f32,
}

impl Default for EdgeAutoScroll {
    fn default() -> Self {
        Self {
            edge_band: 48.0,
            max_speed: 600.0,
        }
    }
}

impl EdgeAutoScroll {
    fn axis(&self, pos: f32, min: f32, max: f32) -> f32 {
        if self.edge_band <= 0.0 || max - min <= 2.0 * self.edge_band {
            return 0.0;
        }
        let near_min = pos - min;
        let near_max = max - pos;
        if near_min < self.edge_band {
            -self.max_speed * (1.0 - near_min.max(0.0) / self.edge_band)
        } else if near_max < self.edge_band {
            self.max_speed * (1.0 - near_max.max(0.0) / self.edge_band)
        } else {
            0.0
        }
    }
}

impl AutoScrollPolicy for EdgeAutoScroll {
    fn velocity(&self, pointer_local: Pos2, viewport: Rect) -> Vec2 {
        Vec2::new(
            self.axis(pointer_local.x, viewport.min.x, viewport.max.x),
            self.axis(pointer_local.y, viewport.min.y, viewport.max.y),
        )
    }
}
