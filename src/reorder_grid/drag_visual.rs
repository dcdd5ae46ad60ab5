use std::sync::Arc;

use egui::{ColorImage, Pos2, Rect, Vec2};

/// Where and how to draw the item being dragged.
#[derive(Clone, Debug)]
pub struct DragVisual {
    /// Global rect of the dragged item's visual.
    pub rect: Rect,

    /// Rasterized item, once available. `None` means: draw a placeholder (or the live item).
    pub thumbnail: Option<Arc<ColorImage>>,
}

/// A `size`-sized rect centered on `center`, pushed inside `bounds` as far as it fits.
///
/// If the rect is larger than `bounds` it is pinned to the top-left of `bounds`.
pub(super) fn place_within(center: Pos2, size: Vec2, bounds: Rect) -> Rect {
    let min = center - size / 2.0;
    if !(size.x.is_finite() && size.y.is_finite()) || !bounds.is_finite() {
        return Rect::from_min_size(min, size);
    }

    let max_unclamped = bounds.max - size;
    let max = egui::pos2(
        max_unclamped.x.max(bounds.min.x),
        max_unclamped.y.max(bounds.min.y),
    );
    let min = egui::pos2(
        min.x.clamp(bounds.min.x, max.x),
        min.y.clamp(bounds.min.y, max.y),
    );
    Rect::from_min_size(min, size)
}
