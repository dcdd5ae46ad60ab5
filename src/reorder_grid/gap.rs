use egui::Vec2;

use super::layout::PositionResolver;

/// Whose slot the item at `index` previews moving into, if it is affected at all.
///
/// Between the drag origin and the drop target there is exactly one open gap. Dragging forward
/// (`drop > drag`) pulls every item in range back onto its predecessor's slot; dragging backward
/// pushes them onto their successor's slot.
pub(super) fn gap_neighbor(drag_index: usize, drop_index: usize, index: usize) -> Option<usize> {
    if drag_index == drop_index {
        return None;
    }
    let lo = drag_index.min(drop_index);
    let hi = drag_index.max(drop_index);
    if index < lo || index > hi {
        return None;
    }
    if drop_index > drag_index {
        index.checked_sub(1)
    } else {
        index.checked_add(1)
    }
}

/// Displacement the item at `index` should render with to preview the pending reorder.
///
/// Zero for unaffected items, and zero whenever the item or its neighbor is not registered
/// (or cannot be positioned), so incomplete layout data never produces a visual jump.
pub(super) fn gap_offset(
    resolver: &PositionResolver<'_>,
    drag_index: usize,
    drop_index: usize,
    index: usize,
) -> Vec2 {
    let Some(neighbor) = gap_neighbor(drag_index, drop_index, index) else {
        return Vec2::ZERO;
    };
    if !resolver.registry.contains(index) || !resolver.registry.contains(neighbor) {
        return Vec2::ZERO;
    }
    match (
        resolver.try_position_of(neighbor),
        resolver.try_position_of(index),
    ) {
        (Some(to), Some(from)) => to - from,
        _ => Vec2::ZERO,
    }
}
