use egui::{Pos2, Rect, Vec2};

use super::error::ReorderGridError;
use super::registry::ItemRegistry;

/// Analytic child geometry of a virtualized grid.
///
/// Answers for any index, mounted or not, which is what lets the gap preview reach items that
/// are currently scrolled out of view.
pub trait GridGeometry {
    /// Map a logical item index to the layout's own child index.
    ///
    /// Layouts that place header cells before the first item override this.
    fn corrected_index(&self, index: usize) -> usize {
        index
    }

    /// Rect of the child at `corrected_index`, in container-local coordinates.
    fn child_rect(&self, corrected_index: usize) -> Rect;
}

/// Fixed-size cells in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformGridGeometry {
    columns: usize,
    cell_size: Vec2,
    spacing: Vec2,
    origin: Pos2,
    leading_children: usize,
}

impl UniformGridGeometry {
    /// # Errors
    /// [`ReorderGridError::InvalidColumnCount`] for zero columns,
    /// [`ReorderGridError::InvalidGeometry`] for a non-finite or negative cell size or spacing.
    pub fn new(columns: usize, cell_size: Vec2, spacing: Vec2) -> Result<Self, ReorderGridError> {
        if columns == 0 {
            return Err(ReorderGridError::InvalidColumnCount { columns });
        }
        if !cell_size.is_finite() || cell_size.x <= 0.0 || cell_size.y <= 0.0 {
            return Err(ReorderGridError::InvalidGeometry {
                reason: "cell size must be finite and positive",
            });
        }
        if !spacing.is_finite() || spacing.x < 0.0 || spacing.y < 0.0 {
            return Err(ReorderGridError::InvalidGeometry {
                reason: "spacing must be finite and non-negative",
            });
        }
        Ok(Self {
            columns,
            cell_size,
            spacing,
            origin: Pos2::ZERO,
            leading_children: 0,
        })
    }

    /// Top-left corner of the first cell (i.e. the grid's padding).
    #[must_use]
    pub fn with_origin(mut self, origin: Pos2) -> Self {
        self.origin = origin;
        self
    }

    /// Number of non-item cells (headers) the layout places before item 0.
    #[must_use]
    pub fn with_leading_children(mut self, leading_children: usize) -> Self {
        self.leading_children = leading_children;
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}

impl GridGeometry for UniformGridGeometry {
    fn corrected_index(&self, index: usize) -> usize {
        index + self.leading_children
    }

    fn child_rect(&self, corrected_index: usize) -> Rect {
        let row = (corrected_index / self.columns) as f32;
        let col = (corrected_index % self.columns) as f32;
        let stride = self.cell_size + self.spacing;
        let min = self.origin + Vec2::new(col * stride.x, row * stride.y);
        Rect::from_min_size(min, self.cell_size)
    }
}

/// How item positions are resolved. Picked once, when the engine is built.
pub enum LayoutStrategy {
    /// Positions come from the layout's analytic geometry; items need not be mounted.
    VirtualizedGrid(Box<dyn GridGeometry>),

    /// Positions come from the rendered bounds of mounted items.
    DirectBox,
}

impl LayoutStrategy {
    pub fn virtualized(geometry: impl GridGeometry + 'static) -> Self {
        Self::VirtualizedGrid(Box::new(geometry))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::VirtualizedGrid(_) => "virtualized-grid",
            Self::DirectBox => "direct-box",
        }
    }
}

impl std::fmt::Debug for LayoutStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves item positions (container-local top-left corners) under a [`LayoutStrategy`].
#[derive(Clone, Copy)]
pub(super) struct PositionResolver<'a> {
    pub(super) layout: &'a LayoutStrategy,
    pub(super) registry: &'a ItemRegistry,
    pub(super) item_count: usize,
}

impl PositionResolver<'_> {
    /// Position of `index`, or `None` if it cannot be resolved right now.
    pub(super) fn try_position_of(&self, index: usize) -> Option<Vec2> {
        match self.layout {
            LayoutStrategy::VirtualizedGrid(geometry) => {
                Some(geometry.child_rect(geometry.corrected_index(index)).min.to_vec2())
            }
            LayoutStrategy::DirectBox => self
                .registry
                .get(index)
                .and_then(|item| item.rect())
                .map(|rect| rect.min.to_vec2()),
        }
    }

    /// Position of `index`, falling back to zero for items that are not mounted or laid out.
    pub(super) fn position_of(&self, index: usize) -> Vec2 {
        self.try_position_of(index).unwrap_or_else(|| {
            log::debug!(
                "unresolved position for index {index} ({:?}); using zero",
                self.layout
            );
            Vec2::ZERO
        })
    }

    /// Position of the item `delta` slots away from `index`, clamped to the item range.
    pub(super) fn position_offset_by(&self, index: usize, delta: isize) -> Vec2 {
        let Some(last) = self.item_count.checked_sub(1) else {
            return Vec2::ZERO;
        };
        let target = index.saturating_add_signed(delta).min(last);
        self.position_of(target)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use egui::vec2;

    use super::*;

    fn geometry() -> UniformGridGeometry {
        UniformGridGeometry::new(3, vec2(100.0, 50.0), vec2(10.0, 5.0)).unwrap()
    }

    #[test]
    fn uniform_geometry_places_cells_row_major() {
        let g = geometry();
        assert_eq!(g.child_rect(0).min, Pos2::ZERO);
        assert_eq!(g.child_rect(2).min, Pos2::new(220.0, 0.0));
        assert_eq!(g.child_rect(4).min, Pos2::new(110.0, 55.0));
        assert_eq!(g.child_rect(4).size(), vec2(100.0, 50.0));
    }

    #[test]
    fn leading_children_shift_items() {
        let g = geometry()
            .with_origin(Pos2::new(8.0, 8.0))
            .with_leading_children(3);
        assert_eq!(g.corrected_index(0), 3);
        assert_eq!(g.child_rect(g.corrected_index(0)).min, Pos2::new(8.0, 63.0));
    }

    #[test]
    fn rejects_bad_geometry() {
        assert_eq!(
            UniformGridGeometry::new(0, vec2(1.0, 1.0), Vec2::ZERO),
            Err(ReorderGridError::InvalidColumnCount { columns: 0 })
        );
        assert!(UniformGridGeometry::new(2, vec2(0.0, 1.0), Vec2::ZERO).is_err());
        assert!(UniformGridGeometry::new(2, vec2(1.0, f32::NAN), Vec2::ZERO).is_err());
        assert!(UniformGridGeometry::new(2, vec2(1.0, 1.0), vec2(-1.0, 0.0)).is_err());
    }

    #[test]
    fn virtualized_answers_for_unmounted_items() {
        let layout = LayoutStrategy::virtualized(geometry());
        let registry = ItemRegistry::default();
        let resolver = PositionResolver {
            layout: &layout,
            registry: &registry,
            item_count: 100,
        };
        assert_eq!(resolver.try_position_of(40), Some(vec2(110.0, 715.0)));
    }

    #[test]
    fn direct_box_needs_a_mounted_item() {
        let layout = LayoutStrategy::DirectBox;
        let mut registry = ItemRegistry::default();
        let rect = Rect::from_min_size(Pos2::new(30.0, 40.0), vec2(10.0, 10.0));
        registry.insert(1, Rc::new(move || Some(rect)));
        registry.insert(2, Rc::new(|| None));
        let resolver = PositionResolver {
            layout: &layout,
            registry: &registry,
            item_count: 3,
        };
        assert_eq!(resolver.try_position_of(1), Some(vec2(30.0, 40.0)));
        assert_eq!(resolver.try_position_of(0), None);
        assert_eq!(resolver.position_of(0), Vec2::ZERO);
        assert_eq!(resolver.position_of(2), Vec2::ZERO);
    }

    #[test]
    fn offset_by_clamps_to_item_range() {
        let layout = LayoutStrategy::virtualized(geometry());
        let registry = ItemRegistry::default();
        let resolver = PositionResolver {
            layout: &layout,
            registry: &registry,
            item_count: 5,
        };
        assert_eq!(resolver.position_offset_by(2, -1), resolver.position_of(1));
        assert_eq!(resolver.position_offset_by(0, -3), resolver.position_of(0));
        assert_eq!(resolver.position_offset_by(3, 10), resolver.position_of(4));

        let empty = PositionResolver {
            item_count: 0,
            ..resolver
        };
        assert_eq!(empty.position_offset_by(0, 1), Vec2::ZERO);
    }
}
