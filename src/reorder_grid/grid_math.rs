use std::ops::Sub;

use super::error::ReorderGridError;

/// A cell position in a row-major grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoordinate {
    pub row: isize,
    pub col: isize,
}

impl GridCoordinate {
    pub const ZERO: Self = Self { row: 0, col: 0 };

    pub fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// Linear index of this cell, or `None` if it lies outside a grid of `columns` columns.
    pub fn to_index(self, columns: usize) -> Option<usize> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        if col >= columns {
            return None;
        }
        row.checked_mul(columns)?.checked_add(col)
    }
}

impl Sub for GridCoordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            row: self.row - rhs.row,
            col: self.col - rhs.col,
        }
    }
}

/// Row-major coordinate of `index` in a grid with `columns` columns.
///
/// Rows saturate at `isize::MAX`, which only a single-column grid with an index past
/// `isize::MAX` can reach.
///
/// # Errors
/// [`ReorderGridError::InvalidColumnCount`] if `columns == 0`.
pub fn to_coordinate(index: usize, columns: usize) -> Result<GridCoordinate, ReorderGridError> {
    if columns == 0 {
        return Err(ReorderGridError::InvalidColumnCount { columns });
    }
    Ok(GridCoordinate {
        row: isize::try_from(index / columns).unwrap_or(isize::MAX),
        col: isize::try_from(index % columns).unwrap_or(isize::MAX),
    })
}

/// Cell delta that takes `from_index` onto `to_index`.
///
/// # Errors
/// [`ReorderGridError::InvalidColumnCount`] if `columns == 0`.
pub fn relative_displacement(
    from_index: usize,
    to_index: usize,
    columns: usize,
) -> Result<GridCoordinate, ReorderGridError> {
    Ok(to_coordinate(to_index, columns)? - to_coordinate(from_index, columns)?)
}
