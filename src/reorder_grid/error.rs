/// Configuration errors surfaced when constructing a [`super::ReorderGrid`] or its geometry.
///
/// Everything else the engine runs into mid-drag (unmounted items, stale unregisters,
/// failed thumbnails, overlapping drags) degrades to a safe default instead of erroring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReorderGridError {
    InvalidColumnCount { columns: usize },
    InvalidGeometry { reason: &'static str },
}

impl std::fmt::Display for ReorderGridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColumnCount { columns } => {
                write!(f, "invalid column count: {columns} (must be at least 1)")
            }
            Self::InvalidGeometry { reason } => write!(f, "invalid grid geometry: {reason}"),
        }
    }
}

impl std::error::Error for ReorderGridError {}
