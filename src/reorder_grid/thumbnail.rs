use std::sync::Arc;

use egui::ColorImage;

/// Identifies one thumbnail request.
///
/// Tickets are bound to the drag session that issued them, so a rasterization that finishes
/// after its drag ended (or after a newer drag started) is recognized and dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ThumbnailTicket {
    pub(super) session_id: u64,
    pub(super) index: usize,
}

impl ThumbnailTicket {
    /// Index of the item to rasterize.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Clone, Debug, Default)]
pub enum ThumbnailState {
    /// The host did not ask for a screenshot thumbnail.
    #[default]
    NotRequested,

    /// Rasterization is in flight; the drag shows a placeholder meanwhile.
    Pending(ThumbnailTicket),

    Ready(Arc<ColorImage>),

    /// Rasterization failed or produced no pixels. The drag continues without a custom visual.
    Unavailable,
}

/// What happened to a finished rasterization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ThumbnailSettle {
    Applied,
    Failed,
    Stale,
}

impl ThumbnailState {
    pub fn image(&self) -> Option<&Arc<ColorImage>> {
        match self {
            Self::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Apply a finished rasterization if `ticket` is the one this state is waiting for.
    pub(super) fn settle(
        &mut self,
        ticket: ThumbnailTicket,
        image: Option<ColorImage>,
    ) -> ThumbnailSettle {
        let Self::Pending(expected) = self else {
            return ThumbnailSettle::Stale;
        };
        if *expected != ticket {
            return ThumbnailSettle::Stale;
        }

        match image {
            Some(image) if !image.pixels.is_empty() => {
                *self = Self::Ready(Arc::new(image));
                ThumbnailSettle::Applied
            }
            _ => {
                *self = Self::Unavailable;
                ThumbnailSettle::Failed
            }
        }
    }
}
