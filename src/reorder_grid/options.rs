use std::time::Duration;

/// Options for [`super::ReorderGrid`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReorderGridOptions {
    /// How long a press must be held before it turns into a drag.
    ///
    /// Defaults to the common platform long-press threshold (500 ms).
    pub drag_start_delay: Duration,

    /// Pointer travel (in points) allowed while the press is being held.
    ///
    /// Moving further than this before `drag_start_delay` elapses is treated as a scroll or
    /// swipe, and the press never becomes a drag.
    pub press_slop: f32,

    /// If true, the drag visual is confined to the grid container instead of the whole screen.
    pub restrict_drag_scope: bool,

    /// If true, ask the host to rasterize the dragged item and use the image as the drag visual.
    ///
    /// Rasterization runs off the gesture path; the drag shows a placeholder until it resolves.
    pub use_screenshot_thumbnail: bool,

    /// Tick interval requested from the host while auto-scrolling.
    pub auto_scroll_interval: Duration,

    /// If true, record lifecycle events (start, drop index changes, end, cancel, auto-scroll,
    /// thumbnails) in a small ring buffer, see [`super::ReorderGrid::debug_log_text`].
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,
}

impl Default for ReorderGridOptions {
    fn default() -> Self {
        Self {
            drag_start_delay: Duration::from_millis(500),
            press_slop: 8.0,
            restrict_drag_scope: false,
            use_screenshot_thumbnail: false,
            auto_scroll_interval: Duration::from_millis(16),
            debug_event_log: false,
            debug_event_log_capacity: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "serde")]
    #[test]
    fn partial_config_fills_in_defaults() {
        let opt: ReorderGridOptions =
            serde_json::from_str(r#"{ "restrict_drag_scope": true, "press_slop": 4.0 }"#).unwrap();
        assert!(opt.restrict_drag_scope);
        assert_eq!(opt.press_slop, 4.0);
        assert_eq!(opt.drag_start_delay, Duration::from_millis(500));
        assert!(!opt.use_screenshot_thumbnail);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_load_from_ron() {
        let opt: ReorderGridOptions = ron::from_str(
            "(use_screenshot_thumbnail: true, drag_start_delay: (secs: 0, nanos: 250000000))",
        )
        .unwrap();
        assert!(opt.use_screenshot_thumbnail);
        assert_eq!(opt.drag_start_delay, Duration::from_millis(250));
        assert_eq!(opt.debug_event_log_capacity, 200);
    }
}
