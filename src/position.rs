use tracing::{debug, trace};

use crate::view::View;

/// Vertical placement of one unit inside the scroll container, in rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitRect {
    pub top: f64,
    pub height: f64,
}

/// Layout oracle supplied by the host. Geometry may lag behind state
/// changes, so a missing rect is normal and not an error.
pub trait ViewportGeometry {
    fn position_of(&self, index: usize) -> Option<UnitRect>;
    fn container_height(&self) -> f64;
}

/// Receives scroll commands. The host decides how to animate them.
pub trait ScrollSink {
    fn scroll_to(&mut self, offset: f64, smooth: bool);
}

/// Offset that puts the middle of `rect` in the middle of the container.
pub fn centered_offset(rect: UnitRect, container_height: f64) -> f64 {
    rect.top - container_height / 2.0 + rect.height / 2.0
}

/// Keeps the active unit centered in the sequential view.
///
/// Each `(index, view)` pair is acted on once. When geometry is missing the
/// observation is still consumed; the next index change tries again.
#[derive(Debug, Default)]
pub struct PositionTracker {
    observed: Option<(usize, View)>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the offset that was requested, if any.
    pub fn sync(
        &mut self,
        active_index: usize,
        view: View,
        geometry: &dyn ViewportGeometry,
        sink: &mut dyn ScrollSink,
    ) -> Option<f64> {
        let key = (active_index, view);
        if self.observed == Some(key) {
            return None;
        }
        self.observed = Some(key);

        if !view.scrolls() {
            return None;
        }

        let Some(rect) = geometry.position_of(active_index) else {
            debug!(active_index, "no geometry for active unit, skipping scroll sync");
            return None;
        };

        let target = centered_offset(rect, geometry.container_height());
        trace!(active_index, target, "centering active unit");
        sink.scroll_to(target, true);
        Some(target)
    }

    /// Forget the last observation so the next `sync` re-centers even if
    /// the index did not move (after reset or a relayout).
    pub fn forget(&mut self) {
        self.observed = None;
    }

    pub fn jump_to_top(&mut self, sink: &mut dyn ScrollSink) {
        self.forget();
        sink.scroll_to(0.0, false);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FixedRows, RecordingSink};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn centers_the_active_unit() {
        let rect = UnitRect {
            top: 100.0,
            height: 10.0,
        };
        assert_eq!(centered_offset(rect, 40.0), 85.0);
    }

    #[test]
    fn sync_scrolls_smoothly_in_sequential_view() {
        let geometry = FixedRows::uniform(3, 4.0, 20.0);
        let mut sink = RecordingSink::default();
        let mut tracker = PositionTracker::new();

        let target = tracker.sync(2, View::Sequential, &geometry, &mut sink);
        assert_eq!(target, Some(8.0 - 10.0 + 2.0));
        assert_eq!(sink.commands, vec![(0.0, true)]);
    }

    #[test]
    fn same_index_is_not_synced_twice() {
        let geometry = FixedRows::uniform(3, 4.0, 20.0);
        let mut sink = RecordingSink::default();
        let mut tracker = PositionTracker::new();

        tracker.sync(1, View::Sequential, &geometry, &mut sink);
        tracker.sync(1, View::Sequential, &geometry, &mut sink);
        tracker.sync(2, View::Sequential, &geometry, &mut sink);
        assert_eq!(sink.commands.len(), 2);
    }

    #[test]
    fn focus_and_edit_views_never_scroll() {
        let geometry = FixedRows::uniform(3, 4.0, 20.0);
        let mut sink = RecordingSink::default();
        let mut tracker = PositionTracker::new();

        assert_eq!(tracker.sync(1, View::Focus, &geometry, &mut sink), None);
        assert_eq!(tracker.sync(2, View::Edit, &geometry, &mut sink), None);
        assert!(sink.commands.is_empty());
    }

    #[test]
    fn switching_back_to_sequential_recenters() {
        let geometry = FixedRows::uniform(5, 2.0, 10.0);
        let mut sink = RecordingSink::default();
        let mut tracker = PositionTracker::new();

        tracker.sync(3, View::Sequential, &geometry, &mut sink);
        tracker.sync(3, View::Focus, &geometry, &mut sink);
        tracker.sync(3, View::Sequential, &geometry, &mut sink);
        assert_eq!(sink.commands, vec![(2.0, true), (2.0, true)]);
    }

    #[test]
    fn missing_geometry_is_skipped_without_retry() {
        let geometry = FixedRows::uniform(2, 4.0, 20.0);
        let mut sink = RecordingSink::default();
        let mut tracker = PositionTracker::new();

        assert_eq!(tracker.sync(5, View::Sequential, &geometry, &mut sink), None);
        assert_eq!(tracker.sync(5, View::Sequential, &geometry, &mut sink), None);
        assert!(sink.commands.is_empty());

        assert!(tracker.sync(1, View::Sequential, &geometry, &mut sink).is_some());
    }

    #[test]
    fn jump_to_top_is_immediate_and_allows_recentering() {
        let geometry = FixedRows::uniform(3, 4.0, 20.0);
        let mut sink = RecordingSink::default();
        let mut tracker = PositionTracker::new();

        tracker.sync(0, View::Sequential, &geometry, &mut sink);
        tracker.jump_to_top(&mut sink);
        tracker.sync(0, View::Sequential, &geometry, &mut sink);
        assert_eq!(
            sink.commands,
            vec![(-8.0, true), (0.0, false), (-8.0, true)]
        );
    }
}
