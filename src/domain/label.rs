use crate::domain::models::{Bar, WINDOW_DAYS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMetrics {
    pub day_column_width: f64,
    /// Width a bar must still have ahead of the scroll position to hold a
    /// pinned label.
    pub label_reserve: f64,
    pub drag_threshold: f64,
    pub scroll_settle_ms: u64,
}

impl Default for TimelineMetrics {
    fn default() -> Self {
        Self {
            day_column_width: 48.0,
            label_reserve: 160.0,
            drag_threshold: 5.0,
            scroll_settle_ms: 150,
        }
    }
}

impl TimelineMetrics {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.day_column_width.is_finite() && self.day_column_width > 0.0) {
            return Err("timeline.day_column_width must be > 0".to_string());
        }
        if !(self.label_reserve.is_finite() && self.label_reserve >= 0.0) {
            return Err("timeline.label_reserve must be >= 0".to_string());
        }
        if !(self.drag_threshold.is_finite() && self.drag_threshold >= 0.0) {
            return Err("timeline.drag_threshold must be >= 0".to_string());
        }
        Ok(())
    }

    pub fn content_width(&self) -> f64 {
        WINDOW_DAYS as f64 * self.day_column_width
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarGeometry {
    pub left: f64,
    pub width: f64,
    pub label_offset: f64,
}

pub fn bar_geometry(bar: &Bar, scroll_left: f64, metrics: &TimelineMetrics) -> BarGeometry {
    BarGeometry {
        left: bar.start_offset as f64 * metrics.day_column_width,
        width: bar.duration as f64 * metrics.day_column_width,
        label_offset: label_offset(bar, scroll_left, metrics),
    }
}

/// Horizontal shift that keeps a bar's label at the viewport's left edge.
///
/// Non-zero only while the bar's left edge is scrolled out of view and the
/// bar still has `label_reserve` pixels ahead of the scroll position.
pub fn label_offset(bar: &Bar, scroll_left: f64, metrics: &TimelineMetrics) -> f64 {
    let bar_left = bar.start_offset as f64 * metrics.day_column_width;
    let bar_right = bar_left + bar.duration as f64 * metrics.day_column_width;
    if scroll_left > bar_left && scroll_left < bar_right - metrics.label_reserve {
        scroll_left - bar_left
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::test_support::*;
    use crate::domain::models::{EventCategory, LifecycleStatus};
    use proptest::prelude::*;

    fn bar(start_offset: u32, duration: u32) -> Bar {
        Bar {
            event: event("evt", EventCategory::Limited, "2026-01-01T00:00:00Z"),
            start_offset,
            duration,
            status: LifecycleStatus::Ongoing,
            row: 0,
        }
    }

    fn metrics() -> TimelineMetrics {
        TimelineMetrics {
            day_column_width: 40.0,
            label_reserve: 120.0,
            ..TimelineMetrics::default()
        }
    }

    #[test]
    fn label_stays_at_bar_edge_when_bar_start_is_visible() {
        let bar = bar(5, 10);
        assert_eq!(label_offset(&bar, 0.0, &metrics()), 0.0);
        assert_eq!(label_offset(&bar, 200.0, &metrics()), 0.0);
    }

    #[test]
    fn label_is_pinned_to_viewport_edge_inside_long_bar() {
        let bar = bar(5, 10);
        assert_eq!(label_offset(&bar, 300.0, &metrics()), 100.0);
    }

    #[test]
    fn label_returns_to_bar_edge_when_reserve_runs_out() {
        let bar = bar(5, 10);
        // bar spans 200..600, reserve starts at 480
        assert_eq!(label_offset(&bar, 479.0, &metrics()), 279.0);
        assert_eq!(label_offset(&bar, 480.0, &metrics()), 0.0);
        assert_eq!(label_offset(&bar, 700.0, &metrics()), 0.0);
    }

    #[test]
    fn geometry_scales_offsets_by_column_width() {
        let geometry = bar_geometry(&bar(2, 3), 0.0, &metrics());
        assert_eq!(geometry.left, 80.0);
        assert_eq!(geometry.width, 120.0);
        assert_eq!(geometry.label_offset, 0.0);
    }

    #[test]
    fn metrics_validate_rejects_zero_column_width() {
        let mut metrics = metrics();
        assert!(metrics.validate().is_ok());
        metrics.day_column_width = 0.0;
        assert!(metrics.validate().is_err());
    }

    proptest! {
        #[test]
        fn pinned_label_never_leaves_the_bar(
            start in 0u32..38,
            duration in 1u32..38,
            scroll in 0.0f64..2000.0
        ) {
            let bar = bar(start, duration);
            let metrics = metrics();
            let offset = label_offset(&bar, scroll, &metrics);
            prop_assert!(offset >= 0.0);
            prop_assert!(
                offset == 0.0
                    || offset + metrics.label_reserve <= duration as f64 * metrics.day_column_width
            );
        }
    }
}
