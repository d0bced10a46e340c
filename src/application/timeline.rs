use crate::application::interaction::InteractionController;
use crate::domain::label::{bar_geometry, BarGeometry, TimelineMetrics};
use crate::domain::layout::layout;
use crate::domain::models::{
    Bar, Event, EventCategory, LifecycleStatus, LocalNow, Window, WindowDay,
};
use crate::domain::window::{compute_window, header_days, today_offset};
use crate::infrastructure::lookup::{BarPalette, EventRouter, StatusLabels};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameBar {
    pub event_id: String,
    pub title: String,
    pub category: EventCategory,
    pub stores: Vec<String>,
    pub status: LifecycleStatus,
    pub status_label: String,
    pub color: String,
    pub row: usize,
    pub start_offset: u32,
    pub duration: u32,
    pub geometry: BarGeometry,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFrame {
    pub month_offset: i32,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub month_end: NaiveDate,
    pub days: Vec<WindowDay>,
    pub today_offset: i64,
    pub scroll_left: f64,
    pub content_width: f64,
    pub labels_visible: bool,
    pub label_opacity: f64,
    pub bars: Vec<FrameBar>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClickOutcome {
    Navigate { route: String },
    Swallowed,
}

/// One mounted timeline: the selected month, its window and the interaction
/// state that lives as long as the view.
#[derive(Debug, Clone)]
pub struct TimelineView {
    month_offset: i32,
    window: Window,
    controller: InteractionController,
}

impl TimelineView {
    pub fn new(metrics: TimelineMetrics, now: &LocalNow) -> Self {
        let mut view = Self {
            month_offset: 0,
            window: compute_window(now, 0),
            controller: InteractionController::new(metrics),
        };
        view.set_month_offset(0, now);
        view
    }

    pub fn month_offset(&self) -> i32 {
        self.month_offset
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    /// Recomputes the window and moves the scroll position to its initial
    /// value for the new month.
    pub fn set_month_offset(&mut self, month_offset: i32, now: &LocalNow) -> &Window {
        self.month_offset = month_offset;
        self.window = compute_window(now, month_offset);
        let offset = today_offset(&self.window, now);
        self.controller.reset_for_window(month_offset, offset);
        &self.window
    }

    pub fn frame(
        &self,
        events: &[Event],
        now: &LocalNow,
        palette: &dyn BarPalette,
        labels: &dyn StatusLabels,
    ) -> TimelineFrame {
        let metrics = self.controller.metrics();
        let scroll_left = self.controller.scroll_left();
        let bars = self
            .bars(events, now)
            .into_iter()
            .map(|bar| {
                let geometry = bar_geometry(&bar, scroll_left, metrics);
                FrameBar {
                    status_label: labels.label(bar.status.into()),
                    color: palette.color(bar.event.category, bar.status),
                    category: bar.event.category,
                    status: bar.status,
                    row: bar.row,
                    start_offset: bar.start_offset,
                    duration: bar.duration,
                    geometry,
                    event_id: bar.event.id,
                    title: bar.event.title,
                    stores: bar.event.stores,
                }
            })
            .collect();

        TimelineFrame {
            month_offset: self.month_offset,
            window_start: self.window.start,
            window_end: self.window.end,
            month_end: self.window.month_end,
            days: header_days(&self.window, now),
            today_offset: today_offset(&self.window, now),
            scroll_left,
            content_width: metrics.content_width(),
            labels_visible: self.controller.labels_visible(),
            label_opacity: self.controller.label_opacity(),
            bars,
        }
    }

    /// Bars of `events` in the current window, in display order.
    pub fn bars(&self, events: &[Event], now: &LocalNow) -> Vec<Bar> {
        layout(events, &self.window, now)
    }

    /// Forwards a click on the bar of `event_id` to the router. Swallowed
    /// after a drag, or when no rendered bar carries that id.
    pub fn click(&self, event_id: &str, bars: &[Bar], router: &dyn EventRouter) -> ClickOutcome {
        let Some(bar) = bars.iter().find(|bar| bar.event.id == event_id) else {
            return ClickOutcome::Swallowed;
        };
        if !self.controller.honor_click() {
            return ClickOutcome::Swallowed;
        }
        ClickOutcome::Navigate {
            route: router.route(&bar.event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::test_support::*;
    use crate::infrastructure::lookup::{
        DefaultPalette, EventDetailRouter, Locale, LocalizedStatusLabels,
    };
    use chrono::Duration;

    fn metrics() -> TimelineMetrics {
        TimelineMetrics {
            day_column_width: 40.0,
            label_reserve: 120.0,
            ..TimelineMetrics::default()
        }
    }

    fn render(view: &TimelineView, events: &[Event], now: &LocalNow) -> TimelineFrame {
        view.frame(
            events,
            now,
            &DefaultPalette,
            &LocalizedStatusLabels::new(Locale::En),
        )
    }

    #[test]
    fn new_view_scrolls_to_today() {
        let now = utc_now("2026-01-10T09:00:00Z");
        let view = TimelineView::new(metrics(), &now);
        let frame = render(&view, &[], &now);

        assert_eq!(frame.month_offset, 0);
        assert_eq!(frame.today_offset, 9);
        assert_eq!(frame.scroll_left, 360.0);
        assert_eq!(frame.days.len(), 38);
        assert!(frame.bars.is_empty());
        assert!(frame.labels_visible);
    }

    #[test]
    fn changing_month_resets_scroll_to_window_start() {
        let now = utc_now("2026-01-10T09:00:00Z");
        let mut view = TimelineView::new(metrics(), &now);
        let window = view.set_month_offset(1, &now);

        assert_eq!(window.start, date("2026-02-01"));
        assert_eq!(view.controller().scroll_left(), 0.0);
    }

    #[test]
    fn frame_carries_geometry_color_and_label() {
        let now = utc_now("2026-01-10T09:00:00Z");
        let mut view = TimelineView::new(metrics(), &now);
        view.controller_mut().on_scroll(360.0, now.instant);

        let mut long = event("evt-long", EventCategory::Limited, "2026-01-02T00:00:00Z");
        long.end_date = Some(fixed_time("2026-01-31T00:00:00Z"));
        let frame = render(&view, &[long], &now);

        let bar = &frame.bars[0];
        assert_eq!(bar.start_offset, 1);
        assert_eq!(bar.duration, 30);
        assert_eq!(bar.geometry.left, 40.0);
        assert_eq!(bar.geometry.width, 1200.0);
        assert_eq!(bar.geometry.label_offset, 320.0);
        assert_eq!(bar.status_label, "Ongoing");
        assert_eq!(bar.color, "#e91e63");
    }

    #[test]
    fn labels_hide_while_scrolling_and_return_after_settle() {
        let now = utc_now("2026-01-10T09:00:00Z");
        let mut view = TimelineView::new(metrics(), &now);
        view.controller_mut().on_scroll(360.0, now.instant);
        view.controller_mut().on_scroll(400.0, now.instant);
        assert!(!render(&view, &[], &now).labels_visible);

        view.controller_mut()
            .settle(now.instant + Duration::milliseconds(150));
        let frame = render(&view, &[], &now);
        assert!(frame.labels_visible);
        assert_eq!(frame.label_opacity, 1.0);
    }

    #[test]
    fn click_after_drag_is_swallowed() {
        let now = utc_now("2026-01-10T09:00:00Z");
        let mut view = TimelineView::new(metrics(), &now);
        let bars = view.bars(
            &[event("evt-1", EventCategory::Limited, "2026-01-05T00:00:00Z")],
            &now,
        );

        assert_eq!(
            view.click("evt-1", &bars, &EventDetailRouter),
            ClickOutcome::Navigate {
                route: "/events/evt-1".to_string()
            }
        );

        view.controller_mut().pointer_down(300.0);
        view.controller_mut().pointer_move(200.0, now.instant);
        view.controller_mut().pointer_up();
        assert_eq!(view.click("evt-1", &bars, &EventDetailRouter), ClickOutcome::Swallowed);
    }

    #[test]
    fn click_on_event_without_bar_is_swallowed() {
        let now = utc_now("2026-01-10T09:00:00Z");
        let view = TimelineView::new(metrics(), &now);
        let mut first = event("evt-1", EventCategory::Recurring, "2026-01-05T00:00:00Z");
        first.stores = vec!["shinjuku".to_string()];
        let mut repeat = event("evt-2", EventCategory::Recurring, "2026-01-12T00:00:00Z");
        repeat.stores = vec!["shinjuku".to_string()];
        let bars = view.bars(&[first, repeat], &now);

        assert_eq!(bars.len(), 1);
        assert_eq!(view.click("evt-2", &bars, &EventDetailRouter), ClickOutcome::Swallowed);
        assert_eq!(view.click("missing", &bars, &EventDetailRouter), ClickOutcome::Swallowed);
    }
}
