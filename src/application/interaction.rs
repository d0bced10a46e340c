use crate::domain::label::TimelineMetrics;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging { pointer_x: f64, scroll_left: f64 },
}

impl DragPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
        }
    }
}

/// Owns the mutable view state of one mounted timeline: scroll position,
/// drag gesture, the transient scrolling flag and the has-dragged flag.
#[derive(Debug, Clone)]
pub struct InteractionController {
    metrics: TimelineMetrics,
    viewport_width: f64,
    scroll_left: f64,
    drag: DragPhase,
    has_dragged: bool,
    scrolling: bool,
    settle_deadline: Option<DateTime<Utc>>,
    initial_jump: Option<f64>,
}

impl InteractionController {
    pub fn new(metrics: TimelineMetrics) -> Self {
        Self {
            metrics,
            viewport_width: 0.0,
            scroll_left: 0.0,
            drag: DragPhase::Idle,
            has_dragged: false,
            scrolling: false,
            settle_deadline: None,
            initial_jump: None,
        }
    }

    pub fn metrics(&self) -> &TimelineMetrics {
        &self.metrics
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    pub fn phase(&self) -> DragPhase {
        self.drag
    }

    pub fn has_dragged(&self) -> bool {
        self.has_dragged
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn labels_visible(&self) -> bool {
        !self.scrolling
    }

    pub fn label_opacity(&self) -> f64 {
        if self.scrolling { 0.0 } else { 1.0 }
    }

    pub fn set_viewport_width(&mut self, viewport_width: f64) {
        self.viewport_width = if viewport_width.is_finite() {
            viewport_width.max(0.0)
        } else {
            0.0
        };
        self.scroll_left = self.clamp_scroll(self.scroll_left);
    }

    /// Jumps to the initial position for a freshly computed window: today's
    /// column on the current month, the window start otherwise. A scroll
    /// event that lands exactly on the jump target is treated as the echo of
    /// the jump and does not raise the scrolling flag.
    pub fn reset_for_window(&mut self, month_offset: i32, today_offset: i64) -> f64 {
        let target = if month_offset == 0 && today_offset >= 0 {
            today_offset as f64 * self.metrics.day_column_width
        } else {
            0.0
        };
        self.scroll_left = self.clamp_scroll(target);
        self.drag = DragPhase::Idle;
        self.scrolling = false;
        self.settle_deadline = None;
        self.initial_jump = Some(self.scroll_left);
        self.scroll_left
    }

    pub fn pointer_down(&mut self, pointer_x: f64) {
        self.drag = DragPhase::Dragging {
            pointer_x,
            scroll_left: self.scroll_left,
        };
        self.has_dragged = false;
        self.initial_jump = None;
    }

    /// Pans by the pointer delta since the drag started. Returns the new
    /// scroll offset, or `None` when no drag is in progress.
    pub fn pointer_move(&mut self, pointer_x: f64, at: DateTime<Utc>) -> Option<f64> {
        let DragPhase::Dragging {
            pointer_x: origin_x,
            scroll_left: origin_scroll,
        } = self.drag
        else {
            return None;
        };

        let dx = pointer_x - origin_x;
        if dx.abs() > self.metrics.drag_threshold {
            self.has_dragged = true;
        }
        self.on_scroll(origin_scroll - dx, at);
        Some(self.scroll_left)
    }

    pub fn pointer_up(&mut self) {
        self.drag = DragPhase::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.drag = DragPhase::Idle;
    }

    /// Records a scroll to `scroll_left` and restarts the settle timer.
    pub fn on_scroll(&mut self, scroll_left: f64, at: DateTime<Utc>) {
        self.scroll_left = self.clamp_scroll(scroll_left);
        if self.initial_jump.take() == Some(self.scroll_left) {
            return;
        }
        self.scrolling = true;
        self.settle_deadline =
            Some(at + Duration::milliseconds(self.metrics.scroll_settle_ms as i64));
    }

    /// Clears the scrolling flag once the settle timer has expired. Returns
    /// true when the flag changed.
    pub fn settle(&mut self, at: DateTime<Utc>) -> bool {
        match self.settle_deadline {
            Some(deadline) if at >= deadline => {
                self.settle_deadline = None;
                self.scrolling = false;
                true
            }
            _ => false,
        }
    }

    /// Whether a click on a bar should navigate. False right after a drag.
    pub fn honor_click(&self) -> bool {
        !self.has_dragged
    }

    fn clamp_scroll(&self, scroll_left: f64) -> f64 {
        if !scroll_left.is_finite() {
            return 0.0;
        }
        let max_scroll = (self.metrics.content_width() - self.viewport_width).max(0.0);
        scroll_left.clamp(0.0, max_scroll)
    }
}
