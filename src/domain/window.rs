use crate::domain::models::{
    add_days, days_between, shift_months, LocalNow, Window, WindowDay, WINDOW_DAYS,
};
use chrono::{Datelike, NaiveDate};

/// Builds the visible window for the month `month_offset` months away from
/// the current one. The window always spans [`WINDOW_DAYS`] days, running
/// past the end of the target month.
pub fn compute_window(now: &LocalNow, month_offset: i32) -> Window {
    let start = shift_months(start_of_month(now.today()), month_offset);
    let month_end = end_of_month(start);
    let days = (0..WINDOW_DAYS as u64)
        .map(|offset| add_days(start, offset))
        .collect::<Vec<_>>();
    let end = add_days(start, WINDOW_DAYS as u64 - 1);

    Window {
        start,
        end,
        month_end,
        days,
    }
}

/// Whole days from the window start to today. Negative when today precedes
/// the window.
pub fn today_offset(window: &Window, now: &LocalNow) -> i64 {
    days_between(window.start, now.today())
}

/// Header cells for the window's day sequence.
pub fn header_days(window: &Window, now: &LocalNow) -> Vec<WindowDay> {
    let today = now.today();
    window
        .days
        .iter()
        .map(|&date| WindowDay {
            date,
            weekday: date.weekday(),
            is_today: date == today,
            is_month_end: date == window.month_end,
            in_target_month: date <= window.month_end,
        })
        .collect()
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    shift_months(start_of_month(date), 1)
        .pred_opt()
        .unwrap_or(NaiveDate::MAX)
}
