use crate::domain::dedupe::dedupe;
use crate::domain::models::{
    add_days, days_between, shift_months, Bar, Event, LocalNow, Window,
};
use crate::domain::status::resolve;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Minimum drawn length of an open-ended event, in days.
const OPEN_ENDED_MIN_DAYS: u64 = 7;
/// Open-ended events are drawn at least this many months past today.
const OPEN_ENDED_HORIZON_MONTHS: i32 = 1;

/// Lays out `events` onto `window` as ranked, clipped bars.
///
/// Recurring events are deduplicated first, then ranked by start date and
/// category priority. The sort is stable, so remaining ties keep input order.
/// Events with no overlap with the window are dropped. `now` is evaluated
/// once for every bar of the pass.
pub fn layout(events: &[Event], window: &Window, now: &LocalNow) -> Vec<Bar> {
    rank(events)
        .into_iter()
        .filter_map(|event| place(event, window, now))
        .enumerate()
        .map(|(row, mut bar)| {
            bar.row = row;
            bar
        })
        .collect()
}

/// Deduplicated events in display order: start date, then category
/// priority, then input order.
pub fn rank(events: &[Event]) -> Vec<Event> {
    let mut ranked = dedupe(events);
    ranked.sort_by(compare_rank);
    ranked
}

/// Local date used as the drawn end of `event`.
///
/// Falls back to one month past today or one week past the start, whichever
/// is later, when the event has neither a planned nor an actual end.
pub fn effective_end(event: &Event, now: &LocalNow) -> NaiveDate {
    if let Some(end_date) = event.end_date {
        return now.local_date(end_date);
    }
    if let Some(ended_at) = event.ended_at {
        return now.local_date(ended_at);
    }
    let horizon = shift_months(now.today(), OPEN_ENDED_HORIZON_MONTHS);
    let minimum = add_days(now.local_date(event.start_date), OPEN_ENDED_MIN_DAYS);
    horizon.max(minimum)
}

fn compare_rank(left: &Event, right: &Event) -> Ordering {
    left.start_date
        .cmp(&right.start_date)
        .then_with(|| left.category.priority().cmp(&right.category.priority()))
}

fn place(event: Event, window: &Window, now: &LocalNow) -> Option<Bar> {
    let start = now.local_date(event.start_date);
    let end = effective_end(&event, now);
    if end < window.start || start > window.end {
        return None;
    }

    let window_len = window.len() as i64;
    let raw_start = days_between(window.start, start);
    let raw_duration = days_between(start, end) + 1;
    let (start_offset, duration) = if raw_start < 0 {
        (0, (raw_duration + raw_start).min(window_len))
    } else {
        (raw_start, raw_duration.min(window_len - raw_start))
    };

    debug_assert!(end < start || duration >= 1, "visible bar must span at least one day");
    // Only reachable when the end precedes the start.
    if duration < 1 {
        return None;
    }

    let status = resolve(&event, now);
    Some(Bar {
        event,
        start_offset: start_offset as u32,
        duration: duration as u32,
        status,
        row: 0,
    })
}
