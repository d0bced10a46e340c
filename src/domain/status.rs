use crate::domain::models::{DisplayStatus, Event, LifecycleStatus, LocalNow};

/// Derives the lifecycle status of `event` at `now`.
///
/// `ended_at` wins over everything else. A planned `end_date` counts as ended
/// once today is past its local date. An event with neither end field never
/// resolves to ended here.
pub fn resolve(event: &Event, now: &LocalNow) -> LifecycleStatus {
    let today = now.today();
    let past_planned_end = event
        .end_date
        .map(|end_date| today > now.local_date(end_date))
        .unwrap_or(false);
    if event.ended_at.is_some() || past_planned_end {
        return LifecycleStatus::Ended;
    }
    if today < now.local_date(event.start_date) {
        return LifecycleStatus::Upcoming;
    }
    LifecycleStatus::Ongoing
}

/// Same rules as [`resolve`], with ongoing events on the local date of their
/// planned end reported as `LastDay`.
pub fn resolve_display(event: &Event, now: &LocalNow) -> DisplayStatus {
    match resolve(event, now) {
        LifecycleStatus::Upcoming => DisplayStatus::Upcoming,
        LifecycleStatus::Ended => DisplayStatus::Ended,
        LifecycleStatus::Ongoing => {
            let is_last_day = event
                .end_date
                .map(|end_date| now.local_date(end_date) == now.today())
                .unwrap_or(false);
            if is_last_day {
                DisplayStatus::LastDay
            } else {
                DisplayStatus::Ongoing
            }
        }
    }
}
