use chrono::{DateTime, Days, Months, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Fixed number of day columns in a visible window.
pub const WINDOW_DAYS: usize = 38;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Limited,
    Recurring,
    Accessory,
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [
        EventCategory::Limited,
        EventCategory::Recurring,
        EventCategory::Accessory,
        EventCategory::Other,
    ];

    /// Rank used as the secondary sort key after the start date.
    pub fn priority(self) -> u8 {
        match self {
            Self::Limited => 0,
            Self::Recurring => 1,
            Self::Accessory => 2,
            Self::Other => 3,
        }
    }

    /// Recurring events are shown once per store instead of once globally.
    pub fn is_store_recurring(self) -> bool {
        matches!(self, Self::Recurring)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Limited => "limited",
            Self::Recurring => "recurring",
            Self::Accessory => "accessory",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl LifecycleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Ended => "ended",
        }
    }
}

/// List-view refinement of [`LifecycleStatus`]. Never used for bar geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Upcoming,
    Ongoing,
    LastDay,
    Ended,
}

impl From<LifecycleStatus> for DisplayStatus {
    fn from(status: LifecycleStatus) -> Self {
        match status {
            LifecycleStatus::Upcoming => Self::Upcoming,
            LifecycleStatus::Ongoing => Self::Ongoing,
            LifecycleStatus::Ended => Self::Ended,
        }
    }
}

impl DisplayStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::LastDay => "last_day",
            Self::Ended => "ended",
        }
    }

    pub fn lifecycle(self) -> LifecycleStatus {
        match self {
            Self::Upcoming => LifecycleStatus::Upcoming,
            Self::Ongoing | Self::LastDay => LifecycleStatus::Ongoing,
            Self::Ended => LifecycleStatus::Ended,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub category: EventCategory,
    pub title: String,
    #[serde(default)]
    pub stores: Vec<String>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.id, "event.id")?;
        validate_non_empty(&self.title, "event.title")?;
        for store in &self.stores {
            validate_non_empty(store, "event.stores[]")?;
        }
        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                return Err("event.end_date must be >= event.start_date".to_string());
            }
        }
        if let Some(ended_at) = self.ended_at {
            if ended_at < self.start_date {
                return Err("event.ended_at must be >= event.start_date".to_string());
            }
        }
        Ok(())
    }
}

/// The evaluation instant of one pass, paired with the display timezone that
/// defines day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalNow {
    pub instant: DateTime<Utc>,
    pub tz: Tz,
}

impl LocalNow {
    pub fn new(instant: DateTime<Utc>, tz: Tz) -> Self {
        Self { instant, tz }
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(self.instant)
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub month_end: NaiveDate,
    pub days: Vec<NaiveDate>,
}

impl Window {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WindowDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_today: bool,
    pub is_month_end: bool,
    pub in_target_month: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub event: Event,
    pub start_offset: u32,
    pub duration: u32,
    pub status: LifecycleStatus,
    pub row: usize,
}

impl Bar {
    pub fn end_offset(&self) -> u32 {
        self.start_offset + self.duration
    }
}

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

pub fn shift_months(date: NaiveDate, offset: i32) -> NaiveDate {
    let months = Months::new(offset.unsigned_abs());
    if offset >= 0 {
        date.checked_add_months(months).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_months(months).unwrap_or(NaiveDate::MIN)
    }
}

fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field_name} must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn fixed_time(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("valid datetime")
            .with_timezone(&Utc)
    }

    pub fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
    }

    pub fn utc_now(value: &str) -> LocalNow {
        LocalNow::new(fixed_time(value), Tz::UTC)
    }

    pub fn event(id: &str, category: EventCategory, start: &str) -> Event {
        Event {
            id: id.to_string(),
            category,
            title: format!("Event {id}"),
            stores: Vec::new(),
            start_date: fixed_time(start),
            end_date: None,
            ended_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn event_validate_rejects_end_before_start() {
        let mut event = event("evt-1", EventCategory::Limited, "2026-01-10T00:00:00Z");
        assert!(event.validate().is_ok());
        event.end_date = Some(fixed_time("2026-01-09T00:00:00Z"));
        assert!(event.validate().is_err());
    }

    #[test]
    fn event_validate_rejects_blank_store_key() {
        let mut event = event("evt-1", EventCategory::Recurring, "2026-01-10T00:00:00Z");
        event.stores = vec!["shinjuku".to_string(), "  ".to_string()];
        assert!(event.validate().is_err());
    }

    #[test]
    fn local_now_uses_display_timezone_for_day_granularity() {
        let now = LocalNow::new(fixed_time("2026-01-31T16:00:00Z"), chrono_tz::Asia::Tokyo);
        assert_eq!(now.today(), date("2026-02-01"));
        assert_eq!(utc_now("2026-01-31T16:00:00Z").today(), date("2026-01-31"));
    }

    #[test]
    fn shift_months_handles_negative_offsets_and_year_boundaries() {
        assert_eq!(shift_months(date("2026-01-01"), -1), date("2025-12-01"));
        assert_eq!(shift_months(date("2026-11-01"), 3), date("2027-02-01"));
        assert_eq!(shift_months(date("2026-01-31"), 1), date("2026-02-28"));
    }

    #[test]
    fn category_priority_is_a_total_order() {
        let priorities = EventCategory::ALL.map(EventCategory::priority);
        assert_eq!(priorities, [0, 1, 2, 3]);
        assert!(EventCategory::Recurring.is_store_recurring());
        assert!(!EventCategory::Limited.is_store_recurring());
    }

    #[test]
    fn event_deserializes_from_camel_case_payload() {
        let raw = r#"{
            "id": "evt-9",
            "category": "recurring",
            "title": "Weekly drop",
            "stores": ["ikebukuro"],
            "startDate": "2026-01-10T00:00:00Z",
            "endedAt": "2026-01-12T00:00:00Z"
        }"#;
        let event: Event = serde_json::from_str(raw).expect("deserialize event");
        assert_eq!(event.category, EventCategory::Recurring);
        assert_eq!(event.end_date, None);
        assert_eq!(event.ended_at, Some(fixed_time("2026-01-12T00:00:00Z")));
    }
}
