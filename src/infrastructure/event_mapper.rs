use crate::domain::models::{Event, EventCategory};
use crate::infrastructure::error::InfraError;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::HashSet;

/// Event as delivered by the events API. Dates are RFC 3339 instants or
/// plain `YYYY-MM-DD` dates in the display timezone.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ApiEvent {
    pub id: String,
    pub category: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stores: Option<Vec<String>>,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(rename = "endedAt", default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
}

pub fn decode_event(event: &ApiEvent, tz: Tz) -> Result<Event, InfraError> {
    let id = event.id.trim().to_string();
    let start_date = parse_event_instant(&event.start_date, "startDate", tz)?;
    let end_date = optional_instant(event.end_date.as_deref(), "endDate", tz)?;
    let ended_at = optional_instant(event.ended_at.as_deref(), "endedAt", tz)?;

    let mut seen_stores = HashSet::new();
    let stores = event
        .stores
        .iter()
        .flatten()
        .map(|store| store.trim())
        .filter(|store| !store.is_empty())
        .filter(|store| seen_stores.insert(store.to_string()))
        .map(ToOwned::to_owned)
        .collect::<Vec<_>>();

    let decoded = Event {
        id,
        category: parse_category(&event.category)?,
        title: event.title.trim().to_string(),
        stores,
        start_date,
        end_date,
        ended_at,
    };
    decoded
        .validate()
        .map_err(|error| InfraError::InvalidEvent(format!("{}: {error}", decoded.id)))?;
    Ok(decoded)
}

/// Decodes a JSON array of API events. Any invalid entry or a repeated id
/// rejects the whole payload.
pub fn decode_events(raw: &str, tz: Tz) -> Result<Vec<Event>, InfraError> {
    let payload: Vec<ApiEvent> = serde_json::from_str(raw)?;
    let mut ids = HashSet::new();
    payload
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let decoded = decode_event(event, tz).map_err(|error| match error {
                InfraError::InvalidEvent(message) => {
                    InfraError::InvalidEvent(format!("events[{index}] {message}"))
                }
                other => other,
            })?;
            if !ids.insert(decoded.id.clone()) {
                return Err(InfraError::InvalidEvent(format!(
                    "events[{index}] duplicate id {}",
                    decoded.id
                )));
            }
            Ok(decoded)
        })
        .collect()
}

fn optional_instant(
    value: Option<&str>,
    field_name: &str,
    tz: Tz,
) -> Result<Option<DateTime<Utc>>, InfraError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| parse_event_instant(value, field_name, tz))
        .transpose()
}

fn parse_event_instant(value: &str, field_name: &str, tz: Tz) -> Result<DateTime<Utc>, InfraError> {
    parse_instant(value, tz, |value| {
        InfraError::InvalidEvent(format!(
            "{field_name} '{value}' must be RFC3339 or YYYY-MM-DD"
        ))
    })
}

/// Parses an RFC 3339 instant, or a `YYYY-MM-DD` date taken as midnight in
/// `tz`. `invalid` builds the error for anything else.
pub fn parse_instant<F>(value: &str, tz: Tz, invalid: F) -> Result<DateTime<Utc>, InfraError>
where
    F: FnOnce(&str) -> InfraError,
{
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(local) = tz.from_local_datetime(&date.and_time(chrono::NaiveTime::MIN)).earliest() {
            return Ok(local.with_timezone(&Utc));
        }
    }
    Err(invalid(value))
}

fn parse_category(value: &str) -> Result<EventCategory, InfraError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "limited" => Ok(EventCategory::Limited),
        "recurring" => Ok(EventCategory::Recurring),
        "accessory" => Ok(EventCategory::Accessory),
        "other" => Ok(EventCategory::Other),
        other => Err(InfraError::InvalidEvent(format!(
            "invalid category value: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::test_support::fixed_time;

    fn sample_api_event() -> ApiEvent {
        ApiEvent {
            id: "evt-001".to_string(),
            category: "recurring".to_string(),
            title: "Weekly sticker drop".to_string(),
            stores: Some(vec!["shinjuku".to_string(), " ikebukuro ".to_string()]),
            start_date: "2026-01-10T10:00:00+09:00".to_string(),
            end_date: Some("2026-01-20".to_string()),
            ended_at: None,
        }
    }

    #[test]
    fn decode_parses_instants_and_local_dates() {
        let event = decode_event(&sample_api_event(), chrono_tz::Asia::Tokyo).expect("decode");

        assert_eq!(event.category, EventCategory::Recurring);
        assert_eq!(event.start_date, fixed_time("2026-01-10T01:00:00Z"));
        assert_eq!(event.end_date, Some(fixed_time("2026-01-19T15:00:00Z")));
        assert_eq!(event.stores, vec!["shinjuku", "ikebukuro"]);
    }

    #[test]
    fn decode_drops_blank_and_repeated_store_keys() {
        let mut raw = sample_api_event();
        raw.stores = Some(vec![
            "shinjuku".to_string(),
            "  ".to_string(),
            "shinjuku ".to_string(),
        ]);
        let event = decode_event(&raw, Tz::UTC).expect("decode");
        assert_eq!(event.stores, vec!["shinjuku"]);
    }

    #[test]
    fn decode_rejects_unknown_category_and_bad_dates() {
        let mut raw = sample_api_event();
        raw.category = "raffle".to_string();
        assert!(matches!(decode_event(&raw, Tz::UTC), Err(InfraError::InvalidEvent(_))));

        let mut raw = sample_api_event();
        raw.start_date = "next tuesday".to_string();
        assert!(decode_event(&raw, Tz::UTC).is_err());
    }

    #[test]
    fn decode_rejects_end_before_start() {
        let mut raw = sample_api_event();
        raw.end_date = Some("2026-01-01".to_string());
        assert!(matches!(decode_event(&raw, Tz::UTC), Err(InfraError::InvalidEvent(_))));
    }

    #[test]
    fn decode_events_reports_index_and_duplicates() {
        let payload = serde_json::to_string(&vec![sample_api_event(), sample_api_event()])
            .expect("serialize payload");
        match decode_events(&payload, Tz::UTC) {
            Err(InfraError::InvalidEvent(message)) => {
                assert!(message.contains("events[1]"));
                assert!(message.contains("duplicate"));
            }
            other => panic!("expected invalid event error, got {other:?}"),
        }
    }

    #[test]
    fn decode_events_accepts_minimal_payload() {
        let raw = r#"[{"id": "e1", "category": "limited", "title": "Plush", "startDate": "2026-01-10"}]"#;
        let events = decode_events(raw, Tz::UTC).expect("decode payload");
        assert_eq!(events.len(), 1);
        assert!(events[0].stores.is_empty());
        assert_eq!(events[0].end_date, None);
    }

    #[test]
    fn validation_error_names_the_trimmed_id() {
        let mut raw = sample_api_event();
        raw.id = "  evt-009 ".to_string();
        raw.end_date = Some("2026-01-01".to_string());
        match decode_event(&raw, Tz::UTC) {
            Err(InfraError::InvalidEvent(message)) => assert!(message.starts_with("evt-009: ")),
            other => panic!("expected invalid event error, got {other:?}"),
        }
    }

    #[test]
    fn parse_instant_uses_caller_error() {
        let parsed = parse_instant(" 2026-01-10 ", chrono_tz::Asia::Tokyo, |_| {
            InfraError::InvalidInput("unused".to_string())
        })
        .expect("parse date");
        assert_eq!(parsed, fixed_time("2026-01-09T15:00:00Z"));

        let error = parse_instant("soon", Tz::UTC, |value| {
            InfraError::InvalidInput(format!("bad '{value}'"))
        });
        assert!(matches!(error, Err(InfraError::InvalidInput(message)) if message == "bad 'soon'"));
    }
}
