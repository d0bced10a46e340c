use crate::domain::label::TimelineMetrics;
use crate::infrastructure::error::InfraError;
use crate::infrastructure::lookup::Locale;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const APP_JSON: &str = "app.json";
const TIMELINE_JSON: &str = "timeline.json";
const DEFAULT_APP_NAME: &str = "Event Timeline";

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigBundle {
    pub app: serde_json::Value,
    pub timeline: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSettings {
    pub app_name: String,
    pub timezone: Tz,
    pub locale: Locale,
    pub metrics: TimelineMetrics,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            timezone: chrono_tz::Asia::Tokyo,
            locale: Locale::Ja,
            metrics: TimelineMetrics::default(),
        }
    }
}

fn default_files() -> HashMap<&'static str, serde_json::Value> {
    let metrics = TimelineMetrics::default();
    HashMap::from([
        (
            APP_JSON,
            serde_json::json!({
                "schema": 1,
                "appName": DEFAULT_APP_NAME,
                "timezone": "Asia/Tokyo",
                "locale": "ja"
            }),
        ),
        (
            TIMELINE_JSON,
            serde_json::json!({
                "schema": 1,
                "dayColumnWidth": metrics.day_column_width,
                "labelReservePx": metrics.label_reserve,
                "dragThresholdPx": metrics.drag_threshold,
                "scrollSettleMs": metrics.scroll_settle_ms
            }),
        ),
    ])
}

pub fn ensure_default_configs(config_dir: &Path) -> Result<(), InfraError> {
    fs::create_dir_all(config_dir)?;
    for (name, value) in default_files() {
        let path = config_dir.join(name);
        if !path.exists() {
            let formatted = serde_json::to_string_pretty(&value)?;
            fs::write(path, format!("{formatted}\n"))?;
        }
    }
    Ok(())
}

fn read_config(path: &Path) -> Result<serde_json::Value, InfraError> {
    let raw = fs::read_to_string(path)?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    let schema = parsed
        .get("schema")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| InfraError::InvalidConfig(format!("missing schema in {}", path.display())))?;
    if schema != 1 {
        return Err(InfraError::InvalidConfig(format!(
            "unsupported schema {} in {}",
            schema,
            path.display()
        )));
    }
    Ok(parsed)
}

pub fn load_configs(config_dir: &Path) -> Result<ConfigBundle, InfraError> {
    Ok(ConfigBundle {
        app: read_config(&config_dir.join(APP_JSON))?,
        timeline: read_config(&config_dir.join(TIMELINE_JSON))?,
    })
}

/// Reads typed settings. Absent or malformed numeric fields fall back to
/// defaults; an unknown timezone is rejected.
pub fn load_settings(config_dir: &Path) -> Result<TimelineSettings, InfraError> {
    let bundle = load_configs(config_dir)?;
    let mut settings = TimelineSettings::default();

    if let Some(app_name) = non_empty_str(&bundle.app, "appName") {
        settings.app_name = app_name.to_string();
    }
    if let Some(timezone) = non_empty_str(&bundle.app, "timezone") {
        settings.timezone = parse_timezone(timezone)?;
    }
    if let Some(locale) = non_empty_str(&bundle.app, "locale").and_then(Locale::parse) {
        settings.locale = locale;
    }

    let metrics = &mut settings.metrics;
    if let Some(value) = positive_f64(&bundle.timeline, "dayColumnWidth") {
        metrics.day_column_width = value;
    }
    if let Some(value) = non_negative_f64(&bundle.timeline, "labelReservePx") {
        metrics.label_reserve = value;
    }
    if let Some(value) = non_negative_f64(&bundle.timeline, "dragThresholdPx") {
        metrics.drag_threshold = value;
    }
    if let Some(value) = bundle
        .timeline
        .get("scrollSettleMs")
        .and_then(serde_json::Value::as_u64)
    {
        metrics.scroll_settle_ms = value;
    }
    metrics.validate().map_err(InfraError::InvalidConfig)?;

    Ok(settings)
}

pub fn parse_timezone(value: &str) -> Result<Tz, InfraError> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|error| InfraError::InvalidConfig(format!("invalid timezone '{value}': {error}")))
}

fn non_empty_str<'a>(value: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn positive_f64(value: &serde_json::Value, key: &str) -> Option<f64> {
    value
        .get(key)
        .and_then(serde_json::Value::as_f64)
        .filter(|value| value.is_finite() && *value > 0.0)
}

fn non_negative_f64(value: &serde_json::Value, key: &str) -> Option<f64> {
    value
        .get(key)
        .and_then(serde_json::Value::as_f64)
        .filter(|value| value.is_finite() && *value >= 0.0)
}
