use crate::domain::models::{DisplayStatus, Event, EventCategory, LifecycleStatus};

pub trait BarPalette: Send + Sync {
    fn color(&self, category: EventCategory, status: LifecycleStatus) -> String;
}

pub trait StatusLabels: Send + Sync {
    fn label(&self, status: DisplayStatus) -> String;
}

pub trait EventRouter: Send + Sync {
    fn route(&self, event: &Event) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPalette;

impl BarPalette for DefaultPalette {
    fn color(&self, category: EventCategory, status: LifecycleStatus) -> String {
        let color = match (status, category) {
            (LifecycleStatus::Ended, _) => "#9e9e9e",
            (LifecycleStatus::Upcoming, EventCategory::Limited) => "#f48fb1",
            (LifecycleStatus::Upcoming, EventCategory::Recurring) => "#90caf9",
            (LifecycleStatus::Upcoming, EventCategory::Accessory) => "#ffe082",
            (LifecycleStatus::Upcoming, EventCategory::Other) => "#b0bec5",
            (LifecycleStatus::Ongoing, EventCategory::Limited) => "#e91e63",
            (LifecycleStatus::Ongoing, EventCategory::Recurring) => "#1e88e5",
            (LifecycleStatus::Ongoing, EventCategory::Accessory) => "#ffb300",
            (LifecycleStatus::Ongoing, EventCategory::Other) => "#607d8b",
        };
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl Locale {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ja" | "ja-jp" => Some(Self::Ja),
            "en" | "en-us" | "en-gb" => Some(Self::En),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalizedStatusLabels {
    locale: Locale,
}

impl LocalizedStatusLabels {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl StatusLabels for LocalizedStatusLabels {
    fn label(&self, status: DisplayStatus) -> String {
        let label = match (self.locale, status) {
            (Locale::Ja, DisplayStatus::Upcoming) => "開催予定",
            (Locale::Ja, DisplayStatus::Ongoing) => "開催中",
            (Locale::Ja, DisplayStatus::LastDay) => "本日最終日",
            (Locale::Ja, DisplayStatus::Ended) => "終了",
            (Locale::En, DisplayStatus::Upcoming) => "Upcoming",
            (Locale::En, DisplayStatus::Ongoing) => "Ongoing",
            (Locale::En, DisplayStatus::LastDay) => "Last day",
            (Locale::En, DisplayStatus::Ended) => "Ended",
        };
        label.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventDetailRouter;

impl EventRouter for EventDetailRouter {
    fn route(&self, event: &Event) -> String {
        format!("/events/{}", event.id)
    }
}
