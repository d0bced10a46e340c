use crate::domain::models::{Event, EventCategory};
use std::collections::HashSet;

const NO_STORE_KEY_PREFIX: &str = "no-store::";

/// Collapses store-recurring events so each store surfaces at most once.
pub fn dedupe(events: &[Event]) -> Vec<Event> {
    dedupe_by(events, |category| category.is_store_recurring())
}

/// Keeps the first recurring event per store key, in input order.
///
/// A recurring event is dropped as soon as any of its stores was already
/// claimed; otherwise it claims all of them. Recurring events without stores
/// are keyed by title. Events for which `is_recurring` is false pass through.
pub fn dedupe_by<F>(events: &[Event], is_recurring: F) -> Vec<Event>
where
    F: Fn(EventCategory) -> bool,
{
    let mut seen = HashSet::<String>::new();
    events
        .iter()
        .filter(|event| {
            if !is_recurring(event.category) {
                return true;
            }
            let keys = store_keys(event);
            if keys.iter().any(|key| seen.contains(key)) {
                return false;
            }
            seen.extend(keys);
            true
        })
        .cloned()
        .collect()
}

fn store_keys(event: &Event) -> Vec<String> {
    if event.stores.is_empty() {
        return vec![format!("{NO_STORE_KEY_PREFIX}{}", event.title)];
    }
    event.stores.clone()
}
