use crate::domain::models::Event;
use crate::infrastructure::error::InfraError;
use std::sync::Mutex;

/// Holds the latest event list handed over by the data-fetch layer. Input
/// order is preserved because deduplication keeps first occurrences.
pub trait EventSnapshotRepository: Send + Sync {
    fn replace_all(&self, events: Vec<Event>) -> Result<(), InfraError>;
    fn get_by_id(&self, event_id: &str) -> Result<Option<Event>, InfraError>;
    fn list_all(&self) -> Result<Vec<Event>, InfraError>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventSnapshotRepository {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEventSnapshotRepository {
    fn normalized_id(event_id: &str) -> Option<&str> {
        let normalized = event_id.trim();
        if normalized.is_empty() {
            return None;
        }
        Some(normalized)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Event>>, InfraError> {
        self.events
            .lock()
            .map_err(|error| InfraError::LockPoisoned(format!("event snapshot lock poisoned: {error}")))
    }
}

impl EventSnapshotRepository for InMemoryEventSnapshotRepository {
    fn replace_all(&self, events: Vec<Event>) -> Result<(), InfraError> {
        *self.lock()? = events;
        Ok(())
    }

    fn get_by_id(&self, event_id: &str) -> Result<Option<Event>, InfraError> {
        let Some(event_id) = Self::normalized_id(event_id) else {
            return Ok(None);
        };
        let events = self.lock()?;
        Ok(events.iter().find(|event| event.id == event_id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Event>, InfraError> {
        Ok(self.lock()?.clone())
    }
}
