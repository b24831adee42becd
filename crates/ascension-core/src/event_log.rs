//! Append-only world event log.
//!
//! The log numbers every draft with the next [`EventId`] and stamps it with
//! the world and day. Ids start at 1 so that 0 can mean "nothing seen yet"
//! in goal state.

use ascension_types::{EventDraft, EventId, WorldEvent, WorldId};
use tracing::debug;

use crate::error::ClockError;

/// In-memory event log for one world.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventLog {
    /// World every event belongs to.
    world_id: WorldId,
    /// Events in id order.
    events: Vec<WorldEvent>,
}

impl EventLog {
    /// An empty log for `world_id`.
    pub const fn new(world_id: WorldId) -> Self {
        Self {
            world_id,
            events: Vec::new(),
        }
    }

    /// Number and append a draft.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::EventIdOverflow`] if ids are exhausted.
    pub fn append(&mut self, day: u64, draft: EventDraft) -> Result<EventId, ClockError> {
        let id = self.last_id().next().ok_or(ClockError::EventIdOverflow)?;
        debug!(%id, day, event_type = %draft.event_type, "event appended");
        self.events.push(WorldEvent {
            id,
            world_id: self.world_id,
            subject: draft.subject,
            event_type: draft.event_type,
            day,
            payload: draft.payload,
        });
        Ok(id)
    }

    /// Append several drafts in order.
    ///
    /// # Errors
    ///
    /// As for [`append`](Self::append).
    pub fn append_all(
        &mut self,
        day: u64,
        drafts: impl IntoIterator<Item = EventDraft>,
    ) -> Result<Vec<EventId>, ClockError> {
        drafts
            .into_iter()
            .map(|draft| self.append(day, draft))
            .collect()
    }

    /// Every event, in id order.
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    /// Events with an id above `after`.
    pub fn since(&self, after: EventId) -> &[WorldEvent] {
        let start = self.events.partition_point(|event| event.id <= after);
        self.events.get(start..).unwrap_or_default()
    }

    /// Events that happened on `day`.
    pub fn on_day(&self, day: u64) -> impl Iterator<Item = &WorldEvent> {
        self.events.iter().filter(move |event| event.day == day)
    }

    /// Look an event up by id.
    pub fn get(&self, id: EventId) -> Option<&WorldEvent> {
        self.events
            .binary_search_by_key(&id, |event| event.id)
            .ok()
            .and_then(|index| self.events.get(index))
    }

    /// Id of the newest event, 0 when empty.
    pub fn last_id(&self) -> EventId {
        self.events.last().map(|event| event.id).unwrap_or_default()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
