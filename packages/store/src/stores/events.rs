use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::models::{current_timestamp, new_id, EventItem, NewEvent};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsState {
    events: Collection<EventItem>,
}

impl EventsState {
    pub fn events(&self) -> &Collection<EventItem> {
        &self.events
    }

    pub fn add_event(&mut self, new: NewEvent) -> String {
        self.insert(new.into_event(new_id(), current_timestamp()))
    }

    pub fn insert(&mut self, event: EventItem) -> String {
        let id = event.id.clone();
        self.events.prepend(event);
        id
    }

    pub fn remove_event(&mut self, id: &str) -> Option<EventItem> {
        self.events.remove(id)
    }

    pub fn events_by_subject(&self, subject_id: &str) -> Vec<EventItem> {
        self.events.by_subject(subject_id)
    }

    /// Events starting at or after `from`, soonest first. Events with the
    /// same start keep their store order.
    pub fn upcoming(&self, from: i64) -> Vec<EventItem> {
        let mut upcoming: Vec<EventItem> = self
            .events
            .iter()
            .filter(|e| e.starts_at >= from)
            .cloned()
            .collect();
        upcoming.sort_by_key(|e| e.starts_at);
        upcoming
    }

    pub fn next(&self, from: i64) -> Option<EventItem> {
        self.upcoming(from).into_iter().next()
    }

    pub fn clear_subject(&mut self, subject_id: &str) -> usize {
        self.events.remove_by_subject(subject_id)
    }
}
