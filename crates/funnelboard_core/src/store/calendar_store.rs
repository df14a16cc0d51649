//! Stored (user-created) calendar events.
//!
//! # Invariants
//! - Event ids are unique.
//! - Ids carrying the synthesized task prefix are never stored: those events
//!   are projections of task deadlines and are read-only.

use crate::model::{CalendarEvent, CalendarEventPatch, ModelError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarError {
    EventNotFound(String),
    DuplicateEvent(String),
    /// The id belongs to a synthesized task-deadline event.
    ReadOnlyEvent(String),
    Model(ModelError),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventNotFound(id) => write!(f, "calendar event not found: {id}"),
            Self::DuplicateEvent(id) => write!(f, "calendar event already exists: {id}"),
            Self::ReadOnlyEvent(id) => {
                write!(f, "calendar event {id} is derived from a task and is read-only")
            }
            Self::Model(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CalendarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for CalendarError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CalendarStore {
    events: Vec<CalendarEvent>,
}

impl CalendarStore {
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Replaces all stored events after validating every one of them.
    pub fn set_events(&mut self, events: Vec<CalendarEvent>) -> Result<(), CalendarError> {
        for (index, event) in events.iter().enumerate() {
            Self::ensure_storable(event)?;
            if events[..index].iter().any(|other| other.id == event.id) {
                return Err(CalendarError::DuplicateEvent(event.id.clone()));
            }
        }
        self.events = events;
        Ok(())
    }

    pub fn add_event(&mut self, event: CalendarEvent) -> Result<(), CalendarError> {
        Self::ensure_storable(&event)?;
        if self.position(&event.id).is_some() {
            return Err(CalendarError::DuplicateEvent(event.id));
        }
        info!(
            "event=calendar_add module=calendar status=ok event_id={}",
            event.id
        );
        self.events.push(event);
        Ok(())
    }

    pub fn update_event(
        &mut self,
        id: &str,
        patch: &CalendarEventPatch,
    ) -> Result<(), CalendarError> {
        if CalendarEvent::is_synthesized_id(id) {
            return Err(CalendarError::ReadOnlyEvent(id.to_string()));
        }
        let index = self
            .position(id)
            .ok_or_else(|| CalendarError::EventNotFound(id.to_string()))?;
        let next = patch.applied_to(&self.events[index]);
        next.validate()?;
        self.events[index] = next;
        info!("event=calendar_update module=calendar status=ok event_id={id}");
        Ok(())
    }

    pub fn delete_event(&mut self, id: &str) -> Result<(), CalendarError> {
        if CalendarEvent::is_synthesized_id(id) {
            return Err(CalendarError::ReadOnlyEvent(id.to_string()));
        }
        let index = self
            .position(id)
            .ok_or_else(|| CalendarError::EventNotFound(id.to_string()))?;
        self.events.remove(index);
        info!("event=calendar_delete module=calendar status=ok event_id={id}");
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.events.iter().position(|event| event.id == id)
    }

    fn ensure_storable(event: &CalendarEvent) -> Result<(), CalendarError> {
        if CalendarEvent::is_synthesized_id(&event.id) {
            return Err(CalendarError::ReadOnlyEvent(event.id.clone()));
        }
        event.validate()?;
        Ok(())
    }
}
