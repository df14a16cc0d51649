//! Calendar event domain model.
//!
//! # Invariants
//! - `end`, when set, is not earlier than `start`.
//! - Ids starting with `TASK_EVENT_PREFIX` belong to synthesized task-deadline
//!   events and are never stored.

use super::ModelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id prefix reserved for events synthesized from task deadlines.
pub const TASK_EVENT_PREFIX: &str = "task-";

/// Default color assigned to user-created events.
pub const DEFAULT_EVENT_COLOR: &str = "#3B82F6";

/// One calendar entry; stored when user-created, derived when synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    pub color: String,
    #[serde(default)]
    pub completed: bool,
}

impl CalendarEvent {
    /// Creates a timed, not-completed event with the default color.
    pub fn new(id: impl Into<String>, title: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end: None,
            all_day: false,
            color: DEFAULT_EVENT_COLOR.to_string(),
            completed: false,
        }
    }

    /// Whether this id is reserved for synthesized task-deadline events.
    pub fn is_synthesized_id(id: &str) -> bool {
        id.starts_with(TASK_EVENT_PREFIX)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.id.trim().is_empty() {
            return Err(ModelError::EmptyId("calendar event"));
        }
        if let Some(end) = self.end {
            if end < self.start {
                return Err(ModelError::InvalidEventWindow {
                    start: self.start,
                    end,
                });
            }
        }
        Ok(())
    }
}

/// Partial update for a stored calendar event. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEventPatch {
    pub title: Option<String>,
    pub start: Option<DateTime<Utc>>,
    /// `Some(None)` clears the end timestamp.
    pub end: Option<Option<DateTime<Utc>>>,
    pub all_day: Option<bool>,
    pub color: Option<String>,
    pub completed: Option<bool>,
}

impl CalendarEventPatch {
    /// Returns `event` with this patch applied; the input is left untouched.
    pub fn applied_to(&self, event: &CalendarEvent) -> CalendarEvent {
        let mut next = event.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(start) = self.start {
            next.start = start;
        }
        if let Some(end) = self.end {
            next.end = end;
        }
        if let Some(all_day) = self.all_day {
            next.all_day = all_day;
        }
        if let Some(color) = &self.color {
            next.color = color.clone();
        }
        if let Some(completed) = self.completed {
            next.completed = completed;
        }
        next
    }
}
