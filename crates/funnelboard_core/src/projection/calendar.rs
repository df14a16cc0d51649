//! Calendar read model: stored events followed by synthesized task deadlines.
//!
//! # Invariants
//! - One synthesized entry per task node with a deadline, rebuilt from scratch
//!   on every call.
//! - Synthesized ids carry `TASK_EVENT_PREFIX`; their `completed` flag mirrors
//!   the task's terminal status.
//! - Stored events are copied, never mutated.

use crate::model::{BlockNode, CalendarEvent, NodeId, TASK_EVENT_PREFIX};

/// Color of synthesized task-deadline entries.
pub const TASK_EVENT_COLOR: &str = "#9B59B6";
/// Title used when a task has no label.
pub const UNTITLED_TASK_TITLE: &str = "Untitled task";

/// Where a calendar entry came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOrigin {
    Stored,
    /// Read-only projection of this task node's deadline.
    TaskDeadline(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub event: CalendarEvent,
    pub origin: EntryOrigin,
}

impl CalendarEntry {
    pub fn is_read_only(&self) -> bool {
        matches!(self.origin, EntryOrigin::TaskDeadline(_))
    }
}

/// Id of the entry synthesized for task `node_id`.
pub fn synthesized_event_id(node_id: &NodeId) -> String {
    format!("{TASK_EVENT_PREFIX}{node_id}")
}

/// Builds the full calendar read model.
pub fn project_calendar(nodes: &[BlockNode], stored: &[CalendarEvent]) -> Vec<CalendarEntry> {
    let stored_entries = stored.iter().map(|event| CalendarEntry {
        event: event.clone(),
        origin: EntryOrigin::Stored,
    });

    let task_entries = nodes.iter().filter_map(|node| {
        let task = node.data.as_task()?;
        let deadline = task.deadline?;
        Some(CalendarEntry {
            event: CalendarEvent {
                id: synthesized_event_id(&node.id),
                title: task
                    .label
                    .clone()
                    .unwrap_or_else(|| UNTITLED_TASK_TITLE.to_string()),
                start: deadline,
                end: None,
                all_day: true,
                color: TASK_EVENT_COLOR.to_string(),
                completed: task.status.as_ref().is_some_and(|status| status.is_done()),
            },
            origin: EntryOrigin::TaskDeadline(node.id.clone()),
        })
    });

    stored_entries.chain(task_entries).collect()
}
