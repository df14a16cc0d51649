//! Document model for one visual project.
//!
//! # Responsibility
//! - Define the canonical shapes persisted and exported by the engine.
//! - Keep one node shape (`BlockNode`) for canvas, board, calendar and
//!   timeline projections.
//!
//! # Invariants
//! - Every block node maps to a known `BlockKind` descriptor.
//! - No edge references a node absent from the same project.

pub mod block;
pub mod calendar;
pub mod edge;
pub mod notebook;
pub mod project;
pub mod view;

pub use block::{
    BlockData, BlockDescriptor, BlockKind, BlockNode, LinkAttributes, MediaAttributes, NodeId,
    NoteAttributes, PanelAttributes, Position, Size, TaskAttributes, TaskPriority, TaskStatus,
    UploadedFile,
};
pub use calendar::{CalendarEvent, CalendarEventPatch, TASK_EVENT_PREFIX};
pub use edge::{Edge, EdgeId};
pub use notebook::NotebookDocument;
pub use project::{validate_graph, Analysis, Project, ProjectId, ProjectUpdate};
pub use view::ViewId;

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural validation failure for model values.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    EmptyName,
    /// An id of the named entity is blank.
    EmptyId(&'static str),
    UnknownBlockKind {
        node_id: String,
        kind: String,
    },
    DuplicateNodeId(NodeId),
    DuplicateEdgeId(EdgeId),
    DanglingEdge {
        edge_id: EdgeId,
        node_id: NodeId,
    },
    KindChange {
        from: BlockKind,
        to: String,
    },
    InvalidAttributes(String),
    InvalidEventWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "project name must not be blank"),
            Self::EmptyId(entity) => write!(f, "{entity} id must not be blank"),
            Self::UnknownBlockKind { node_id, kind } => {
                write!(f, "node {node_id} has unknown block kind `{kind}`")
            }
            Self::DuplicateNodeId(id) => write!(f, "duplicate node id: {id}"),
            Self::DuplicateEdgeId(id) => write!(f, "duplicate edge id: {id}"),
            Self::DanglingEdge { edge_id, node_id } => {
                write!(f, "edge {edge_id} references missing node {node_id}")
            }
            Self::KindChange { from, to } => {
                write!(f, "block kind cannot change from `{from}` to {to}")
            }
            Self::InvalidAttributes(details) => write!(f, "invalid block attributes: {details}"),
            Self::InvalidEventWindow { start, end } => write!(
                f,
                "event end ({}) must be >= event start ({})",
                end.to_rfc3339(),
                start.to_rfc3339()
            ),
        }
    }
}

impl Error for ModelError {}
