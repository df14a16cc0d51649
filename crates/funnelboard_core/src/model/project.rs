//! Project aggregate: the single persisted document behind every view.
//!
//! # Invariants
//! - Node ids and edge ids are unique within a project.
//! - Every edge references nodes present in `nodes` (no dangling edges).
//! - `notebook_documents` is never empty once loaded into a session.

use super::block::{BlockNode, NodeId};
use super::calendar::CalendarEvent;
use super::edge::Edge;
use super::notebook::NotebookDocument;
use super::view::ViewId;
use super::ModelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Stable identifier of one stored project.
pub type ProjectId = Uuid;

/// Funnel analysis counters shown on the hub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub leads: u64,
    #[serde(default)]
    pub buyers: u64,
}

/// Root aggregate persisted by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<BlockNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, alias = "notes")]
    pub notebook_documents: Vec<NotebookDocument>,
    #[serde(default, alias = "calendar_events")]
    pub calendar_events: Vec<CalendarEvent>,
    #[serde(default, alias = "presentation_order")]
    pub presentation_order: Vec<ViewId>,
    #[serde(default)]
    pub analysis: Analysis,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updated_at")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project seeded with the default hub/canvas slideshow,
    /// sample analysis counters and one primary notebook document.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    pub fn with_id(id: ProjectId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            notebook_documents: vec![NotebookDocument::primary()],
            calendar_events: Vec::new(),
            presentation_order: vec![ViewId::Hub, ViewId::Canvas],
            analysis: Analysis {
                leads: 1000,
                buyers: 50,
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks structural invariants of the whole document.
    ///
    /// # Errors
    /// - `EmptyName` when the name is blank.
    /// - `DuplicateNodeId` / `DuplicateEdgeId` when ids repeat.
    /// - `DanglingEdge` when an edge endpoint is missing.
    /// - `InvalidEventWindow` for a stored calendar event ending before it starts.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        validate_graph(&self.nodes, &self.edges)?;
        for event in &self.calendar_events {
            event.validate()?;
        }
        Ok(())
    }

    /// Applies a save payload and stamps `updated_at`.
    pub fn apply_update(&mut self, update: ProjectUpdate, now: DateTime<Utc>) {
        self.nodes = update.nodes;
        self.edges = update.edges;
        self.presentation_order = update.presentation_order;
        self.analysis = update.analysis;
        self.notebook_documents = update.notebook_documents;
        self.calendar_events = update.calendar_events;
        self.updated_at = now;
    }
}

/// Live in-session projection of a project, as pushed on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub nodes: Vec<BlockNode>,
    pub edges: Vec<Edge>,
    pub presentation_order: Vec<ViewId>,
    pub analysis: Analysis,
    pub notebook_documents: Vec<NotebookDocument>,
    pub calendar_events: Vec<CalendarEvent>,
}

/// Checks id uniqueness and edge endpoint presence for one graph.
pub fn validate_graph(nodes: &[BlockNode], edges: &[Edge]) -> Result<(), ModelError> {
    let mut node_ids: HashSet<&NodeId> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if node.id.as_str().trim().is_empty() {
            return Err(ModelError::EmptyId("node"));
        }
        if !node_ids.insert(&node.id) {
            return Err(ModelError::DuplicateNodeId(node.id.clone()));
        }
    }

    let mut edge_ids = HashSet::with_capacity(edges.len());
    for edge in edges {
        if !edge_ids.insert(&edge.id) {
            return Err(ModelError::DuplicateEdgeId(edge.id.clone()));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint) {
                return Err(ModelError::DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
    Ok(())
}
