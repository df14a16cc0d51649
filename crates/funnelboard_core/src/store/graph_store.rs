//! Document graph store.
//!
//! # Responsibility
//! - Own the canonical node/edge collections and the single-node selection.
//! - Consult the quota gate before admitting a node.
//! - Push an undo snapshot before every node data update and node deletion.
//!
//! # Invariants
//! - No edge references a missing node after any operation returns.
//! - Every method validates fully before mutating; failures leave the graph
//!   untouched.
//! - Node creation and edge-only operations are not recorded in history.
//! - At most one node carries `selected = true`, and it is the one
//!   `selected_node()` returns.

use crate::model::{validate_graph, BlockKind, BlockNode, Edge, EdgeId, ModelError, NodeId};
use crate::quota::{Plan, QuotaGate, QuotaRejection};
use crate::store::history::{GraphSnapshot, UndoHistory};
use log::{info, warn};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    NodeNotFound(NodeId),
    EdgeNotFound(EdgeId),
    DuplicateNode(NodeId),
    DuplicateEdge(EdgeId),
    /// Edge endpoint does not name an existing node.
    MissingEndpoint(NodeId),
    Model(ModelError),
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::EdgeNotFound(id) => write!(f, "edge not found: {id}"),
            Self::DuplicateNode(id) => write!(f, "node already exists: {id}"),
            Self::DuplicateEdge(id) => write!(f, "edge already exists: {id}"),
            Self::MissingEndpoint(id) => write!(f, "edge endpoint not found: {id}"),
            Self::Model(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GraphError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for GraphError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

/// Outcome of `GraphStore::add_node`.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAdmission {
    Added(NodeId),
    Rejected(QuotaRejection),
}

impl NodeAdmission {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}

#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: Vec<BlockNode>,
    edges: Vec<Edge>,
    selected: Option<NodeId>,
    history: UndoHistory,
    quota: QuotaGate,
    plan: Plan,
}

impl GraphStore {
    pub fn new(quota: QuotaGate, plan: Plan, history_capacity: usize) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            selected: None,
            history: UndoHistory::new(history_capacity),
            quota,
            plan,
        }
    }

    /// Replaces the whole graph with a loaded one and clears history.
    ///
    /// # Errors
    /// - `GraphError::Model` when ids repeat or an edge dangles.
    pub fn load(&mut self, nodes: Vec<BlockNode>, edges: Vec<Edge>) -> GraphResult<()> {
        validate_graph(&nodes, &edges)?;
        self.nodes = nodes;
        self.edges = edges;
        self.history.clear();
        self.sync_selection_from_flags();
        Ok(())
    }

    pub fn nodes(&self) -> &[BlockNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&BlockNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }

    pub fn set_plan(&mut self, plan: Plan) {
        self.plan = plan;
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn media_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.kind().is_media()).count()
    }

    /// Node currently selected, read live from the node collection.
    pub fn selected_node(&self) -> Option<&BlockNode> {
        self.selected.as_ref().and_then(|id| self.node(id))
    }

    /// Current graph as an owned snapshot.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Appends `node` when the quota gate admits it.
    ///
    /// Creation is not undoable, so no snapshot is pushed.
    ///
    /// # Errors
    /// - `GraphError::DuplicateNode` when the id is already taken.
    pub fn add_node(&mut self, mut node: BlockNode) -> GraphResult<NodeAdmission> {
        if self.node(&node.id).is_some() {
            return Err(GraphError::DuplicateNode(node.id));
        }

        let kind = node.kind();
        if let Err(rejection) =
            self.quota
                .admit(self.nodes.len(), self.media_count(), kind, self.plan)
        {
            warn!(
                "event=node_add module=graph status=rejected kind={} reason={} node_count={}",
                kind,
                rejection.code(),
                self.nodes.len()
            );
            return Ok(NodeAdmission::Rejected(rejection));
        }

        node.selected = false;
        let id = node.id.clone();
        self.nodes.push(node);
        info!(
            "event=node_add module=graph status=ok node_id={} kind={} node_count={}",
            id,
            kind,
            self.nodes.len()
        );
        Ok(NodeAdmission::Added(id))
    }

    /// Merges `patch` into the attribute bag of node `id`.
    ///
    /// Pushes the pre-update graph to history.
    ///
    /// # Errors
    /// - `GraphError::NodeNotFound` for unknown ids.
    /// - `GraphError::Model` when the patch changes the kind or has bad shapes.
    pub fn update_node_data(&mut self, id: &NodeId, patch: &Map<String, Value>) -> GraphResult<()> {
        let index = self.index_of(id)?;
        let merged = self.nodes[index].data.merged(patch)?;

        let snapshot = self.snapshot();
        self.history.push(snapshot);
        self.nodes[index].data = merged;
        info!(
            "event=node_update module=graph status=ok node_id={} keys={} history_len={}",
            id,
            patch.len(),
            self.history.len()
        );
        Ok(())
    }

    /// Moves node `id` to `position`. Layout changes are not undoable.
    pub fn move_node(&mut self, id: &NodeId, x: f64, y: f64) -> GraphResult<()> {
        let index = self.index_of(id)?;
        self.nodes[index].position.x = x;
        self.nodes[index].position.y = y;
        Ok(())
    }

    /// Removes node `id` and every edge touching it in one step.
    ///
    /// Pushes the pre-delete graph to history and clears the selection when it
    /// pointed at the removed node.
    pub fn delete_node(&mut self, id: &NodeId) -> GraphResult<()> {
        let index = self.index_of(id)?;

        let snapshot = self.snapshot();
        self.history.push(snapshot);

        self.nodes.remove(index);
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(id));
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        info!(
            "event=node_delete module=graph status=ok node_id={} edges_removed={} history_len={}",
            id,
            before - self.edges.len(),
            self.history.len()
        );
        Ok(())
    }

    /// Connects two existing nodes with a freshly generated edge id.
    pub fn connect(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        kind: impl Into<String>,
    ) -> GraphResult<EdgeId> {
        let edge = Edge::new(EdgeId::generate(), source.clone(), target.clone(), kind);
        self.add_edge(edge)
    }

    /// Inserts a fully specified edge.
    ///
    /// # Errors
    /// - `GraphError::MissingEndpoint` when either endpoint is absent.
    /// - `GraphError::DuplicateEdge` when the id is already taken.
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<EdgeId> {
        for endpoint in [&edge.source, &edge.target] {
            if self.node(endpoint).is_none() {
                return Err(GraphError::MissingEndpoint(endpoint.clone()));
            }
        }
        if self.edges.iter().any(|existing| existing.id == edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }

        let id = edge.id.clone();
        info!(
            "event=edge_add module=graph status=ok edge_id={} source={} target={}",
            id, edge.source, edge.target
        );
        self.edges.push(edge);
        Ok(id)
    }

    pub fn delete_edge(&mut self, id: &EdgeId) -> GraphResult<()> {
        let index = self
            .edges
            .iter()
            .position(|edge| &edge.id == id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;
        self.edges.remove(index);
        info!("event=edge_delete module=graph status=ok edge_id={}", id);
        Ok(())
    }

    /// Selects node `id`, or clears the selection on `None`.
    ///
    /// Selecting an unknown id is a no-op.
    pub fn select_node(&mut self, id: Option<&NodeId>) {
        match id {
            None => {
                for node in &mut self.nodes {
                    node.selected = false;
                }
                self.selected = None;
            }
            Some(id) => {
                if self.node(id).is_none() {
                    return;
                }
                for node in &mut self.nodes {
                    node.selected = &node.id == id;
                }
                self.selected = Some(id.clone());
            }
        }
    }

    /// Restores the most recent snapshot wholesale.
    ///
    /// Returns `false` when history is empty.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
        self.sync_selection_from_flags();
        info!(
            "event=undo module=graph status=ok node_count={} edge_count={} history_len={}",
            self.nodes.len(),
            self.edges.len(),
            self.history.len()
        );
        true
    }

    /// Task-kind nodes in insertion order.
    pub fn task_nodes(&self) -> impl Iterator<Item = &BlockNode> {
        self.nodes
            .iter()
            .filter(|node| node.kind() == BlockKind::Task)
    }

    fn index_of(&self, id: &NodeId) -> GraphResult<usize> {
        self.nodes
            .iter()
            .position(|node| &node.id == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))
    }

    fn sync_selection_from_flags(&mut self) {
        self.selected = self
            .nodes
            .iter()
            .find(|node| node.selected)
            .map(|node| node.id.clone());
        if let Some(selected) = self.selected.clone() {
            for node in &mut self.nodes {
                node.selected = node.id == selected;
            }
        }
    }
}
