//! Bounded undo history of whole-graph snapshots.
//!
//! # Invariants
//! - Holds at most `capacity` snapshots; pushing beyond evicts the oldest.
//! - Snapshots are immutable captures of `{nodes, edges}` taken before a
//!   mutation; restoring one replaces the live graph wholesale.
//! - Only the graph store pushes snapshots. Notebook, calendar and
//!   presentation state are outside this history.

use crate::model::{BlockNode, Edge};
use std::collections::VecDeque;

/// Immutable capture of the graph collections.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSnapshot {
    pub nodes: Vec<BlockNode>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: VecDeque<GraphSnapshot>,
    capacity: usize,
}

impl UndoHistory {
    /// Creates an empty history. A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: GraphSnapshot) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Pops the most recent snapshot.
    pub fn pop(&mut self) -> Option<GraphSnapshot> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
