//! Board columns: partition of task nodes into three fixed status buckets.
//!
//! # Invariants
//! - Every task node lands in exactly one column.
//! - Absent or unrecognized statuses fall into the first column.
//! - Within a column, nodes keep their order in the node collection.

use crate::model::{BlockNode, TaskStatus};

/// Fixed board bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardColumn {
    Todo,
    Doing,
    Done,
}

impl BoardColumn {
    pub const ALL: [BoardColumn; 3] = [BoardColumn::Todo, BoardColumn::Doing, BoardColumn::Done];

    /// Column title; equal to the status wire value it collects.
    pub fn title(self) -> &'static str {
        match self {
            Self::Todo => TaskStatus::TODO,
            Self::Doing => TaskStatus::DOING,
            Self::Done => TaskStatus::DONE,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Todo => 0,
            Self::Doing => 1,
            Self::Done => 2,
        }
    }

    /// Bucket for an optional status value.
    pub fn for_status(status: Option<&TaskStatus>) -> Self {
        match status {
            Some(TaskStatus::Doing) => Self::Doing,
            Some(TaskStatus::Done) => Self::Done,
            Some(TaskStatus::Todo) | Some(TaskStatus::Unrecognized(_)) | None => Self::Todo,
        }
    }
}

/// Read model of the task board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumns<'a> {
    columns: [Vec<&'a BlockNode>; 3],
}

impl<'a> BoardColumns<'a> {
    pub fn column(&self, column: BoardColumn) -> &[&'a BlockNode] {
        &self.columns[column.index()]
    }

    /// Columns in display order with their tasks.
    pub fn iter(&self) -> impl Iterator<Item = (BoardColumn, &[&'a BlockNode])> + '_ {
        BoardColumn::ALL
            .into_iter()
            .map(move |column| (column, self.column(column)))
    }

    /// Length of the longest column.
    pub fn max_len(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }
}

/// Partitions all task-kind nodes into board columns.
pub fn project_board(nodes: &[BlockNode]) -> BoardColumns<'_> {
    let mut columns: [Vec<&BlockNode>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for node in nodes {
        if let Some(task) = node.data.as_task() {
            let column = BoardColumn::for_status(task.status.as_ref());
            columns[column.index()].push(node);
        }
    }
    BoardColumns { columns }
}
