//! Read-only board preview embedded by board-panel nodes on the canvas.
//!
//! Built from `project_board`, so the preview can never disagree with the
//! board view.

use crate::model::BlockNode;
use crate::projection::board::{project_board, BoardColumn};

/// Tasks shown per column inside a panel node.
pub const PANEL_PREVIEW_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct PanelColumn<'a> {
    pub column: BoardColumn,
    /// Full number of tasks in the column.
    pub count: usize,
    /// First `PANEL_PREVIEW_LIMIT` tasks of the column.
    pub tasks: Vec<&'a BlockNode>,
}

pub fn project_panel_preview(nodes: &[BlockNode]) -> Vec<PanelColumn<'_>> {
    let board = project_board(nodes);
    board
        .iter()
        .map(|(column, tasks)| PanelColumn {
            column,
            count: tasks.len(),
            tasks: tasks.iter().take(PANEL_PREVIEW_LIMIT).copied().collect(),
        })
        .collect()
}
