//! Notebook document model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to the document seeded into every new notebook.
pub const PRIMARY_DOCUMENT_TITLE: &str = "Main note";

/// One rich-text document. `content` is an opaque serialized payload (HTML).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NotebookDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: format!("note_{}", Uuid::new_v4().simple()),
            title: title.into(),
            content: String::new(),
        }
    }

    /// The empty primary document a notebook falls back to.
    pub fn primary() -> Self {
        Self::new(PRIMARY_DOCUMENT_TITLE)
    }
}
