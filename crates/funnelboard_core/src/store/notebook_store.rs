//! Notebook store: ordered rich-text documents with an active cursor.
//!
//! # Invariants
//! - At least one document exists at all times.
//! - `current_index` always points at an existing document.
//! - The dirty flag describes the active document only; switching documents
//!   resets it.

use crate::model::NotebookDocument;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotebookError {
    IndexOutOfRange { index: usize, len: usize },
    /// The last remaining document cannot be deleted.
    LastDocument,
}

impl Display for NotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "notebook index {index} out of range for {len} documents")
            }
            Self::LastDocument => write!(f, "the last notebook document cannot be deleted"),
        }
    }
}

impl Error for NotebookError {}

#[derive(Debug, Clone)]
pub struct NotebookStore {
    documents: Vec<NotebookDocument>,
    current_index: usize,
    dirty: bool,
    autosave: bool,
}

impl Default for NotebookStore {
    fn default() -> Self {
        Self {
            documents: vec![NotebookDocument::primary()],
            current_index: 0,
            dirty: false,
            autosave: true,
        }
    }
}

impl NotebookStore {
    /// Replaces the documents, falling back to one primary document when empty.
    pub fn load(&mut self, documents: Vec<NotebookDocument>) {
        self.documents = if documents.is_empty() {
            vec![NotebookDocument::primary()]
        } else {
            documents
        };
        self.current_index = 0;
        self.dirty = false;
    }

    pub fn documents(&self) -> &[NotebookDocument] {
        &self.documents
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &NotebookDocument {
        &self.documents[self.current_index]
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the active document as edited since its last save.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn autosave_enabled(&self) -> bool {
        self.autosave
    }

    pub fn toggle_autosave(&mut self) -> bool {
        self.autosave = !self.autosave;
        self.autosave
    }

    /// Overwrites the active document and clears the dirty flag.
    pub fn save(&mut self, title: impl Into<String>, content: impl Into<String>) {
        let document = &mut self.documents[self.current_index];
        document.title = title.into();
        document.content = content.into();
        self.dirty = false;
        info!(
            "event=notebook_save module=notebook status=ok index={} document_id={}",
            self.current_index, document.id
        );
    }

    /// Saves on editor blur when autosave is on. Returns whether it saved.
    pub fn on_editor_blur(&mut self, title: impl Into<String>, content: impl Into<String>) -> bool {
        if !self.autosave {
            return false;
        }
        self.save(title, content);
        true
    }

    pub fn set_current_index(&mut self, index: usize) -> Result<(), NotebookError> {
        if index >= self.documents.len() {
            return Err(NotebookError::IndexOutOfRange {
                index,
                len: self.documents.len(),
            });
        }
        self.current_index = index;
        self.dirty = false;
        Ok(())
    }

    /// Appends a new empty document and makes it active.
    pub fn add_document(&mut self, title: impl Into<String>) -> usize {
        self.documents.push(NotebookDocument::new(title));
        self.current_index = self.documents.len() - 1;
        self.dirty = false;
        info!(
            "event=notebook_add module=notebook status=ok count={}",
            self.documents.len()
        );
        self.current_index
    }

    /// Deletes the active document; the previous neighbour becomes active.
    pub fn delete_current(&mut self) -> Result<NotebookDocument, NotebookError> {
        if self.documents.len() <= 1 {
            return Err(NotebookError::LastDocument);
        }
        let removed = self.documents.remove(self.current_index);
        self.current_index = self.current_index.saturating_sub(1);
        self.dirty = false;
        info!(
            "event=notebook_delete module=notebook status=ok count={}",
            self.documents.len()
        );
        Ok(removed)
    }
}
