//! In-memory stores owned by one editing session.
//!
//! # Responsibility
//! - Hold the mutable state of the open project, split by concern.
//! - Keep the undo history an explicit collaborator of the graph store only.
//!
//! # Invariants
//! - Only `GraphStore` mutates nodes and edges; other components read them
//!   through its accessors.
//! - Notebook, calendar and presentation mutations are never undoable.

pub mod calendar_store;
pub mod graph_store;
pub mod history;
pub mod notebook_store;
pub mod presentation;

pub use calendar_store::{CalendarError, CalendarStore};
pub use graph_store::{GraphError, GraphResult, GraphStore, NodeAdmission};
pub use history::{GraphSnapshot, UndoHistory};
pub use notebook_store::{NotebookError, NotebookStore};
pub use presentation::{PresentationError, PresentationSequencer};
