//! Use-case services sitting between the session and its collaborators.
//!
//! # Responsibility
//! - Persist session state through the storage collaborator.
//! - Import and export project files.
//! - Keep the session decoupled from storage and rendering details.

pub mod export_service;
pub mod import_service;
pub mod sync_service;

pub use export_service::{export_json, ExportError, ExportPipeline, ExportSource, PdfArtifact};
pub use import_service::{import_project, ImportError};
pub use sync_service::{PersistenceSynchronizer, SaveOutcome, SyncError, SyncResult};
