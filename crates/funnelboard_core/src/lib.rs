//! Document and state engine for visual funnel projects.
//! This crate is the single source of truth for project invariants: the
//! block graph, bounded undo, plan quotas, derived views, notebook,
//! slideshow order, persistence and export.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod notice;
pub mod projection;
pub mod quota;
pub mod repo;
pub mod service;
pub mod session;
pub mod store;

pub use config::{ConfigError, EngineConfig, ExportConfig, QuotaLimits};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{
    BlockData, BlockKind, BlockNode, CalendarEvent, Edge, EdgeId, ModelError, NodeId,
    NotebookDocument, Project, ProjectId, ProjectUpdate, TaskStatus, ViewId,
};
pub use notice::{Notice, NoticeQueue, NoticeSeverity};
pub use quota::{check_quota, Plan, QuotaGate, QuotaRejection};
pub use repo::{ProjectRepository, RepoError, RepoResult, SqliteProjectRepository};
pub use service::{
    import_project, ExportError, ExportPipeline, ImportError, PersistenceSynchronizer,
    SaveOutcome, SyncError,
};
pub use session::{EditorSession, SessionError, SessionResult};
pub use store::{GraphError, GraphStore, NodeAdmission};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
