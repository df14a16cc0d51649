//! Storage collaborator contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the project load/save contract consumed by the session.
//! - Isolate SQLite query details from synchronizer orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Project::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod project_repo;

pub use project_repo::{
    ProjectRepository, ProjectSummary, RepoError, RepoResult, SqliteProjectRepository,
};
