//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Act as the storage collaborator: load, save and enumerate whole projects.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate the document before any SQL mutation.
//! - Read paths reject invalid persisted documents instead of masking them.
//! - `save_project` stamps `updated_at`; the stored name is never touched by it.

use crate::db::DbError;
use crate::model::{ModelError, Project, ProjectId, ProjectUpdate};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage collaborator error.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelError),
    Db(DbError),
    NotFound(ProjectId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted project data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ModelError> for RepoError {
    fn from(value: ModelError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Listing row for the project picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage collaborator interface.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn load_project(&self, id: ProjectId) -> RepoResult<Project>;
    /// Replaces the session-owned collections of a stored project.
    fn save_project(&self, id: ProjectId, update: &ProjectUpdate) -> RepoResult<()>;
    /// Most recently updated first.
    fn list_projects(&self) -> RepoResult<Vec<ProjectSummary>>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
}

/// SQLite-backed project repository storing each document as one JSON column.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn write_document(&self, project: &Project) -> RepoResult<usize> {
        let document = encode_document(project)?;
        let changed = self.conn.execute(
            "UPDATE projects
             SET name = ?1, document = ?2, updated_at = ?3
             WHERE id = ?4;",
            params![
                project.name.as_str(),
                document,
                project.updated_at.timestamp_millis(),
                project.id.to_string(),
            ],
        )?;
        Ok(changed)
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;
        let document = encode_document(project)?;

        self.conn.execute(
            "INSERT INTO projects (id, name, document, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                project.id.to_string(),
                project.name.as_str(),
                document,
                project.created_at.timestamp_millis(),
                project.updated_at.timestamp_millis(),
            ],
        )?;

        Ok(project.id)
    }

    fn load_project(&self, id: ProjectId) -> RepoResult<Project> {
        let document: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM projects WHERE id = ?1;",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(document) = document else {
            return Err(RepoError::NotFound(id));
        };
        let project: Project = serde_json::from_str(&document)
            .map_err(|err| RepoError::InvalidData(format!("document for {id}: {err}")))?;
        if project.id != id {
            return Err(RepoError::InvalidData(format!(
                "document id {} stored under {id}",
                project.id
            )));
        }
        project.validate()?;
        Ok(project)
    }

    fn save_project(&self, id: ProjectId, update: &ProjectUpdate) -> RepoResult<()> {
        let mut project = self.load_project(id)?;
        project.apply_update(update.clone(), Utc::now());
        project.validate()?;

        if self.write_document(&project)? == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_projects(&self) -> RepoResult<Vec<ProjectSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM projects
             ORDER BY updated_at DESC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            summaries.push(parse_summary_row(row)?);
        }
        Ok(summaries)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM projects WHERE id = ?1;",
            params![id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn encode_document(project: &Project) -> RepoResult<String> {
    serde_json::to_string(project)
        .map_err(|err| RepoError::InvalidData(format!("encode {}: {err}", project.id)))
}

fn parse_summary_row(row: &Row<'_>) -> RepoResult<ProjectSummary> {
    let raw_id: String = row.get(0)?;
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| RepoError::InvalidData(format!("invalid project id `{raw_id}`")))?;
    Ok(ProjectSummary {
        id,
        name: row.get(1)?,
        created_at: parse_millis(row.get(2)?)?,
        updated_at: parse_millis(row.get(3)?)?,
    })
}

fn parse_millis(value: i64) -> RepoResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(value)
        .single()
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{value}`")))
}

#[cfg(test)]
mod tests {
    use super::{ProjectRepository, RepoError, SqliteProjectRepository};
    use crate::db::open_db_in_memory;
    use crate::model::{BlockNode, Project};
    use uuid::Uuid;

    #[test]
    fn load_rejects_unknown_id() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteProjectRepository::new(&conn);
        let err = repo.load_project(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[test]
    fn create_rejects_invalid_document() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteProjectRepository::new(&conn);
        let mut project = Project::new("Launch");
        let node = BlockNode::task("dup");
        project.nodes = vec![node.clone(), node];
        let err = repo.create_project(&project).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert!(repo.list_projects().unwrap().is_empty());
    }

    #[test]
    fn load_rejects_corrupted_document() {
        let conn = open_db_in_memory().unwrap();
        let id = Uuid::new_v4();
        conn.execute(
            "INSERT INTO projects (id, name, document, created_at, updated_at)
             VALUES (?1, 'Broken', '{not json', 0, 0);",
            [id.to_string()],
        )
        .unwrap();
        let repo = SqliteProjectRepository::new(&conn);
        let err = repo.load_project(id).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }
}
