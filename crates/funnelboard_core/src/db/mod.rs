//! Project store bootstrap.
//!
//! Every project lives as one JSON document row in a local SQLite file; this
//! module opens that file and brings its schema up to date before any
//! repository touches it.
//!
//! # Invariants
//! - The store's schema revision is `PRAGMA user_version`.
//! - A store written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was last migrated by a build that knows more revisions.
    StoreTooNew {
        store_version: u32,
        supported_version: u32,
    },
    /// A schema step failed; the store keeps its previous revision.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "project store error: {err}"),
            Self::StoreTooNew {
                store_version,
                supported_version,
            } => write!(
                f,
                "project store was written by a newer version (schema {store_version}, this build supports up to {supported_version})"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "project store upgrade {version} ({name}) failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::StoreTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
