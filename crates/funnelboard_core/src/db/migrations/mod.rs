//! Schema revisions of the project store.
//!
//! Revisions are applied oldest first inside one transaction, so an
//! interrupted upgrade leaves the store on the revision it started from.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "projects_table",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "projects_updated_index",
        sql: include_str!("0002_projects_updated_idx.sql"),
    },
];

/// Newest schema revision this build can read and write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Revision currently recorded in the store.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Brings the project store up to `latest_version`.
///
/// # Errors
/// - `DbError::StoreTooNew` when the store is ahead of this build.
/// - `DbError::Migration` naming the first revision that failed to apply.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let store_version = schema_version(conn)?;
    let supported_version = latest_version();

    if store_version > supported_version {
        return Err(DbError::StoreTooNew {
            store_version,
            supported_version,
        });
    }
    if store_version == supported_version {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > store_version)
    {
        tx.execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            })
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=applied version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;
    info!(
        "event=db_migrate module=db status=ok from_version={store_version} to_version={supported_version}"
    );

    Ok(())
}
