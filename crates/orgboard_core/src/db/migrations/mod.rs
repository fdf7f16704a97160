//! Board schema steps.
//!
//! Step 1 creates the four entity tables with cascading foreign keys.
//! Step 2 adds the newest-first list indexes used by every `list_*` query.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one.
//! - Pending steps run in one transaction; a failing step leaves the file
//!   at its previous version.

use crate::db::{DbError, DbResult};
use log::{debug, info};
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
        name: "entity_tables",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "list_indexes",
        sql: include_str!("0002_list_indexes.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Upgrades the board schema to [`latest_version`].
///
/// Returns the number of steps applied (0 when already current).
///
/// # Errors
/// - `UnsupportedSchemaVersion` for a file from a newer build.
/// - `Migration` naming the step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    run(conn, MIGRATIONS)
}

fn run(conn: &mut Connection, steps: &[Migration]) -> DbResult<usize> {
    let from_version = current_user_version(conn)?;
    let latest = steps.last().map_or(0, |migration| migration.version);

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = steps
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        let step = format!(
            "{}\nPRAGMA user_version = {};",
            migration.sql, migration.version
        );
        tx.execute_batch(&step).map_err(|source| DbError::Migration {
            version: migration.version,
            name: migration.name,
            source,
        })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from_version} to_version={latest} applied={}",
        pending.len()
    );
    Ok(pending.len())
}
