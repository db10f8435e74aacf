//! Knowledge base schema: versioned migrations and a post-migration check.
//!
//! # Responsibility
//! - Bring a connection up to the latest knowledge base schema.
//! - Confirm the item, tag and category tables exist before repositories run.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Pending migrations run inside one transaction.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "knowledge_base_init",
    sql: include_str!("0001_init.sql"),
}];

/// Tables the repositories read and write.
pub const KNOWLEDGE_BASE_TABLES: &[&str] = &[
    "categories",
    "knowledge_items",
    "knowledge_item_tags",
    "knowledge_item_categories",
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version < latest {
        let tx = conn.transaction()?;
        for migration in MIGRATIONS
            .iter()
            .filter(|migration| migration.version > current_version)
        {
            tx.execute_batch(migration.sql)?;
            tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
            debug!(
                "event=db_migrate_step module=db status=ok version={} name={}",
                migration.version, migration.name
            );
        }
        tx.commit()?;

        info!(
            "event=db_migrate module=db status=ok from_version={current_version} to_version={latest}"
        );
    }

    verify_schema(conn)
}

/// Fails with `MissingTable` when a knowledge base table is absent.
///
/// Catches files whose `user_version` was bumped without the schema behind it.
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
    )?;
    for &table in KNOWLEDGE_BASE_TABLES {
        let exists: bool = stmt.query_row([table], |row| row.get(0))?;
        if !exists {
            return Err(DbError::MissingTable(table));
        }
    }
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
