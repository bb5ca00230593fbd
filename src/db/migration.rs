use std::collections::BTreeSet;

use anyhow::Context;
use rusqlite::{Connection, params};
use time::OffsetDateTime;

/// One additive schema step, identified by its version.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub up: &'static str,
}

impl Migration {
    pub const fn new(version: u32, description: &'static str, up: &'static str) -> Self {
        Self {
            version,
            description,
            up,
        }
    }

    /// Runs the SQL and records the version in one transaction.
    fn apply(&self, conn: &mut Connection) -> anyhow::Result<()> {
        let tx = conn.transaction()?;
        tx.execute_batch(self.up)
            .with_context(|| format!("migration {} ({}) failed", self.version, self.description))?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at, description) VALUES (?1, ?2, ?3)",
            params![
                self.version,
                OffsetDateTime::now_utc().unix_timestamp(),
                self.description
            ],
        )?;
        tx.commit()?;
        Ok(())
    }
}

/// Schema history of the posts database, oldest first.
pub const MIGRATIONS: &[Migration] = &[
    Migration::new(
        1,
        "posts table with scalar tag columns and JSON array columns",
        include_str!("migrations/001_initial_schema.sql"),
    ),
    Migration::new(
        2,
        "indexes on the filterable tag columns",
        include_str!("migrations/002_filter_indexes.sql"),
    ),
];

/// Brings the schema up to date and returns the versions applied by this call.
pub fn apply_pending_migrations(conn: &mut Connection) -> anyhow::Result<Vec<u32>> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL,
            description TEXT
        );",
    )?;

    let done = applied_versions(conn)?;
    let mut applied = Vec::new();
    for migration in MIGRATIONS.iter().filter(|m| !done.contains(&m.version)) {
        migration.apply(conn)?;
        tracing::info!(
            version = migration.version,
            description = migration.description,
            "applied migration"
        );
        applied.push(migration.version);
    }
    Ok(applied)
}

/// Highest recorded schema version, if any migration ran.
pub fn schema_version(conn: &Connection) -> anyhow::Result<Option<u32>> {
    Ok(applied_versions(conn)?.last().copied())
}

fn applied_versions(conn: &Connection) -> anyhow::Result<BTreeSet<u32>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<BTreeSet<u32>, _>>()
        .context("failed to read schema_migrations")?;
    Ok(versions)
}
