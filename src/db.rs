mod migration;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::dimensions::{Dimension, StoredField};
use crate::models::ValueCount;
use crate::store::{MonthBucket, PostStore};

pub use migration::{MIGRATIONS, Migration, apply_pending_migrations, schema_version};

/// Database wrapper providing connection management and schema initialization.
///
/// The connection sits behind a mutex so one `Database` can be shared as an
/// `Arc<dyn PostStore>` with the aggregator's blocking workers.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically applies pending migrations on open.
    pub fn in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist.
    /// Automatically applies pending migrations on open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        Self::initialize(conn)
    }

    fn initialize(mut conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        apply_pending_migrations(&mut conn).context("Failed to apply migrations")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Returns a guard over the underlying connection. A poisoned lock is recovered.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PostStore for Database {
    fn distinct_values(&self, dimension: Dimension) -> Result<Vec<String>> {
        let Some(field) = dimension.stored_field() else {
            return Ok(Vec::new());
        };

        let query = match field {
            StoredField::Scalar(column) => format!(
                "SELECT DISTINCT {column} FROM posts
                 WHERE {column} IS NOT NULL AND TRIM({column}) != ''
                 ORDER BY {column}"
            ),
            StoredField::Array(column) => format!(
                "SELECT DISTINCT j.value FROM posts p, json_each(p.{column}) j
                 WHERE j.type = 'text' AND TRIM(j.value) != ''
                 ORDER BY j.value"
            ),
        };

        let conn = self.connection();
        let mut stmt = conn
            .prepare(&query)
            .with_context(|| format!("Failed to prepare distinct query for {dimension}"))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row.with_context(|| format!("Failed to read {dimension} value"))?);
        }
        Ok(values)
    }

    fn publish_months(&self, limit: usize) -> Result<Vec<MonthBucket>> {
        let conn = self.connection();
        let mut stmt = conn.prepare(
            "SELECT CAST(strftime('%Y', created_at, 'unixepoch') AS INTEGER) AS year,
                    CAST(strftime('%m', created_at, 'unixepoch') AS INTEGER) AS month,
                    COUNT(*)
             FROM posts
             GROUP BY year, month
             ORDER BY year DESC, month DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            Ok(MonthBucket {
                year: row.get(0)?,
                month: row.get(1)?,
                count: row.get(2)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to read publish month buckets")
    }

    fn value_counts(&self, dimension: Dimension) -> Result<Vec<ValueCount>> {
        let Some(field) = dimension.stored_field() else {
            return Ok(Vec::new());
        };

        let query = match field {
            StoredField::Scalar(column) => format!(
                "SELECT {column}, COUNT(*) AS n FROM posts
                 WHERE {column} IS NOT NULL AND TRIM({column}) != ''
                 GROUP BY {column}
                 ORDER BY n DESC, {column}"
            ),
            StoredField::Array(column) => format!(
                "SELECT j.value, COUNT(*) AS n FROM posts p, json_each(p.{column}) j
                 WHERE j.type = 'text' AND TRIM(j.value) != ''
                 GROUP BY j.value
                 ORDER BY n DESC, j.value"
            ),
        };

        let conn = self.connection();
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            Ok(ValueCount {
                value: row.get(0)?,
                count: row.get(1)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to read {dimension} counts"))
    }

    fn count_posts(&self) -> Result<i64> {
        let count = self
            .connection()
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count)
    }
}
