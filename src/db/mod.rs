pub(crate) mod persist;
mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

/// String key-value storage. Values are opaque text; callers own the format.
pub(crate) trait KeyValueStore {
    fn get_value(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite `key`.
    fn put_value(&self, key: &str, value: &str) -> Result<()>;

    /// Returns whether the key existed.
    fn delete_value(&self, key: &str) -> Result<bool>;

    /// Apply a batch of writes; `None` deletes the key.
    fn write_batch(&self, entries: &[(&str, Option<String>)]) -> Result<()> {
        for (key, value) in entries {
            match value {
                Some(v) => self.put_value(key, v)?,
                None => {
                    self.delete_value(key)?;
                }
            }
        }
        Ok(())
    }
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        info!(path = %path.display(), "Opened budget store");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?)
    }

    #[cfg(test)]
    pub(crate) fn list_keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM key_values ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl KeyValueStore for Database {
    fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM key_values WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read key '{key}'"))?;
        Ok(value)
    }

    fn put_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO key_values (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, now()],
            )
            .with_context(|| format!("Failed to write key '{key}'"))?;
        Ok(())
    }

    fn delete_value(&self, key: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM key_values WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to delete key '{key}'"))?;
        Ok(deleted > 0)
    }

    fn write_batch(&self, entries: &[(&str, Option<String>)]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let updated_at = now();
        for (key, value) in entries {
            match value {
                Some(v) => {
                    tx.execute(
                        "INSERT OR REPLACE INTO key_values (key, value, updated_at) VALUES (?1, ?2, ?3)",
                        params![key, v, updated_at],
                    )?;
                }
                None => {
                    tx.execute("DELETE FROM key_values WHERE key = ?1", params![key])?;
                }
            }
        }
        tx.commit().context("Failed to save budget")?;
        debug!(keys = entries.len(), "Wrote budget batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
