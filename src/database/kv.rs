use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, params};

use crate::errors::StorageError;
use crate::storage::{KeyValueStorage, ensure_capacity};

const SCHEMA: &str = include_str!("schema.sql");

/// Provider backed by the `kv_store` table of an SQLite database
pub struct SqliteStorage {
    pool: r2d2::Pool<SqliteConnectionManager>,
    capacity: Option<usize>,
}

impl SqliteStorage {
    /// Open the database file and create the `kv_store` table if missing
    pub fn open(database_path: &str, capacity: Option<usize>) -> Result<Self> {
        // One connection: each get/set finishes before the next one starts
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::file(database_path))
            .with_context(|| format!("Failed to open SQLite database at {}", database_path))?;

        pool.get()
            .context("Failed to get database connection from pool")?
            .execute_batch(SCHEMA)
            .context("Failed to create kv_store table")?;
        debug!("Database schema ready");

        info!("Using SQLite storage at {}", database_path);
        Ok(Self { pool, capacity })
    }
}

fn database_error(key: &str) -> impl Fn(rusqlite::Error) -> StorageError + '_ {
    move |source| StorageError::Database {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.pool.get()?;
        let sql = "SELECT value FROM kv_store WHERE key = ?1";

        conn.query_row(sql, params![key], |row| row.get(0))
            .optional()
            .map_err(database_error(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction().map_err(database_error(key))?;

        let used_by_others: i64 = tx
            .query_row(
                "SELECT COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0) FROM kv_store WHERE key != ?1",
                params![key],
                |row| row.get(0),
            )
            .map_err(database_error(key))?;
        ensure_capacity(key, used_by_others as usize, value.len(), self.capacity)?;

        let sql = "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
                   ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";
        tx.execute(sql, params![key, value, Utc::now().naive_utc()])
            .map_err(database_error(key))?;

        tx.commit().map_err(database_error(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_db(name: &str) -> String {
        let path = std::env::temp_dir().join(format!("game_zone_{}_{}.db", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path.display().to_string()
    }

    #[test]
    fn test_sqlite_storage_save_and_load() {
        let path = scratch_db("kv_roundtrip");
        let storage = SqliteStorage::open(&path, None).unwrap();

        assert_eq!(storage.get("gamezone_leaderboard").unwrap(), None);

        storage.set("gamezone_leaderboard", "{}").unwrap();
        storage.set("gamezone_leaderboard", "{\"dice\":[]}").unwrap();

        assert_eq!(
            storage.get("gamezone_leaderboard").unwrap().as_deref(),
            Some("{\"dice\":[]}")
        );

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_open_creates_table() {
        let path = scratch_db("kv_schema");
        let storage = SqliteStorage::open(&path, None).unwrap();

        let conn = storage.pool.get().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_sqlite_storage_survives_reopen() {
        let path = scratch_db("kv_reopen");
        SqliteStorage::open(&path, None).unwrap().set("key", "value").unwrap();

        let reopened = SqliteStorage::open(&path, None).unwrap();
        assert_eq!(reopened.get("key").unwrap().as_deref(), Some("value"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_sqlite_storage_quota() {
        let path = scratch_db("kv_quota");
        let storage = SqliteStorage::open(&path, Some(8)).unwrap();
        storage.set("key", "small").unwrap();

        let result = storage.set("other", "12345");

        assert!(matches!(result, Err(StorageError::QuotaExceeded { .. })));
        assert_eq!(storage.get("other").unwrap(), None);
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("small"));

        std::fs::remove_file(&path).unwrap();
    }
}
