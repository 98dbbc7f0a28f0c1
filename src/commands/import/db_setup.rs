use anyhow::{Context, Result};
use rusqlite::Connection;

use super::DB_SCHEMA_VERSION;
use crate::util::now_utc_string;

pub fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    connection
        .pragma_update(None, "foreign_keys", "ON")
        .context("failed to enable foreign_keys")?;
    Ok(())
}

/// Creates the case tables when missing. Safe to run against an initialized store.
pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS processes (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              number TEXT UNIQUE NOT NULL,
              title TEXT NOT NULL,
              pdf_path TEXT NOT NULL,
              created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS events (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              process_id INTEGER NOT NULL,
              event_date TEXT NOT NULL,
              description TEXT NOT NULL,
              FOREIGN KEY(process_id) REFERENCES processes(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS documents (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              process_id INTEGER NOT NULL,
              file_name TEXT NOT NULL,
              content TEXT NOT NULL,
              created_at TEXT NOT NULL,
              FOREIGN KEY(process_id) REFERENCES processes(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS appointments (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              process_id INTEGER NOT NULL,
              title TEXT NOT NULL,
              start_at TEXT NOT NULL,
              notes TEXT,
              FOREIGN KEY(process_id) REFERENCES processes(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_events_process ON events(process_id);
            CREATE INDEX IF NOT EXISTS idx_documents_process ON documents(process_id);
            CREATE INDEX IF NOT EXISTS idx_appointments_process ON appointments(process_id, start_at);
            ",
        )
        .context("failed to create case tables")?;

    let now = now_utc_string();
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [DB_SCHEMA_VERSION],
    )?;
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_updated_at', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [now],
    )?;

    Ok(())
}
