//! Queries the browsing side of the application runs against the case database.
//!
//! Nothing here writes processes, events or documents; those belong to the import command.

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::{AppointmentRecord, DocumentRecord, EventRecord, ProcessRecord};

const COUNTABLE_TABLES: &[&str] = &["processes", "events", "documents", "appointments"];

pub fn fetch_processes(connection: &Connection) -> Result<Vec<ProcessRecord>> {
    let mut statement = connection
        .prepare("SELECT id, number, title, pdf_path FROM processes ORDER BY title, id")?;
    let rows = statement.query_map([], |row| {
        Ok(ProcessRecord {
            id: row.get(0)?,
            number: row.get(1)?,
            title: row.get(2)?,
            pdf_path: row.get(3)?,
        })
    })?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to load processes")
}

pub fn fetch_process_by_number(
    connection: &Connection,
    number: &str,
) -> Result<Option<ProcessRecord>> {
    let process = connection
        .query_row(
            "SELECT id, number, title, pdf_path FROM processes WHERE number = ?1",
            [number],
            |row| {
                Ok(ProcessRecord {
                    id: row.get(0)?,
                    number: row.get(1)?,
                    title: row.get(2)?,
                    pdf_path: row.get(3)?,
                })
            },
        )
        .optional()
        .with_context(|| format!("failed to look up process {number}"))?;
    Ok(process)
}

/// Events in the order they appeared in the source document.
pub fn fetch_events(connection: &Connection, process_id: i64) -> Result<Vec<EventRecord>> {
    let mut statement = connection.prepare(
        "
        SELECT id, process_id, event_date, description
        FROM events
        WHERE process_id = ?1
        ORDER BY id
        ",
    )?;
    let rows = statement.query_map([process_id], |row| {
        Ok(EventRecord {
            id: row.get(0)?,
            process_id: row.get(1)?,
            event_date: row.get(2)?,
            description: row.get(3)?,
        })
    })?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to load events for process {process_id}"))
}

pub fn fetch_documents(connection: &Connection, process_id: i64) -> Result<Vec<DocumentRecord>> {
    let mut statement = connection.prepare(
        "
        SELECT id, process_id, file_name, content, created_at
        FROM documents
        WHERE process_id = ?1
        ORDER BY id DESC
        ",
    )?;
    let rows = statement.query_map([process_id], |row| {
        Ok(DocumentRecord {
            id: row.get(0)?,
            process_id: row.get(1)?,
            file_name: row.get(2)?,
            content: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to load documents for process {process_id}"))
}

pub fn fetch_appointments(
    connection: &Connection,
    process_id: i64,
) -> Result<Vec<AppointmentRecord>> {
    let mut statement = connection.prepare(
        "
        SELECT id, process_id, title, start_at, notes
        FROM appointments
        WHERE process_id = ?1
        ORDER BY start_at
        ",
    )?;
    let rows = statement.query_map([process_id], |row| {
        Ok(AppointmentRecord {
            id: row.get(0)?,
            process_id: row.get(1)?,
            title: row.get(2)?,
            start_at: row.get(3)?,
            notes: row.get(4)?,
        })
    })?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to load appointments for process {process_id}"))
}

/// Empty notes are stored as NULL.
pub fn add_appointment(
    connection: &Connection,
    process_id: i64,
    title: &str,
    start_at: &str,
    notes: Option<&str>,
) -> Result<i64> {
    let notes = notes.filter(|value| !value.is_empty());
    connection
        .execute(
            "INSERT INTO appointments(process_id, title, start_at, notes) VALUES(?1, ?2, ?3, ?4)",
            params![process_id, title, start_at, notes],
        )
        .with_context(|| format!("failed to add appointment for process {process_id}"))?;
    Ok(connection.last_insert_rowid())
}

pub fn delete_appointment(connection: &Connection, appointment_id: i64) -> Result<()> {
    connection
        .execute("DELETE FROM appointments WHERE id = ?1", [appointment_id])
        .with_context(|| format!("failed to delete appointment {appointment_id}"))?;
    Ok(())
}

pub fn count_rows(connection: &Connection, table: &str) -> Result<i64> {
    if !COUNTABLE_TABLES.contains(&table) {
        bail!("unknown table: {table}");
    }
    let count = connection.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
