use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use tracing::info;

use crate::error::ImportError;
use crate::model::ImportResult;
use crate::util::now_utc_string;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct PersistStats {
    pub(crate) processes_upserted: usize,
    pub(crate) events_inserted: usize,
    pub(crate) documents_inserted: usize,
}

/// Writes each result in its own transaction, in submission order.
///
/// Results committed before a failure stay committed.
pub(crate) fn persist_import_results(
    connection: &mut Connection,
    results: &[ImportResult],
) -> Result<PersistStats> {
    let mut stats = PersistStats::default();

    for result in results {
        let tx = connection.transaction()?;
        let process_id = upsert_process(&tx, result)?;
        let events_inserted = replace_events(&tx, process_id, &result.events)?;
        replace_documents(&tx, process_id, result)?;
        tx.commit()
            .with_context(|| format!("failed to commit process {}", result.case_number))?;

        info!(
            case_number = %result.case_number,
            process_id,
            events = events_inserted,
            "persisted process"
        );

        stats.processes_upserted += 1;
        stats.events_inserted += events_inserted;
        stats.documents_inserted += 1;
    }

    Ok(stats)
}

fn upsert_process(tx: &Transaction<'_>, result: &ImportResult) -> Result<i64> {
    tx.execute(
        "
        INSERT INTO processes(number, title, pdf_path, created_at)
        VALUES(?1, ?2, ?3, ?4)
        ON CONFLICT(number) DO UPDATE SET
          title=excluded.title,
          pdf_path=excluded.pdf_path
        ",
        params![
            &result.case_number,
            &result.title,
            result.stored_path.display().to_string(),
            now_utc_string()
        ],
    )
    .with_context(|| format!("failed to upsert process {}", result.case_number))?;

    let process_id: Option<i64> = tx
        .query_row(
            "SELECT id FROM processes WHERE number = ?1",
            [&result.case_number],
            |row| row.get(0),
        )
        .optional()?;

    process_id.ok_or_else(|| ImportError::ProcessNotFound(result.case_number.clone()).into())
}

fn replace_events(
    tx: &Transaction<'_>,
    process_id: i64,
    events: &[(String, String)],
) -> Result<usize> {
    tx.execute("DELETE FROM events WHERE process_id = ?1", [process_id])?;

    let mut statement = tx.prepare(
        "INSERT INTO events(process_id, event_date, description) VALUES(?1, ?2, ?3)",
    )?;
    for (event_date, description) in events {
        statement.execute(params![process_id, event_date, description])?;
    }

    Ok(events.len())
}

fn replace_documents(tx: &Transaction<'_>, process_id: i64, result: &ImportResult) -> Result<()> {
    tx.execute("DELETE FROM documents WHERE process_id = ?1", [process_id])?;
    tx.execute(
        "
        INSERT INTO documents(process_id, file_name, content, created_at)
        VALUES(?1, ?2, ?3, ?4)
        ",
        params![
            process_id,
            result.stored_file_name(),
            &result.document_text,
            now_utc_string()
        ],
    )?;
    Ok(())
}
