use std::path::PathBuf;

use serde::Serialize;

/// Everything extracted from one source document, handed from the pipeline to
/// the persister.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub case_number: String,
    pub title: String,
    pub events: Vec<(String, String)>,
    pub document_text: String,
    pub stored_path: PathBuf,
}

impl ImportResult {
    /// File name recorded on the document row: the stored copy's name.
    pub fn stored_file_name(&self) -> String {
        self.stored_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub id: i64,
    pub number: String,
    pub title: String,
    pub pdf_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub id: i64,
    pub process_id: i64,
    pub event_date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    pub id: i64,
    pub process_id: i64,
    pub file_name: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentRecord {
    pub id: i64,
    pub process_id: i64,
    pub title: String,
    pub start_at: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportPaths {
    pub source_dir: String,
    pub db_path: String,
    pub storage_dir: String,
    pub scratch_dir: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportCounts {
    pub document_count: usize,
    pub processes_upserted: usize,
    pub events_inserted: usize,
    pub documents_inserted: usize,
    pub processes_total: i64,
    pub events_total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportedDocumentEntry {
    pub file_name: String,
    pub case_number: String,
    pub title: String,
    pub event_count: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub db_schema_version: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub extractor: String,
    pub paths: ImportPaths,
    pub counts: ImportCounts,
    pub documents: Vec<ImportedDocumentEntry>,
}
