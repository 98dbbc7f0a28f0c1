use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use tracing::info;

use super::{
    DB_SCHEMA_VERSION, DocumentParser, PipelineConfig, TextExtractor, configure_connection,
    ensure_schema, load_import_results, persist_import_results,
};
use crate::cli::Cli;
use crate::error::ImportError;
use crate::model::{
    ImportCounts, ImportPaths, ImportResult, ImportRunManifest, ImportedDocumentEntry,
};
use crate::store::count_rows;
use crate::util::{ensure_directory, now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

/// Resolved configuration for one import run.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub source_dir: PathBuf,
    pub db_path: PathBuf,
    pub storage_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub extractor: String,
    pub manifest_path: Option<PathBuf>,
}

impl ImportSettings {
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = PipelineConfig::beside_database(&cli.database);
        Self {
            source_dir: cli.source.clone(),
            db_path: cli.database.clone(),
            storage_dir: cli.storage_dir.clone().unwrap_or(defaults.storage_dir),
            scratch_dir: cli.scratch_dir.clone().unwrap_or(defaults.scratch_dir),
            extractor: cli.extractor.clone(),
            manifest_path: cli.manifest_path.clone(),
        }
    }

    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            storage_dir: self.storage_dir.clone(),
            scratch_dir: self.scratch_dir.clone(),
        }
    }
}

pub fn run(settings: &ImportSettings) -> Result<ImportCounts> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    if !settings.source_dir.is_dir() {
        return Err(ImportError::InvalidSourceDirectory(settings.source_dir.clone()).into());
    }

    info!(
        source = %settings.source_dir.display(),
        db_path = %settings.db_path.display(),
        run_id = %run_id,
        "starting import"
    );

    let parser = DocumentParser::new()?;
    let extractor = TextExtractor::new(settings.extractor.clone());
    let results = load_import_results(
        &settings.source_dir,
        &settings.pipeline_config(),
        &extractor,
        &parser,
    )?;

    if let Some(parent) = settings
        .db_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        ensure_directory(parent)?;
    }
    let mut connection = Connection::open(&settings.db_path)
        .with_context(|| format!("failed to open {}", settings.db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;

    let stats = persist_import_results(&mut connection, &results)?;

    let counts = ImportCounts {
        document_count: results.len(),
        processes_upserted: stats.processes_upserted,
        events_inserted: stats.events_inserted,
        documents_inserted: stats.documents_inserted,
        processes_total: count_rows(&connection, "processes")?,
        events_total: count_rows(&connection, "events")?,
    };

    info!(
        documents = counts.document_count,
        processes = counts.processes_total,
        events = counts.events_total,
        "import completed"
    );

    if let Some(manifest_path) = &settings.manifest_path {
        let manifest = ImportRunManifest {
            manifest_version: 1,
            run_id,
            db_schema_version: DB_SCHEMA_VERSION.to_string(),
            status: "completed".to_string(),
            started_at,
            updated_at: now_utc_string(),
            extractor: extractor.program().to_string(),
            paths: ImportPaths {
                source_dir: settings.source_dir.display().to_string(),
                db_path: settings.db_path.display().to_string(),
                storage_dir: settings.storage_dir.display().to_string(),
                scratch_dir: settings.scratch_dir.display().to_string(),
            },
            counts: counts.clone(),
            documents: manifest_entries(&results)?,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote import run manifest");
    }

    Ok(counts)
}

fn manifest_entries(results: &[ImportResult]) -> Result<Vec<ImportedDocumentEntry>> {
    results
        .iter()
        .map(|result| {
            Ok(ImportedDocumentEntry {
                file_name: result.stored_file_name(),
                case_number: result.case_number.clone(),
                title: result.title.clone(),
                event_count: result.events.len(),
                sha256: sha256_file(&result.stored_path)?,
            })
        })
        .collect()
}
