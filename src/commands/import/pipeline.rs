use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::{DocumentParser, TextExtractor, display_file_name};
use crate::model::ImportResult;
use crate::util::ensure_directory;

/// Filesystem locations the pipeline writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PipelineConfig {
    /// Durable copies of each imported PDF, named like their source.
    pub(crate) storage_dir: PathBuf,
    /// Per-document text files that only exist during extraction.
    pub(crate) scratch_dir: PathBuf,
}

impl PipelineConfig {
    /// Places `pdfs/` and `tmp/` next to the database file.
    pub(crate) fn beside_database(db_path: &Path) -> Self {
        let root = db_path.parent().unwrap_or_else(|| Path::new(""));
        Self {
            storage_dir: root.join("pdfs"),
            scratch_dir: root.join("tmp"),
        }
    }
}

/// Processes every PDF in `source_dir`, stopping at the first document that fails.
pub(crate) fn load_import_results(
    source_dir: &Path,
    config: &PipelineConfig,
    extractor: &TextExtractor,
    parser: &DocumentParser,
) -> Result<Vec<ImportResult>> {
    let pdf_paths = discover_pdfs(source_dir)?;
    info!(
        source = %source_dir.display(),
        pdf_count = pdf_paths.len(),
        "discovered source documents"
    );

    let mut results = Vec::with_capacity(pdf_paths.len());
    for pdf_path in pdf_paths {
        results.push(process_pdf(&pdf_path, config, extractor, parser)?);
    }

    Ok(results)
}

fn process_pdf(
    pdf_path: &Path,
    config: &PipelineConfig,
    extractor: &TextExtractor,
    parser: &DocumentParser,
) -> Result<ImportResult> {
    let file_name = pdf_path
        .file_name()
        .with_context(|| format!("source path has no file name: {}", pdf_path.display()))?;

    ensure_directory(&config.storage_dir)?;
    let stored_path = config.storage_dir.join(file_name);
    if is_same_file(pdf_path, &stored_path) {
        debug!(path = %stored_path.display(), "source already in storage; skipping copy");
    } else {
        fs::copy(pdf_path, &stored_path).with_context(|| {
            format!(
                "failed to copy {} to {}",
                pdf_path.display(),
                stored_path.display()
            )
        })?;
    }

    let stem = pdf_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let scratch_path = config.scratch_dir.join(format!("{stem}.txt"));

    let document_text = extractor.extract(&stored_path, &scratch_path)?;
    let parsed = parser.parse(&display_file_name(pdf_path), &document_text)?;

    info!(
        file = %display_file_name(pdf_path),
        case_number = %parsed.case_number,
        events = parsed.events.len(),
        "parsed document"
    );

    Ok(ImportResult {
        case_number: parsed.case_number,
        title: parsed.title,
        events: parsed.events,
        document_text,
        stored_path,
    })
}

fn discover_pdfs(source_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();

    let entries = fs::read_dir(source_dir)
        .with_context(|| format!("failed to read {}", source_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", source_dir.display()))?;
        let path = entry.path();

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !is_pdf {
            continue;
        }

        // Follows symlinks; a dangling link is skipped rather than failing the run.
        let is_file = match fs::metadata(&path) {
            Ok(metadata) => metadata.is_file(),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "skipping dangling link");
                false
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to inspect file type: {}", path.display()));
            }
        };

        if is_file {
            pdfs.push(path);
        }
    }

    pdfs.sort();
    Ok(pdfs)
}

fn is_same_file(left: &Path, right: &Path) -> bool {
    match (fs::canonicalize(left), fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}
