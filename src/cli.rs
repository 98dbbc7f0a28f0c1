use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "case-ledger",
    version,
    about = "Import legal-process PDFs into a local SQLite case database"
)]
pub struct Cli {
    /// Directory containing the PDFs to import.
    pub source: PathBuf,

    /// SQLite file the imported data is written to.
    #[arg(long, default_value = "db.sqlite3")]
    pub database: PathBuf,

    /// Where durable copies of the PDFs are kept. Defaults to `pdfs/` next to the database.
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,

    /// Where per-document text files live during extraction. Defaults to `tmp/` next to the database.
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    #[arg(long, default_value = "pdftotext")]
    pub extractor: String,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}
