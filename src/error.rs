use std::path::PathBuf;

use thiserror::Error;

/// Failures the import command reports to the operator as a structured payload.
///
/// Anything outside this enum (I/O, SQLite) travels as a plain `anyhow::Error`
/// and is logged instead.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("text extractor '{program}' is not available on this system")]
    ExtractionUnavailable { program: String },

    #[error("failed to convert '{file_name}' to text: {diagnostic}")]
    ExtractionFailed {
        file_name: String,
        diagnostic: String,
    },

    #[error("could not find a process number in '{file_name}'")]
    CaseNumberNotFound { file_name: String },

    #[error("source directory '{}' is invalid", .0.display())]
    InvalidSourceDirectory(PathBuf),

    #[error("process {0} was written but could not be located afterwards")]
    ProcessNotFound(String),
}

impl ImportError {
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}
