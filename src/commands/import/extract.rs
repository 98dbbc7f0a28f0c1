use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use tracing::warn;

use crate::error::ImportError;
use crate::util::{decode_utf8_dropping_invalid, ensure_directory};

/// Runs an external `<program> <input> <output>` converter and reads back its text.
#[derive(Debug, Clone)]
pub(crate) struct TextExtractor {
    program: String,
}

impl TextExtractor {
    pub(crate) fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub(crate) fn program(&self) -> &str {
        &self.program
    }

    /// Converts `source` into text via the scratch file `destination`.
    ///
    /// The scratch file never outlives this call, whichever way it returns.
    pub(crate) fn extract(&self, source: &Path, destination: &Path) -> Result<String> {
        if let Some(parent) = destination.parent() {
            ensure_directory(parent)?;
        }
        let scratch = ScratchFile::new(destination);

        let output = match Command::new(&self.program)
            .arg(source)
            .arg(scratch.path())
            .output()
        {
            Ok(output) => output,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Err(ImportError::ExtractionUnavailable {
                    program: self.program.clone(),
                }
                .into());
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("failed to execute {} for {}", self.program, source.display())
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let diagnostic = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            let diagnostic = if diagnostic.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                diagnostic
            };

            return Err(ImportError::ExtractionFailed {
                file_name: display_file_name(source),
                diagnostic,
            }
            .into());
        }

        let raw = fs::read(scratch.path())
            .with_context(|| format!("failed to read {}", scratch.path().display()))?;
        Ok(decode_utf8_dropping_invalid(&raw))
    }
}

/// Removes the scratch text file when dropped.
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                warn!(path = %self.path.display(), error = %error, "failed to remove scratch file");
            }
        }
    }
}

pub(crate) fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
