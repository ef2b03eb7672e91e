use std::path::PathBuf;

use thiserror::Error;

/// Why a load attempt failed. All variants are terminal for that attempt.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("CSV file not accessible at {}: {source}", path.display())]
    FileNotAccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is missing required column(s): {}", path.display(), missing.join(", "))]
    SchemaMismatch { path: PathBuf, missing: Vec<String> },

    #[error("line {line}, column '{column}': {reason}")]
    Parse {
        line: u64,
        column: String,
        value: String,
        reason: String,
    },
}

impl LoadError {
    /// File line of the offending row, when the error points at one.
    pub fn line(&self) -> Option<u64> {
        match self {
            LoadError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}
