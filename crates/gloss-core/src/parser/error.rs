use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a glossary CSV file.
///
/// Every variant is fatal: parsing stops at the first one and no partial
/// result is returned.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("CSV file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file is empty")]
    Empty,

    #[error("CSV missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Row {line}: {entity} must have {field}")]
    MissingField {
        line: u64,
        entity: &'static str,
        field: &'static str,
    },

    #[error("Row {line}: {entity} {field} '{value}' must not contain '.'")]
    DottedName {
        line: u64,
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Row {line}: relationship is missing {}", fields.join(", "))]
    MissingRelationshipFields { line: u64, fields: Vec<&'static str> },

    #[error("Row {line}: Unknown relationship type: {value}. Valid types: {valid}")]
    UnknownRelationshipType {
        line: u64,
        value: String,
        valid: String,
    },
}

impl ParseError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParseError::Io {
            path: path.into(),
            source,
        }
    }
}
