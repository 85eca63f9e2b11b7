// ==========================================
// Pipe Inspection QMS - Directory layer error types
// ==========================================
// Derived with thiserror. The two NotFound variants carry the exact
// client-visible wording the floor UI shows.
// ==========================================

use thiserror::Error;

/// Directory layer errors
#[derive(Error, Debug)]
pub enum DirectoryError {
    // ===== Snapshot file errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (only .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    // ===== Lookup misses =====
    #[error("Active Ennis Quality/Tubular employee not found")]
    EmployeeNotFound,

    #[error("No recipe found for connection {0}")]
    RecipeNotFound(String),

    // ===== Catch-all =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for DirectoryError {
    fn from(err: std::io::Error) -> Self {
        DirectoryError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for DirectoryError {
    fn from(err: csv::Error) -> Self {
        DirectoryError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for DirectoryError {
    fn from(err: calamine::Error) -> Self {
        DirectoryError::ExcelParseError(err.to_string())
    }
}

/// Result alias
pub type DirectoryResult<T> = Result<T, DirectoryError>;
