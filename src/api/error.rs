// ==========================================
// Pipe Inspection QMS - API layer error types
// ==========================================
// Responsibility: convert repository and directory errors into the
// messages the station UI shows. Every error carries an explicit
// reason; the two directory NotFound variants keep their exact
// client-visible wording.
// ==========================================

use crate::directory::error::DirectoryError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API layer errors
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Submission validation
    // ==========================================
    /// Submission rejected before any rule ran (all violations listed)
    #[error("submission validation failed: {reason}")]
    SubmissionValidationError {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // ==========================================
    // Business rule errors
    // ==========================================
    #[error("not found: {0}")]
    NotFound(String),

    #[error("business rule violation: {0}")]
    BusinessRuleViolation(String),

    /// Two stations saved an open inspection for the same pipe at once
    #[error("concurrent submission for the same pipe: {0}")]
    ConcurrentSubmission(String),

    // ==========================================
    // Directory lookups
    // ==========================================
    #[error("Active Ennis Quality/Tubular employee not found")]
    EmployeeNotFound,

    #[error("No recipe found for connection {0}")]
    RecipeNotFound(String),

    #[error("directory unavailable: {0}")]
    DirectoryUnavailable(String),

    // ==========================================
    // Data access errors
    // ==========================================
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // Generic errors
    // ==========================================
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// From RepositoryError
// Purpose: surface storage failures as operator-readable messages
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={}) does not exist", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("database lock failed: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),

            // The only unique index on inspections guards the open set,
            // so a unique failure there means a concurrent submission.
            RepositoryError::UniqueConstraintViolation(msg) => {
                if msg.contains("inspection_record") {
                    ApiError::ConcurrentSubmission(msg)
                } else {
                    ApiError::BusinessRuleViolation(format!("unique constraint violation: {}", msg))
                }
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("foreign key violation: {}", msg))
            }

            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("field {}: {}", field, message))
            }
            RepositoryError::SerializationError(msg) => ApiError::InternalError(msg),

            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// From DirectoryError
// Purpose: keep lookup misses verbatim, fold file trouble into one
// "directory unavailable" message for the floor
// ==========================================
impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::EmployeeNotFound => ApiError::EmployeeNotFound,
            DirectoryError::RecipeNotFound(name) => ApiError::RecipeNotFound(name),

            DirectoryError::FileNotFound(_)
            | DirectoryError::UnsupportedFormat(_)
            | DirectoryError::FileReadError(_)
            | DirectoryError::ExcelParseError(_)
            | DirectoryError::CsvParseError(_) => ApiError::DirectoryUnavailable(err.to_string()),

            DirectoryError::InternalError(msg) => ApiError::InternalError(msg),
            DirectoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// Validation violation detail
// ==========================================

/// One field-level violation inside a rejected submission
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidationViolation {
    /// Offending field name
    pub field: String,
    /// Human-readable reason
    pub reason: String,
}
