//! Database error types for desk-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Operation not allowed in the entity's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Bad input to a repository call.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A store uniqueness constraint rejected the write.
    #[error("Already exists: {0}")]
    UniqueViolation(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<desk_core::errors::CoreError> for DatabaseError {
    fn from(err: desk_core::errors::CoreError) -> Self {
        use desk_core::errors::CoreError;
        match err {
            CoreError::InvalidTransition { .. } => Self::InvalidState(err.to_string()),
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::Other(e) => Self::Other(e),
        }
    }
}

/// Terminal rejections of the check-in workflow.
#[derive(Debug, Error)]
pub enum CheckInError {
    /// Missing or unacceptable request fields. Nothing was written.
    #[error("Bad check-in request: {0}")]
    BadInput(String),

    /// The student is not on the exam's roster. Nothing was written.
    #[error("Student {student_id} is not enrolled in exam {exam_id}")]
    NotEnrolled { exam_id: String, student_id: String },

    /// The student already has a check-in for this exam, found either before
    /// or at insert time.
    #[error("Student {student_id} has already checked in for exam {exam_id}")]
    Duplicate { exam_id: String, student_id: String },

    /// Any other persistence failure.
    #[error(transparent)]
    Store(#[from] DatabaseError),
}
