//! Seating error types.

use serde::Serialize;
use thiserror::Error;

/// A seat code that does not follow the `<RowLetters><Column>` grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatCodeError {
    #[error("seat code is empty")]
    Empty,

    /// Code does not start with a row letter (`12`, `1A`).
    #[error("seat code '{0}' has no row letters")]
    MissingRow(String),

    /// Code has no trailing column number (`A`, `AB`).
    #[error("seat code '{0}' has no column number")]
    MissingColumn(String),

    /// A character outside `A-Z0-9`, or letters after the column (`A1B2`).
    #[error("seat code '{code}' has unexpected character '{found}'")]
    UnexpectedCharacter { code: String, found: char },

    /// Columns are written without leading zeros and start at 1.
    #[error("seat code '{0}' has an invalid column number")]
    InvalidColumn(String),

    /// Row letters or column digits do not fit in a `u32`.
    #[error("seat code '{0}' is out of range")]
    OutOfRange(String),
}

/// Errors from seating plan generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

/// Why a single seat assignment was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, schemars::JsonSchema)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SeatRejection {
    #[error("Student ID is required")]
    StudentRequired,

    #[error("Seat code is required")]
    SeatCodeRequired,

    #[error("Seat {code} does not exist in this seating plan")]
    SeatNotFound { code: String },

    #[error("Seat {code} is already taken")]
    SeatAlreadyTaken { code: String },

    #[error("Student {student_id} appears more than once in this batch")]
    DuplicateStudent { student_id: String },

    #[error("Student {student_id} is not on the exam roster")]
    NotOnRoster { student_id: String },
}
