use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A student registered to sit an exam.
///
/// `assigned_seat` is not stored on the roster row: it is read from the
/// exam's current seating plan assignments.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RosterEntry {
    pub exam_id: String,
    pub student_id: String,
    pub assigned_seat: Option<String>,
    pub created_at: DateTime<Utc>,
}
