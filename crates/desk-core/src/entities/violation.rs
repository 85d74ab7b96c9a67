use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Severity, ViolationCategory, ViolationSource, ViolationStatus};

/// A recorded integrity concern for a student at an exam.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Violation {
    pub id: String,
    pub exam_id: String,
    pub student_id: String,
    pub check_in_id: Option<String>,
    pub category: ViolationCategory,
    pub severity: Severity,
    pub status: ViolationStatus,
    pub source: ViolationSource,
    pub description: String,
    pub evidence_ref: Option<String>,
    pub reported_by: String,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
