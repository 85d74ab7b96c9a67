use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{DecisionStatus, VerificationOutcome};

/// The one-time arrival record of a student at an exam.
///
/// `assigned_seat` is copied from the seating plan at check-in time so later
/// reassignments do not rewrite history. `decision_status` is the machine
/// decision and is never changed by an override.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CheckIn {
    pub id: String,
    pub exam_id: String,
    pub student_id: String,
    pub captured_photo_ref: String,
    pub claimed_seat: Option<String>,
    /// Whether the claimed seat exists in the plan; `None` without a plan or claim.
    pub claimed_seat_known: Option<bool>,
    pub assigned_seat: Option<String>,
    pub verification_outcome: VerificationOutcome,
    pub confidence_score: f64,
    /// Why the oracle could not judge, when it could not.
    pub verification_note: Option<String>,
    pub decision_status: DecisionStatus,
    pub proctor_id: String,
    pub notes: Option<String>,
    pub overridden_by: Option<String>,
    pub overridden_at: Option<DateTime<Utc>>,
    pub checked_in_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
