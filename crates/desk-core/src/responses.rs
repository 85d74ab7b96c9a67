//! Response types returned by the service layer and printed by `examdesk`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CheckIn, Violation};
use crate::enums::VerificationOutcome;
use crate::rules::ViolationDraft;

/// What the verification step concluded, as reported to the proctor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct VerificationSummary {
    pub outcome: VerificationOutcome,
    pub is_match: bool,
    pub confidence_score: f64,
    /// Set when the oracle could not produce a judgment.
    pub unavailable_reason: Option<String>,
}

/// Response from `perform_check_in`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CheckInResult {
    pub check_in: CheckIn,
    pub verification: VerificationSummary,
    /// Violations derived from this check-in and persisted.
    pub violations: Vec<Violation>,
    /// Derived violations that could not be persisted yet and were queued.
    pub deferred_violations: Vec<ViolationDraft>,
}

/// Per-exam counts for reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExamSummary {
    pub exam_id: String,
    pub total_check_ins: u32,
    pub approved: u32,
    pub flagged: u32,
    pub identity_mismatches: u32,
    pub overrides: u32,
    pub seat_mismatches: u32,
    pub total_violations: u32,
    pub open_violations: u32,
}

/// Response from `replay_deferred_violations`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ReplayResponse {
    pub replayed: Vec<Violation>,
    pub still_deferred: Vec<ViolationDraft>,
}
