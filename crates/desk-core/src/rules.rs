//! Decision and violation-derivation rules.
//!
//! These are the deterministic halves of the check-in workflow: given what the
//! oracle said, what the decision is; given a persisted check-in, which
//! violations it implies. Both are pure so they can be tested without a store
//! and replayed without side effects.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::CheckIn;
use crate::enums::{DecisionStatus, Severity, VerificationOutcome, ViolationCategory};

/// Note appended when an override is recorded without one.
pub const DEFAULT_OVERRIDE_NOTE: &str = "Manual override by proctor";

/// A violation the rule engine wants persisted. Carries everything needed to
/// insert it, so it can be queued and replayed verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ViolationDraft {
    pub exam_id: String,
    pub student_id: String,
    pub check_in_id: String,
    pub category: ViolationCategory,
    pub severity: Severity,
    pub description: String,
    pub evidence_ref: Option<String>,
    pub reported_by: String,
}

/// Map an oracle judgment onto the recorded outcome and decision.
///
/// `approved` iff the oracle said the faces match. Seating plays no part in
/// the decision; it only raises violations.
#[must_use]
pub const fn decide(is_match: bool) -> (VerificationOutcome, DecisionStatus) {
    if is_match {
        (VerificationOutcome::Match, DecisionStatus::Approved)
    } else {
        (VerificationOutcome::NoMatch, DecisionStatus::Flagged)
    }
}

/// Canonical form of a seat code for comparison: trimmed, uppercased, `None` if empty.
#[must_use]
pub fn normalize_seat(code: Option<&str>) -> Option<String> {
    code.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_ascii_uppercase)
}

/// Derive the automatic violations a check-in implies.
///
/// Two independent rules:
/// - claimed seat differs from the assigned seat (both present) → `seat_mismatch` / `low`
/// - outcome is `no_match` → `identity_mismatch` / `high`, with the captured photo as evidence
#[must_use]
pub fn derive_violations(check_in: &CheckIn) -> Vec<ViolationDraft> {
    let mut drafts = Vec::new();

    let claimed = normalize_seat(check_in.claimed_seat.as_deref());
    let assigned = normalize_seat(check_in.assigned_seat.as_deref());
    if let (Some(claimed), Some(assigned)) = (claimed, assigned)
        && claimed != assigned
    {
        let mut description =
            format!("Student sat in seat {claimed} instead of assigned seat {assigned}");
        if check_in.claimed_seat_known == Some(false) {
            description.push_str(" (seat is not part of the seating plan)");
        }
        drafts.push(ViolationDraft {
            exam_id: check_in.exam_id.clone(),
            student_id: check_in.student_id.clone(),
            check_in_id: check_in.id.clone(),
            category: ViolationCategory::SeatMismatch,
            severity: Severity::Low,
            description,
            evidence_ref: None,
            reported_by: check_in.proctor_id.clone(),
        });
    }

    if check_in.verification_outcome == VerificationOutcome::NoMatch {
        let mut description = format!(
            "Photo verification failed with confidence score {}%",
            format_score(check_in.confidence_score)
        );
        if let Some(note) = &check_in.verification_note {
            description.push_str(&format!(" ({note})"));
        }
        drafts.push(ViolationDraft {
            exam_id: check_in.exam_id.clone(),
            student_id: check_in.student_id.clone(),
            check_in_id: check_in.id.clone(),
            category: ViolationCategory::IdentityMismatch,
            severity: Severity::High,
            description,
            evidence_ref: Some(check_in.captured_photo_ref.clone()),
            reported_by: check_in.proctor_id.clone(),
        });
    }

    drafts
}

/// Append `addition` to `existing` notes. Empty additions never erase what is there.
#[must_use]
pub fn append_notes(existing: Option<&str>, addition: Option<&str>) -> Option<String> {
    let addition = addition.map(str::trim).filter(|a| !a.is_empty());
    match (existing.filter(|e| !e.is_empty()), addition) {
        (Some(existing), Some(addition)) => Some(format!("{existing}\n{addition}")),
        (Some(existing), None) => Some(existing.to_string()),
        (None, Some(addition)) => Some(addition.to_string()),
        (None, None) => None,
    }
}

fn format_score(score: f64) -> String {
    let rounded = (score * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn check_in(claimed: Option<&str>, assigned: Option<&str>, outcome: VerificationOutcome) -> CheckIn {
        let now = Utc::now();
        CheckIn {
            id: "chk-00000001".into(),
            exam_id: "exm-00000001".into(),
            student_id: "stu-00000001".into(),
            captured_photo_ref: "uploads/checkins/s1.jpg".into(),
            claimed_seat: claimed.map(String::from),
            claimed_seat_known: claimed.map(|_| true),
            assigned_seat: assigned.map(String::from),
            verification_outcome: outcome,
            confidence_score: 40.0,
            verification_note: None,
            decision_status: decide(outcome == VerificationOutcome::Match).1,
            proctor_id: "proctor-1".into(),
            notes: None,
            overridden_by: None,
            overridden_at: None,
            checked_in_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn decide_maps_match_to_approved() {
        assert_eq!(
            decide(true),
            (VerificationOutcome::Match, DecisionStatus::Approved)
        );
        assert_eq!(
            decide(false),
            (VerificationOutcome::NoMatch, DecisionStatus::Flagged)
        );
    }

    #[test]
    fn matching_seat_and_face_raise_nothing() {
        let ci = check_in(Some("A1"), Some("A1"), VerificationOutcome::Match);
        assert!(derive_violations(&ci).is_empty());
    }

    #[test]
    fn seat_comparison_ignores_case_and_whitespace() {
        let ci = check_in(Some(" a1 "), Some("A1"), VerificationOutcome::Match);
        assert!(derive_violations(&ci).is_empty());
    }

    #[test]
    fn seat_mismatch_is_low() {
        let ci = check_in(Some("B1"), Some("A1"), VerificationOutcome::Match);
        let drafts = derive_violations(&ci);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].category, ViolationCategory::SeatMismatch);
        assert_eq!(drafts[0].severity, Severity::Low);
        assert_eq!(
            drafts[0].description,
            "Student sat in seat B1 instead of assigned seat A1"
        );
        assert_eq!(drafts[0].evidence_ref, None);
    }

    #[test]
    fn missing_claim_or_assignment_is_not_a_mismatch() {
        let ci = check_in(None, Some("A1"), VerificationOutcome::Match);
        assert!(derive_violations(&ci).is_empty());
        let ci = check_in(Some("B1"), None, VerificationOutcome::Match);
        assert!(derive_violations(&ci).is_empty());
    }

    #[test]
    fn no_match_is_high_with_photo_evidence() {
        let ci = check_in(Some("A1"), Some("A1"), VerificationOutcome::NoMatch);
        let drafts = derive_violations(&ci);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].category, ViolationCategory::IdentityMismatch);
        assert_eq!(drafts[0].severity, Severity::High);
        assert_eq!(
            drafts[0].evidence_ref.as_deref(),
            Some("uploads/checkins/s1.jpg")
        );
        assert_eq!(
            drafts[0].description,
            "Photo verification failed with confidence score 40%"
        );
    }

    #[test]
    fn both_rules_fire_independently() {
        let ci = check_in(Some("B2"), Some("A1"), VerificationOutcome::NoMatch);
        let categories: Vec<_> = derive_violations(&ci).iter().map(|d| d.category).collect();
        assert_eq!(
            categories,
            vec![
                ViolationCategory::SeatMismatch,
                ViolationCategory::IdentityMismatch
            ]
        );
    }

    #[test]
    fn override_outcome_raises_no_identity_violation() {
        let ci = check_in(None, None, VerificationOutcome::Override);
        assert!(derive_violations(&ci).is_empty());
    }

    #[test]
    fn unknown_claimed_seat_is_called_out() {
        let mut ci = check_in(Some("Z9"), Some("A1"), VerificationOutcome::Match);
        ci.claimed_seat_known = Some(false);
        let drafts = derive_violations(&ci);
        assert!(drafts[0].description.ends_with("(seat is not part of the seating plan)"));
    }

    #[test]
    fn unavailable_note_is_carried_into_description() {
        let mut ci = check_in(None, None, VerificationOutcome::NoMatch);
        ci.confidence_score = 0.0;
        ci.verification_note = Some("no enrolled photo".into());
        let drafts = derive_violations(&ci);
        assert_eq!(
            drafts[0].description,
            "Photo verification failed with confidence score 0% (no enrolled photo)"
        );
    }

    #[test]
    fn append_notes_never_erases() {
        assert_eq!(append_notes(None, None), None);
        assert_eq!(append_notes(None, Some("  ")), None);
        assert_eq!(append_notes(Some("first"), Some("")), Some("first".into()));
        assert_eq!(append_notes(None, Some("second")), Some("second".into()));
        assert_eq!(
            append_notes(Some("first"), Some("second")),
            Some("first\nsecond".into())
        );
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(40.0), "40");
        assert_eq!(format_score(72.456), "72.46");
    }
}
