//! The check-in workflow.
//!
//! One attempt walks `intake → roster_checked → seat_validated → verified →
//! decided → persisted`, then persists the violations the stored check-in
//! implies. Intake, roster and duplicate checks fail fast and write nothing.
//! Oracle trouble never fails the attempt; it yields a flagged decision with
//! a zero score. The `UNIQUE (exam_id, student_id)` insert is the final word
//! on duplicates, so a race lost at insert time reports exactly what the
//! pre-check would have.

use chrono::Utc;

use desk_core::entities::CheckIn;
use desk_core::enums::CheckInStage;
use desk_core::ids::PREFIX_CHECK_IN;
use desk_core::responses::{CheckInResult, VerificationSummary};
use desk_core::rules::{decide, derive_violations, normalize_seat};
use desk_oracle::{VerificationAdapter, VerificationOracle};

use crate::error::{CheckInError, DatabaseError};
use crate::helpers::query_count;
use crate::service::DeskService;

/// A captured photo as handed over by the capture device.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Storage reference of the captured image.
    pub reference: String,
    pub content_type: Option<String>,
    pub size_bytes: u64,
}

impl PhotoUpload {
    #[must_use]
    pub fn new(reference: impl Into<String>, content_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            reference: reference.into(),
            content_type: Some(content_type.into()),
            size_bytes,
        }
    }
}

/// Input to [`DeskService::perform_check_in`].
#[derive(Debug, Clone)]
pub struct CheckInRequest {
    pub exam_id: String,
    pub student_id: String,
    pub claimed_seat: Option<String>,
    pub photo: PhotoUpload,
    pub notes: Option<String>,
}

fn stage(reached: CheckInStage, exam_id: &str, student_id: &str) {
    tracing::debug!(stage = %reached, exam_id, student_id, "check-in stage reached");
}

impl DeskService {
    /// Check a student in.
    ///
    /// # Errors
    ///
    /// - `BadInput`: missing ids, an unusable photo, or an unknown exam
    /// - `NotEnrolled`: the student is not on the exam's roster
    /// - `Duplicate`: the student already has a check-in, found before or at insert
    /// - `Store`: any other persistence failure
    ///
    /// Failures writing derived violations are not errors: they are retried,
    /// queued and reported in `deferred_violations`.
    pub async fn perform_check_in<O: VerificationOracle>(
        &self,
        verifier: &VerificationAdapter<O>,
        request: &CheckInRequest,
        actor_id: &str,
    ) -> Result<CheckInResult, CheckInError> {
        let exam_id = request.exam_id.trim();
        let student_id = request.student_id.trim();

        self.check_intake(exam_id, student_id, &request.photo)
            .inspect_err(|e| tracing::info!(exam_id, student_id, error = %e, "check-in rejected"))?;
        stage(CheckInStage::Intake, exam_id, student_id);

        match self.get_exam(exam_id).await {
            Ok(_) => {}
            Err(DatabaseError::NoResult) => {
                tracing::info!(exam_id, student_id, "check-in rejected: unknown exam");
                return Err(CheckInError::BadInput(format!("exam {exam_id} does not exist")));
            }
            Err(e) => return Err(e.into()),
        }
        let Some(entry) = self.find_roster_entry(exam_id, student_id).await? else {
            tracing::info!(exam_id, student_id, "check-in rejected: not on roster");
            return Err(CheckInError::NotEnrolled {
                exam_id: exam_id.to_string(),
                student_id: student_id.to_string(),
            });
        };
        stage(CheckInStage::RosterChecked, exam_id, student_id);

        if self.find_check_in(exam_id, student_id).await?.is_some() {
            tracing::info!(exam_id, student_id, "check-in rejected: already checked in");
            return Err(duplicate(exam_id, student_id));
        }

        let claimed_seat = normalize_seat(request.claimed_seat.as_deref());
        let claimed_seat_known = match &claimed_seat {
            Some(code) => self.seat_in_plan(exam_id, code).await,
            None => None,
        };
        stage(CheckInStage::SeatValidated, exam_id, student_id);

        let student = self.get_student(student_id).await?;
        let verification = verifier
            .verify(&request.photo.reference, student.enrolled_photo_ref.as_deref())
            .await;
        if let Some(reason) = verification.unavailable_reason() {
            tracing::warn!(exam_id, student_id, %reason, "verification unavailable, flagging");
        }
        stage(CheckInStage::Verified, exam_id, student_id);

        let (outcome, decision) = decide(verification.is_match());
        let now = Utc::now();
        let check_in = CheckIn {
            id: self.db().generate_id(PREFIX_CHECK_IN).await?,
            exam_id: exam_id.to_string(),
            student_id: student_id.to_string(),
            captured_photo_ref: request.photo.reference.trim().to_string(),
            claimed_seat,
            claimed_seat_known,
            assigned_seat: entry.assigned_seat,
            verification_outcome: outcome,
            confidence_score: verification.confidence_score(),
            verification_note: verification.unavailable_reason().map(ToString::to_string),
            decision_status: decision,
            proctor_id: actor_id.to_string(),
            notes: request
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
            overridden_by: None,
            overridden_at: None,
            checked_in_at: now,
            updated_at: now,
        };
        stage(CheckInStage::Decided, exam_id, student_id);

        match self.insert_check_in(&check_in).await {
            Ok(()) => {}
            Err(DatabaseError::UniqueViolation(_)) => {
                tracing::info!(exam_id, student_id, "check-in rejected: lost insert race");
                return Err(duplicate(exam_id, student_id));
            }
            Err(e) => return Err(e.into()),
        }
        stage(CheckInStage::Persisted, exam_id, student_id);
        tracing::info!(
            check_in_id = %check_in.id,
            decision = %check_in.decision_status,
            confidence_score = check_in.confidence_score,
            "student checked in"
        );

        let (violations, deferred_violations) =
            self.persist_derived_violations(derive_violations(&check_in)).await;

        Ok(CheckInResult {
            verification: VerificationSummary {
                outcome: check_in.verification_outcome,
                is_match: verification.is_match(),
                confidence_score: check_in.confidence_score,
                unavailable_reason: check_in.verification_note.clone(),
            },
            check_in,
            violations,
            deferred_violations,
        })
    }

    fn check_intake(&self, exam_id: &str, student_id: &str, photo: &PhotoUpload) -> Result<(), CheckInError> {
        if exam_id.is_empty() {
            return Err(CheckInError::BadInput("exam id is required".into()));
        }
        if student_id.is_empty() {
            return Err(CheckInError::BadInput("student id is required".into()));
        }
        if photo.reference.trim().is_empty() || photo.size_bytes == 0 {
            return Err(CheckInError::BadInput("a captured photo is required".into()));
        }
        let max = self.intake().max_photo_bytes;
        if photo.size_bytes > max {
            return Err(CheckInError::BadInput(format!(
                "photo is {} bytes, limit is {max}",
                photo.size_bytes
            )));
        }
        if let Some(content_type) = &photo.content_type
            && !self.intake().allows_content_type(content_type)
        {
            return Err(CheckInError::BadInput(format!(
                "photo content type {content_type} is not accepted"
            )));
        }
        Ok(())
    }

    /// Whether `code` is a seat of the exam's plan; `None` without a plan.
    /// Lookup failures are logged and treated as "no plan".
    async fn seat_in_plan(&self, exam_id: &str, code: &str) -> Option<bool> {
        let plan = match self.get_seating_plan(exam_id).await {
            Ok(plan) => plan?,
            Err(e) => {
                tracing::warn!(exam_id, error = %e, "seating plan lookup failed");
                return None;
            }
        };
        match query_count(
            self.db().reader().await.conn(),
            "SELECT COUNT(*) FROM seats WHERE plan_id = ?1 AND seat_code = ?2",
            libsql::params![plan.id.as_str(), code],
        )
        .await
        {
            Ok(n) => Some(n > 0),
            Err(e) => {
                tracing::warn!(exam_id, error = %e, "seat lookup failed");
                None
            }
        }
    }
}

fn duplicate(exam_id: &str, student_id: &str) -> CheckInError {
    CheckInError::Duplicate {
        exam_id: exam_id.to_string(),
        student_id: student_id.to_string(),
    }
}
