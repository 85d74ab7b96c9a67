//! Check-in repository: the authoritative insert, lookups and override.
//!
//! `UNIQUE (exam_id, student_id)` on `check_ins` is what makes a check-in
//! happen at most once. [`DeskService::insert_check_in`] reports a lost race
//! as `UniqueViolation`; the workflow turns that into its duplicate rejection.

use chrono::Utc;

use desk_core::entities::CheckIn;
use desk_core::enums::{DecisionStatus, VerificationOutcome};
use desk_core::rules::{DEFAULT_OVERRIDE_NOTE, append_notes};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime, unique_or_db};
use crate::service::DeskService;

const SELECT_COLS: &str = "id, exam_id, student_id, captured_photo_ref, claimed_seat, claimed_seat_known, \
     assigned_seat, verification_outcome, confidence_score, verification_note, decision_status, \
     proctor_id, notes, overridden_by, overridden_at, checked_in_at, updated_at";

fn row_to_check_in(row: &libsql::Row) -> Result<CheckIn, DatabaseError> {
    Ok(CheckIn {
        id: row.get(0)?,
        exam_id: row.get(1)?,
        student_id: row.get(2)?,
        captured_photo_ref: row.get(3)?,
        claimed_seat: get_opt_string(row, 4)?,
        claimed_seat_known: row.get::<Option<i64>>(5)?.map(|v| v != 0),
        assigned_seat: get_opt_string(row, 6)?,
        verification_outcome: parse_enum(&row.get::<String>(7)?)?,
        confidence_score: row.get(8)?,
        verification_note: get_opt_string(row, 9)?,
        decision_status: parse_enum(&row.get::<String>(10)?)?,
        proctor_id: row.get(11)?,
        notes: get_opt_string(row, 12)?,
        overridden_by: get_opt_string(row, 13)?,
        overridden_at: parse_optional_datetime(get_opt_string(row, 14)?.as_deref())?,
        checked_in_at: parse_datetime(&row.get::<String>(15)?)?,
        updated_at: parse_datetime(&row.get::<String>(16)?)?,
    })
}

/// Filters for [`DeskService::list_check_ins`].
#[derive(Debug, Default)]
pub struct CheckInFilter {
    pub exam_id: Option<String>,
    pub decision_status: Option<DecisionStatus>,
    pub verification_outcome: Option<VerificationOutcome>,
    pub limit: Option<u32>,
}

impl DeskService {
    /// Insert a fully decided check-in.
    ///
    /// # Errors
    ///
    /// `UniqueViolation` when the student already has a check-in for the exam.
    pub async fn insert_check_in(&self, check_in: &CheckIn) -> Result<(), DatabaseError> {
        self.db()
            .execute(
                &format!(
                    "INSERT INTO check_ins ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
                ),
                libsql::params![
                    check_in.id.as_str(),
                    check_in.exam_id.as_str(),
                    check_in.student_id.as_str(),
                    check_in.captured_photo_ref.as_str(),
                    check_in.claimed_seat.as_deref(),
                    check_in.claimed_seat_known.map(i64::from),
                    check_in.assigned_seat.as_deref(),
                    check_in.verification_outcome.as_str(),
                    check_in.confidence_score,
                    check_in.verification_note.as_deref(),
                    check_in.decision_status.as_str(),
                    check_in.proctor_id.as_str(),
                    check_in.notes.as_deref(),
                    check_in.overridden_by.as_deref(),
                    check_in.overridden_at.map(|t| t.to_rfc3339()),
                    check_in.checked_in_at.to_rfc3339(),
                    check_in.updated_at.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| {
                unique_or_db(e, || {
                    format!(
                        "check-in for student {} in exam {}",
                        check_in.student_id, check_in.exam_id
                    )
                })
            })?;
        Ok(())
    }

    pub async fn get_check_in(&self, id: &str) -> Result<CheckIn, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM check_ins WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_check_in(&row)
    }

    /// The check-in for `(exam, student)`, if any.
    pub async fn find_check_in(
        &self,
        exam_id: &str,
        student_id: &str,
    ) -> Result<Option<CheckIn>, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM check_ins WHERE exam_id = ?1 AND student_id = ?2"),
                libsql::params![exam_id, student_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_check_in(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_check_ins(&self, filter: &CheckInFilter) -> Result<Vec<CheckIn>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref exam_id) = filter.exam_id {
            params.push(libsql::Value::Text(exam_id.clone()));
            conditions.push(format!("exam_id = ?{}", params.len()));
        }
        if let Some(status) = filter.decision_status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("decision_status = ?{}", params.len()));
        }
        if let Some(outcome) = filter.verification_outcome {
            params.push(libsql::Value::Text(outcome.as_str().to_string()));
            conditions.push(format!("verification_outcome = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM check_ins {where_clause}
             ORDER BY checked_in_at DESC, id LIMIT {limit}"
        );

        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut check_ins = Vec::new();
        while let Some(row) = rows.next().await? {
            check_ins.push(row_to_check_in(&row)?);
        }
        Ok(check_ins)
    }

    /// Record a proctor's override of the machine decision.
    ///
    /// Sets the outcome to `override` and appends `notes` (or the default
    /// override note) to the existing notes. The decision status and the
    /// original confidence score are left as they were.
    ///
    /// # Errors
    ///
    /// `NoResult` when the check-in does not exist.
    pub async fn override_check_in(
        &self,
        check_in_id: &str,
        notes: Option<&str>,
        actor_id: &str,
    ) -> Result<CheckIn, DatabaseError> {
        let current = self.get_check_in(check_in_id).await?;

        let note = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_OVERRIDE_NOTE);
        let merged = append_notes(current.notes.as_deref(), Some(note));
        let now = Utc::now();

        self.db()
            .execute(
                "UPDATE check_ins
                 SET verification_outcome = ?1, notes = ?2, overridden_by = ?3,
                     overridden_at = ?4, updated_at = ?4
                 WHERE id = ?5",
                libsql::params![
                    VerificationOutcome::Override.as_str(),
                    merged.as_deref(),
                    actor_id,
                    now.to_rfc3339(),
                    check_in_id
                ],
            )
            .await?;

        tracing::info!(
            check_in_id,
            actor_id,
            previous_outcome = %current.verification_outcome,
            "check-in overridden"
        );
        Ok(CheckIn {
            verification_outcome: VerificationOutcome::Override,
            notes: merged,
            overridden_by: Some(actor_id.to_string()),
            overridden_at: Some(now),
            updated_at: now,
            ..current
        })
    }
}
