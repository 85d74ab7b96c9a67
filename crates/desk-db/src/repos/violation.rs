//! Violation repository.
//!
//! Automatic violations come from [`desk_core::rules::derive_violations`] and
//! are unique per `(check_in, category)` in the store, so retries and queue
//! replays never duplicate them. Manual violations are recorded by proctors.

use chrono::Utc;

use desk_core::entities::Violation;
use desk_core::errors::CoreError;
use desk_core::enums::{Severity, ViolationCategory, ViolationSource, ViolationStatus};
use desk_core::ids::PREFIX_VIOLATION;
use desk_core::responses::ReplayResponse;
use desk_core::rules::{ViolationDraft, append_notes};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::retry::with_retry;
use crate::service::DeskService;

const SELECT_COLS: &str = "id, exam_id, student_id, check_in_id, category, severity, status, source, \
     description, evidence_ref, reported_by, resolved_by, resolved_at, resolution_notes, \
     created_at, updated_at";

fn row_to_violation(row: &libsql::Row) -> Result<Violation, DatabaseError> {
    Ok(Violation {
        id: row.get(0)?,
        exam_id: row.get(1)?,
        student_id: row.get(2)?,
        check_in_id: get_opt_string(row, 3)?,
        category: parse_enum(&row.get::<String>(4)?)?,
        severity: parse_enum(&row.get::<String>(5)?)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        source: parse_enum(&row.get::<String>(7)?)?,
        description: row.get(8)?,
        evidence_ref: get_opt_string(row, 9)?,
        reported_by: row.get(10)?,
        resolved_by: get_opt_string(row, 11)?,
        resolved_at: parse_optional_datetime(get_opt_string(row, 12)?.as_deref())?,
        resolution_notes: get_opt_string(row, 13)?,
        created_at: parse_datetime(&row.get::<String>(14)?)?,
        updated_at: parse_datetime(&row.get::<String>(15)?)?,
    })
}

/// A proctor-reported violation.
#[derive(Debug, Clone)]
pub struct NewViolation {
    pub exam_id: String,
    pub student_id: String,
    pub check_in_id: Option<String>,
    pub category: ViolationCategory,
    pub severity: Severity,
    pub description: String,
    pub evidence_ref: Option<String>,
}

/// Filters for [`DeskService::list_violations`].
#[derive(Debug, Default)]
pub struct ViolationFilter {
    pub exam_id: Option<String>,
    pub student_id: Option<String>,
    pub category: Option<ViolationCategory>,
    pub severity: Option<Severity>,
    pub status: Option<ViolationStatus>,
    pub limit: Option<u32>,
}

impl DeskService {
    /// Write one automatic violation, or return the one already stored for
    /// the same check-in and category.
    pub async fn insert_derived_violation(&self, draft: &ViolationDraft) -> Result<Violation, DatabaseError> {
        let id = self.db().generate_id(PREFIX_VIOLATION).await?;
        let now = Utc::now().to_rfc3339();
        self.db()
            .execute(
                &format!(
                    "INSERT INTO violations ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, NULL, NULL, NULL, ?12, ?12)
                     ON CONFLICT DO NOTHING"
                ),
                libsql::params![
                    id.as_str(),
                    draft.exam_id.as_str(),
                    draft.student_id.as_str(),
                    draft.check_in_id.as_str(),
                    draft.category.as_str(),
                    draft.severity.as_str(),
                    ViolationStatus::Recorded.as_str(),
                    ViolationSource::Automatic.as_str(),
                    draft.description.as_str(),
                    draft.evidence_ref.as_deref(),
                    draft.reported_by.as_str(),
                    now
                ],
            )
            .await?;

        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM violations
                     WHERE check_in_id = ?1 AND category = ?2 AND source = 'automatic'"
                ),
                libsql::params![draft.check_in_id.as_str(), draft.category.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_violation(&row)
    }

    /// Persist derived violations after their check-in has committed.
    ///
    /// Each draft is retried per the service's retry policy. Drafts that
    /// still fail are appended to the deferred queue and returned as the
    /// second element; they are never dropped silently.
    pub async fn persist_derived_violations(
        &self,
        drafts: Vec<ViolationDraft>,
    ) -> (Vec<Violation>, Vec<ViolationDraft>) {
        let mut stored = Vec::new();
        let mut deferred = Vec::new();

        for draft in drafts {
            match with_retry(self.retry(), "derived_violation", || self.insert_derived_violation(&draft)).await {
                Ok(violation) => {
                    tracing::info!(
                        violation_id = %violation.id,
                        check_in_id = %draft.check_in_id,
                        category = %draft.category,
                        severity = %draft.severity,
                        "violation recorded"
                    );
                    stored.push(violation);
                }
                Err(e) => {
                    tracing::error!(
                        check_in_id = %draft.check_in_id,
                        category = %draft.category,
                        error = %e,
                        "violation write failed after retries, deferring"
                    );
                    deferred.push(draft);
                }
            }
        }

        if !deferred.is_empty() {
            match self.queue().push(&deferred) {
                Ok(true) => tracing::warn!(count = deferred.len(), "violations queued for replay"),
                Ok(false) => tracing::error!(
                    count = deferred.len(),
                    "violation queue disabled, deferred violations exist only in this response"
                ),
                Err(e) => tracing::error!(count = deferred.len(), error = %e, "failed to queue violations"),
            }
        }

        (stored, deferred)
    }

    /// Retry every queued draft. Drafts that fail again go back on the queue.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the queue file cannot be read or rewritten.
    pub async fn replay_deferred_violations(&self) -> Result<ReplayResponse, DatabaseError> {
        let drafts = self.queue().drain()?;
        let mut replayed = Vec::new();
        let mut still_deferred = Vec::new();

        for draft in drafts {
            match self.insert_derived_violation(&draft).await {
                Ok(violation) => replayed.push(violation),
                Err(e) => {
                    tracing::warn!(check_in_id = %draft.check_in_id, error = %e, "replay failed");
                    still_deferred.push(draft);
                }
            }
        }
        self.queue().push(&still_deferred)?;

        tracing::info!(
            replayed = replayed.len(),
            still_deferred = still_deferred.len(),
            "deferred violations replayed"
        );
        Ok(ReplayResponse {
            replayed,
            still_deferred,
        })
    }

    /// Record a manual violation.
    ///
    /// # Errors
    ///
    /// `NoResult` for an unknown exam or student, `Validation` for a blank
    /// description, `InvalidState` when the referenced check-in belongs to a
    /// different exam or student.
    pub async fn record_violation(&self, new: &NewViolation, actor_id: &str) -> Result<Violation, DatabaseError> {
        let description = new.description.trim();
        if description.is_empty() {
            return Err(DatabaseError::Validation("violation description is required".into()));
        }
        self.get_exam(&new.exam_id).await?;
        self.get_student(&new.student_id).await?;
        if let Some(check_in_id) = &new.check_in_id {
            let check_in = self.get_check_in(check_in_id).await?;
            if check_in.exam_id != new.exam_id || check_in.student_id != new.student_id {
                return Err(DatabaseError::InvalidState(format!(
                    "check-in {check_in_id} does not belong to student {} in exam {}",
                    new.student_id, new.exam_id
                )));
            }
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_VIOLATION).await?;
        let evidence = new
            .evidence_ref
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());
        self.db()
            .execute(
                &format!(
                    "INSERT INTO violations ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, NULL, NULL, NULL, ?12, ?12)"
                ),
                libsql::params![
                    id.as_str(),
                    new.exam_id.as_str(),
                    new.student_id.as_str(),
                    new.check_in_id.as_deref(),
                    new.category.as_str(),
                    new.severity.as_str(),
                    ViolationStatus::Recorded.as_str(),
                    ViolationSource::Manual.as_str(),
                    description,
                    evidence,
                    actor_id,
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::info!(violation_id = %id, category = %new.category, actor_id, "manual violation recorded");
        Ok(Violation {
            id,
            exam_id: new.exam_id.clone(),
            student_id: new.student_id.clone(),
            check_in_id: new.check_in_id.clone(),
            category: new.category,
            severity: new.severity,
            status: ViolationStatus::Recorded,
            source: ViolationSource::Manual,
            description: description.to_string(),
            evidence_ref: evidence.map(String::from),
            reported_by: actor_id.to_string(),
            resolved_by: None,
            resolved_at: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_violation(&self, id: &str) -> Result<Violation, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM violations WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_violation(&row)
    }

    pub async fn list_violations(&self, filter: &ViolationFilter) -> Result<Vec<Violation>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref exam_id) = filter.exam_id {
            params.push(libsql::Value::Text(exam_id.clone()));
            conditions.push(format!("exam_id = ?{}", params.len()));
        }
        if let Some(ref student_id) = filter.student_id {
            params.push(libsql::Value::Text(student_id.clone()));
            conditions.push(format!("student_id = ?{}", params.len()));
        }
        if let Some(category) = filter.category {
            params.push(libsql::Value::Text(category.as_str().to_string()));
            conditions.push(format!("category = ?{}", params.len()));
        }
        if let Some(severity) = filter.severity {
            params.push(libsql::Value::Text(severity.as_str().to_string()));
            conditions.push(format!("severity = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM violations {where_clause}
             ORDER BY created_at DESC, id LIMIT {limit}"
        );

        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut violations = Vec::new();
        while let Some(row) = rows.next().await? {
            violations.push(row_to_violation(&row)?);
        }
        Ok(violations)
    }

    /// Move a violation through its lifecycle.
    ///
    /// Closing (`resolved`/`dismissed`) stamps the actor and time.
    /// `resolution_notes` are appended to what is already there; empty notes
    /// change nothing.
    ///
    /// # Errors
    ///
    /// `NoResult` for an unknown violation, `InvalidState` for a transition
    /// the lifecycle does not allow.
    pub async fn set_violation_status(
        &self,
        violation_id: &str,
        new_status: ViolationStatus,
        resolution_notes: Option<&str>,
        actor_id: &str,
    ) -> Result<Violation, DatabaseError> {
        let current = self.get_violation(violation_id).await?;

        if !current.status.can_transition_to(new_status) {
            return Err(
                CoreError::invalid_transition("violation", violation_id, current.status, new_status).into(),
            );
        }

        let now = Utc::now();
        let notes = append_notes(current.resolution_notes.as_deref(), resolution_notes);
        let (resolved_by, resolved_at) = if new_status.is_closing() {
            (Some(actor_id.to_string()), Some(now))
        } else {
            (current.resolved_by.clone(), current.resolved_at)
        };

        // Status guard in WHERE: a concurrent transition makes this a no-op.
        let changed = self
            .db()
            .execute(
                "UPDATE violations
                 SET status = ?1, resolution_notes = ?2, resolved_by = ?3, resolved_at = ?4, updated_at = ?5
                 WHERE id = ?6 AND status = ?7",
                libsql::params![
                    new_status.as_str(),
                    notes.as_deref(),
                    resolved_by.as_deref(),
                    resolved_at.map(|t| t.to_rfc3339()),
                    now.to_rfc3339(),
                    violation_id,
                    current.status.as_str()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "violation {violation_id} changed status concurrently"
            )));
        }

        tracing::info!(violation_id, from = %current.status, to = %new_status, actor_id, "violation status changed");
        Ok(Violation {
            status: new_status,
            resolution_notes: notes,
            resolved_by,
            resolved_at,
            updated_at: now,
            ..current
        })
    }
}
