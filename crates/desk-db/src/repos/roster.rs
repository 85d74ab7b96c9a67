//! Roster repository.
//!
//! A roster row only records enrollment. The assigned seat is read from the
//! exam's current seating plan, so regenerating or reassigning seats never
//! leaves a stale copy behind.

use chrono::Utc;

use desk_core::entities::RosterEntry;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, query_count, unique_or};
use crate::service::DeskService;

const SELECT_ENTRY: &str = "SELECT r.exam_id, r.student_id, a.seat_code, r.created_at
     FROM roster_entries r
     LEFT JOIN seating_plans p ON p.exam_id = r.exam_id
     LEFT JOIN seat_assignments a ON a.plan_id = p.id AND a.student_id = r.student_id";

fn row_to_entry(row: &libsql::Row) -> Result<RosterEntry, DatabaseError> {
    Ok(RosterEntry {
        exam_id: row.get(0)?,
        student_id: row.get(1)?,
        assigned_seat: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl DeskService {
    /// Enroll a student in an exam.
    ///
    /// The capacity check and the insert are one statement, so concurrent
    /// enrollments cannot overfill the exam.
    ///
    /// # Errors
    ///
    /// `NoResult` for an unknown exam or student, `UniqueViolation` if
    /// already enrolled, `InvalidState` when the exam is full.
    pub async fn add_to_roster(
        &self,
        exam_id: &str,
        student_id: &str,
    ) -> Result<RosterEntry, DatabaseError> {
        let exam = self.get_exam(exam_id).await?;
        self.get_student(student_id).await?;

        let now = Utc::now();
        let inserted = {
            let tx = self.db().transaction().await?;
            let inserted = tx
                .conn()
                .execute(
                    "INSERT INTO roster_entries (exam_id, student_id, created_at)
                     SELECT ?1, ?2, ?3
                     WHERE (SELECT COUNT(*) FROM roster_entries WHERE exam_id = ?1) < ?4",
                    libsql::params![exam_id, student_id, now.to_rfc3339(), exam.capacity],
                )
                .await
                .map_err(|e| {
                    unique_or(e, || format!("student {student_id} already on roster of exam {exam_id}"))
                })?;
            tx.commit().await?;
            inserted
        };

        if inserted == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "exam {} is at capacity ({})",
                exam.code, exam.capacity
            )));
        }

        tracing::debug!(exam_id, student_id, "student added to roster");
        self.find_roster_entry(exam_id, student_id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Remove a student from an exam's roster along with any seat they were
    /// assigned in its plan.
    ///
    /// # Errors
    ///
    /// `NoResult` if the student was not on the roster.
    pub async fn remove_from_roster(&self, exam_id: &str, student_id: &str) -> Result<(), DatabaseError> {
        let tx = self.db().transaction().await?;
        tx.conn()
            .execute(
                "DELETE FROM seat_assignments
                 WHERE student_id = ?2
                   AND plan_id IN (SELECT id FROM seating_plans WHERE exam_id = ?1)",
                libsql::params![exam_id, student_id],
            )
            .await?;
        let removed = tx
            .conn()
            .execute(
                "DELETE FROM roster_entries WHERE exam_id = ?1 AND student_id = ?2",
                libsql::params![exam_id, student_id],
            )
            .await?;
        if removed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_roster(&self, exam_id: &str) -> Result<Vec<RosterEntry>, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                &format!("{SELECT_ENTRY} WHERE r.exam_id = ?1 ORDER BY r.created_at, r.student_id"),
                [exam_id],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    /// The roster entry for `(exam, student)`, with the currently assigned seat.
    pub async fn find_roster_entry(
        &self,
        exam_id: &str,
        student_id: &str,
    ) -> Result<Option<RosterEntry>, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                &format!("{SELECT_ENTRY} WHERE r.exam_id = ?1 AND r.student_id = ?2"),
                libsql::params![exam_id, student_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_entry(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn roster_size(&self, exam_id: &str) -> Result<u32, DatabaseError> {
        query_count(
            self.db().reader().await.conn(),
            "SELECT COUNT(*) FROM roster_entries WHERE exam_id = ?1",
            [exam_id],
        )
        .await
    }
}
