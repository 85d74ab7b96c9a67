//! Exam repository: create, lookup, lifecycle transitions.

use chrono::{DateTime, Utc};

use desk_core::entities::Exam;
use desk_core::errors::CoreError;
use desk_core::enums::ExamStatus;
use desk_core::ids::PREFIX_EXAM;

use crate::error::DatabaseError;
use crate::helpers::{get_u32, parse_datetime, parse_enum, unique_or_db};
use crate::service::DeskService;

const SELECT_COLS: &str =
    "id, code, title, starts_at, ends_at, capacity, status, created_at, updated_at";

fn row_to_exam(row: &libsql::Row) -> Result<Exam, DatabaseError> {
    Ok(Exam {
        id: row.get(0)?,
        code: row.get(1)?,
        title: row.get(2)?,
        starts_at: parse_datetime(&row.get::<String>(3)?)?,
        ends_at: parse_datetime(&row.get::<String>(4)?)?,
        capacity: get_u32(row, 5)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl DeskService {
    /// Create an exam in `draft`. The code is trimmed and uppercased.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank code or title, a window that does not end
    /// after it starts, or zero capacity; `UniqueViolation` for a taken code.
    pub async fn create_exam(
        &self,
        code: &str,
        title: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        capacity: u32,
    ) -> Result<Exam, DatabaseError> {
        let code = code.trim().to_ascii_uppercase();
        let title = title.trim();
        if code.is_empty() {
            return Err(DatabaseError::Validation("exam code is required".into()));
        }
        if title.is_empty() {
            return Err(DatabaseError::Validation("exam title is required".into()));
        }
        if ends_at <= starts_at {
            return Err(DatabaseError::Validation(
                "exam must end after it starts".into(),
            ));
        }
        if capacity == 0 {
            return Err(DatabaseError::Validation(
                "exam capacity must be at least 1".into(),
            ));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_EXAM).await?;
        self.db()
            .execute(
                &format!(
                    "INSERT INTO exams ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                libsql::params![
                    id.as_str(),
                    code.as_str(),
                    title,
                    starts_at.to_rfc3339(),
                    ends_at.to_rfc3339(),
                    capacity,
                    ExamStatus::Draft.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| unique_or_db(e, || format!("exam code {code}")))?;

        tracing::info!(exam_id = %id, %code, "exam created");
        Ok(Exam {
            id,
            code,
            title: title.to_string(),
            starts_at,
            ends_at,
            capacity,
            status: ExamStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_exam(&self, id: &str) -> Result<Exam, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM exams WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_exam(&row)
    }

    pub async fn get_exam_by_code(&self, code: &str) -> Result<Exam, DatabaseError> {
        let code = code.trim().to_ascii_uppercase();
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM exams WHERE code = ?1"),
                [code.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_exam(&row)
    }

    pub async fn list_exams(&self, limit: u32) -> Result<Vec<Exam>, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM exams ORDER BY starts_at, code LIMIT ?1"),
                [limit],
            )
            .await?;

        let mut exams = Vec::new();
        while let Some(row) = rows.next().await? {
            exams.push(row_to_exam(&row)?);
        }
        Ok(exams)
    }

    /// # Errors
    ///
    /// `InvalidState` if the exam's lifecycle does not allow `new_status`.
    pub async fn transition_exam(
        &self,
        exam_id: &str,
        new_status: ExamStatus,
    ) -> Result<Exam, DatabaseError> {
        let current = self.get_exam(exam_id).await?;

        if !current.status.can_transition_to(new_status) {
            return Err(CoreError::invalid_transition("exam", exam_id, current.status, new_status).into());
        }

        let now = Utc::now();
        self.db()
            .execute(
                "UPDATE exams SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![new_status.as_str(), now.to_rfc3339(), exam_id],
            )
            .await?;

        tracing::info!(exam_id, from = %current.status, to = %new_status, "exam transitioned");
        Ok(Exam {
            status: new_status,
            updated_at: now,
            ..current
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{create_test_exam, test_service};
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_and_get_exam() {
        let svc = test_service().await;
        let exam = create_test_exam(&svc, " cs101 ", 30).await;
        assert!(exam.id.starts_with("exm-"));
        assert_eq!(exam.code, "CS101");
        assert_eq!(exam.status, ExamStatus::Draft);

        let fetched = svc.get_exam(&exam.id).await.unwrap();
        assert_eq!(fetched.code, "CS101");
        assert_eq!(fetched.capacity, 30);
        assert_eq!(fetched.starts_at, exam.starts_at);

        let by_code = svc.get_exam_by_code("cs101").await.unwrap();
        assert_eq!(by_code.id, exam.id);
    }

    #[tokio::test]
    async fn duplicate_code_is_unique_violation() {
        let svc = test_service().await;
        create_test_exam(&svc, "CS101", 30).await;
        let starts = Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap();
        let err = svc
            .create_exam("cs101", "Again", starts, starts + Duration::hours(1), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn create_rejects_bad_window_and_capacity() {
        let svc = test_service().await;
        let starts = Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap();
        assert!(matches!(
            svc.create_exam("X1", "t", starts, starts, 10).await,
            Err(DatabaseError::Validation(_))
        ));
        assert!(matches!(
            svc.create_exam("X1", "t", starts, starts + Duration::hours(1), 0).await,
            Err(DatabaseError::Validation(_))
        ));
        assert!(matches!(
            svc.create_exam("  ", "t", starts, starts + Duration::hours(1), 5).await,
            Err(DatabaseError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn lifecycle_transitions() {
        let svc = test_service().await;
        let exam = create_test_exam(&svc, "CS101", 30).await;

        let active = svc.transition_exam(&exam.id, ExamStatus::Active).await.unwrap();
        assert_eq!(active.status, ExamStatus::Active);

        let err = svc.transition_exam(&exam.id, ExamStatus::Draft).await.unwrap_err();
        match err {
            DatabaseError::InvalidState(msg) => {
                assert_eq!(
                    msg,
                    format!("Invalid state transition: exam {} from active to draft", exam.id)
                );
            }
            other => panic!("expected invalid state, got {other}"),
        }

        svc.transition_exam(&exam.id, ExamStatus::Completed).await.unwrap();
        svc.transition_exam(&exam.id, ExamStatus::Archived).await.unwrap();
        assert_eq!(
            svc.get_exam(&exam.id).await.unwrap().status,
            ExamStatus::Archived
        );
    }

    #[tokio::test]
    async fn get_missing_exam_is_no_result() {
        let svc = test_service().await;
        assert!(matches!(
            svc.get_exam("exm-missing").await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn list_exams_respects_limit() {
        let svc = test_service().await;
        create_test_exam(&svc, "A1", 5).await;
        create_test_exam(&svc, "B2", 5).await;
        create_test_exam(&svc, "C3", 5).await;
        assert_eq!(svc.list_exams(2).await.unwrap().len(), 2);
        assert_eq!(svc.list_exams(50).await.unwrap().len(), 3);
    }
}
