//! Per-exam reporting.

use desk_core::responses::ExamSummary;

use crate::error::DatabaseError;
use crate::helpers::get_u32;
use crate::service::DeskService;

impl DeskService {
    /// Aggregate check-in and violation counts for one exam.
    ///
    /// # Errors
    ///
    /// `NoResult` when the exam does not exist.
    pub async fn exam_summary(&self, exam_id: &str) -> Result<ExamSummary, DatabaseError> {
        self.get_exam(exam_id).await?;

        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                "SELECT
                    COUNT(*),
                    COALESCE(SUM(decision_status = 'approved'), 0),
                    COALESCE(SUM(decision_status = 'flagged'), 0),
                    COALESCE(SUM(verification_outcome = 'no_match'), 0),
                    COALESCE(SUM(verification_outcome = 'override'), 0)
                 FROM check_ins WHERE exam_id = ?1",
                [exam_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let total_check_ins = get_u32(&row, 0)?;
        let approved = get_u32(&row, 1)?;
        let flagged = get_u32(&row, 2)?;
        let identity_mismatches = get_u32(&row, 3)?;
        let overrides = get_u32(&row, 4)?;

        let mut rows = reader
            .conn()
            .query(
                "SELECT
                    COUNT(*),
                    COALESCE(SUM(category = 'seat_mismatch'), 0),
                    COALESCE(SUM(status IN ('recorded', 'reviewed')), 0)
                 FROM violations WHERE exam_id = ?1",
                [exam_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;

        Ok(ExamSummary {
            exam_id: exam_id.to_string(),
            total_check_ins,
            approved,
            flagged,
            identity_mismatches,
            overrides,
            seat_mismatches: get_u32(&row, 1)?,
            total_violations: get_u32(&row, 0)?,
            open_violations: get_u32(&row, 2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{PROCTOR, adapter, seeded_exam, test_service};
    use crate::workflow::check_in::{CheckInRequest, PhotoUpload};
    use desk_core::responses::ExamSummary;
    use pretty_assertions::assert_eq;

    use crate::error::DatabaseError;

    #[tokio::test]
    async fn empty_exam_reports_zeros() {
        let svc = test_service().await;
        let (exam, _plan, _students) = seeded_exam(&svc, 0).await;
        let summary = svc.exam_summary(&exam.id).await.unwrap();
        assert_eq!(
            summary,
            ExamSummary {
                exam_id: exam.id.clone(),
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn counts_decisions_and_violations() {
        let svc = test_service().await;
        let (exam, plan_id, students) = seeded_exam(&svc, 2).await;
        svc.assign_seats(
            &plan_id,
            &[(students[0].id.clone(), "A1".to_string())],
            "admin",
        )
        .await
        .unwrap();

        let request = |i: usize, seat: &str| CheckInRequest {
            exam_id: exam.id.clone(),
            student_id: students[i].id.clone(),
            claimed_seat: Some(seat.to_string()),
            photo: PhotoUpload::new(format!("cap/s{i}.jpg"), "image/jpeg", 2048),
            notes: None,
        };

        // Approved, sat in the wrong seat.
        svc.perform_check_in(&adapter(true, 92.0), &request(0, "B1"), PROCTOR)
            .await
            .unwrap();
        // Flagged, then overridden.
        let flagged = svc
            .perform_check_in(&adapter(false, 30.0), &request(1, "A2"), PROCTOR)
            .await
            .unwrap();
        svc.override_check_in(&flagged.check_in.id, Some("ID card checked"), "admin")
            .await
            .unwrap();

        let summary = svc.exam_summary(&exam.id).await.unwrap();
        assert_eq!(summary.total_check_ins, 2);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.flagged, 1);
        assert_eq!(summary.identity_mismatches, 0);
        assert_eq!(summary.overrides, 1);
        assert_eq!(summary.seat_mismatches, 1);
        assert_eq!(summary.total_violations, 2);
        assert_eq!(summary.open_violations, 2);
    }

    #[tokio::test]
    async fn unknown_exam_is_no_result() {
        let svc = test_service().await;
        assert!(matches!(
            svc.exam_summary("exm-missing").await,
            Err(DatabaseError::NoResult)
        ));
    }
}
