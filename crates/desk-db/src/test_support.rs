//! Shared test utilities for desk-db unit tests.

pub(crate) mod helpers {
    use chrono::{Duration, TimeZone, Utc};
    use desk_core::entities::{Exam, Student};
    use desk_oracle::{StaticOracle, VerificationAdapter};
    use desk_seating::SeatLayout;

    use crate::DeskDb;
    use crate::queue::ViolationQueue;
    use crate::retry::RetryConfig;
    use crate::service::DeskService;

    pub const PROCTOR: &str = "proctor-1";

    /// In-memory service, single-attempt writes, queue disabled.
    pub async fn test_service() -> DeskService {
        let db = DeskDb::open_local(":memory:").await.unwrap();
        DeskService::from_db(db, RetryConfig::no_retry(), ViolationQueue::disabled())
    }

    /// In-memory service with the deferred queue in `queue_dir`.
    pub async fn test_service_with_queue(queue_dir: std::path::PathBuf) -> DeskService {
        let db = DeskDb::open_local(":memory:").await.unwrap();
        DeskService::from_db(db, RetryConfig::no_retry(), ViolationQueue::new(queue_dir).unwrap())
    }

    pub fn adapter(is_match: bool, score: f64) -> VerificationAdapter<StaticOracle> {
        VerificationAdapter::new(
            StaticOracle::new(is_match, score),
            std::time::Duration::from_secs(1),
        )
    }

    pub async fn create_test_exam(svc: &DeskService, code: &str, capacity: u32) -> Exam {
        let starts = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();
        svc.create_exam(code, "Test exam", starts, starts + Duration::hours(2), capacity)
            .await
            .unwrap()
    }

    pub async fn create_test_student(svc: &DeskService, number: &str, photo: Option<&str>) -> Student {
        svc.create_student(number, &format!("Student {number}"), photo)
            .await
            .unwrap()
    }

    /// Exam with a 2x2 plan (A1 A2 B1 B2) and `n` enrolled students, each
    /// with an enrolled photo. Returns the exam, plan id and students.
    pub async fn seeded_exam(svc: &DeskService, n: usize) -> (Exam, String, Vec<Student>) {
        let exam = create_test_exam(svc, "CS101", 10).await;
        let plan = svc
            .generate_seating_plan(&exam.id, &SeatLayout::Grid { rows: 2, cols: 2 }, "admin")
            .await
            .unwrap();
        let mut students = Vec::new();
        for i in 1..=n {
            let student = create_test_student(svc, &format!("S{i}"), Some(&format!("enrolled/s{i}.jpg"))).await;
            svc.add_to_roster(&exam.id, &student.id).await.unwrap();
            students.push(student);
        }
        (exam, plan.id, students)
    }
}
