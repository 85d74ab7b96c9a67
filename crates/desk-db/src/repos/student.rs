//! Student repository.

use chrono::Utc;

use desk_core::entities::Student;
use desk_core::ids::PREFIX_STUDENT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, unique_or_db};
use crate::service::DeskService;

const SELECT_COLS: &str =
    "id, student_number, full_name, enrolled_photo_ref, created_at, updated_at";

fn row_to_student(row: &libsql::Row) -> Result<Student, DatabaseError> {
    Ok(Student {
        id: row.get(0)?,
        student_number: row.get(1)?,
        full_name: row.get(2)?,
        enrolled_photo_ref: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

fn clean_photo_ref(photo: Option<&str>) -> Option<String> {
    photo.map(str::trim).filter(|p| !p.is_empty()).map(String::from)
}

impl DeskService {
    /// # Errors
    ///
    /// `Validation` for a blank number or name; `UniqueViolation` when the
    /// student number is taken.
    pub async fn create_student(
        &self,
        student_number: &str,
        full_name: &str,
        enrolled_photo_ref: Option<&str>,
    ) -> Result<Student, DatabaseError> {
        let student_number = student_number.trim();
        let full_name = full_name.trim();
        if student_number.is_empty() || full_name.is_empty() {
            return Err(DatabaseError::Validation(
                "student number and full name are required".into(),
            ));
        }
        let photo = clean_photo_ref(enrolled_photo_ref);

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_STUDENT).await?;
        self.db()
            .execute(
                &format!("INSERT INTO students ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    id.as_str(),
                    student_number,
                    full_name,
                    photo.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| unique_or_db(e, || format!("student number {student_number}")))?;

        Ok(Student {
            id,
            student_number: student_number.to_string(),
            full_name: full_name.to_string(),
            enrolled_photo_ref: photo,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_student(&self, id: &str) -> Result<Student, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM students WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_student(&row)
    }

    pub async fn get_student_by_number(&self, student_number: &str) -> Result<Student, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM students WHERE student_number = ?1"),
                [student_number.trim()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_student(&row)
    }

    /// Replace (or clear, with `None`) the reference photo verification
    /// compares against.
    pub async fn set_enrolled_photo(
        &self,
        student_id: &str,
        photo_ref: Option<&str>,
    ) -> Result<Student, DatabaseError> {
        let photo = clean_photo_ref(photo_ref);
        let now = Utc::now();
        let changed = self
            .db()
            .execute(
                "UPDATE students SET enrolled_photo_ref = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![photo.as_deref(), now.to_rfc3339(), student_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_student(student_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{create_test_student, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_and_fetch_student() {
        let svc = test_service().await;
        let student = create_test_student(&svc, "N100", Some(" enrolled/n100.jpg ")).await;
        assert!(student.id.starts_with("stu-"));
        assert_eq!(student.enrolled_photo_ref.as_deref(), Some("enrolled/n100.jpg"));

        let fetched = svc.get_student_by_number("N100").await.unwrap();
        assert_eq!(fetched, svc.get_student(&student.id).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_number_is_unique_violation() {
        let svc = test_service().await;
        create_test_student(&svc, "N100", None).await;
        assert!(matches!(
            svc.create_student("N100", "Someone Else", None).await,
            Err(DatabaseError::UniqueViolation(_))
        ));
    }

    #[tokio::test]
    async fn set_and_clear_enrolled_photo() {
        let svc = test_service().await;
        let student = create_test_student(&svc, "N100", None).await;
        assert_eq!(student.enrolled_photo_ref, None);

        let updated = svc.set_enrolled_photo(&student.id, Some("ref.png")).await.unwrap();
        assert_eq!(updated.enrolled_photo_ref.as_deref(), Some("ref.png"));

        let cleared = svc.set_enrolled_photo(&student.id, Some("  ")).await.unwrap();
        assert_eq!(cleared.enrolled_photo_ref, None);

        assert!(matches!(
            svc.set_enrolled_photo("stu-missing", None).await,
            Err(DatabaseError::NoResult)
        ));
    }
}
