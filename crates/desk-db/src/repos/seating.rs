//! Seating repository: plan replacement, seat listing, occupancy and batch
//! seat assignment.

use std::collections::HashSet;

use chrono::Utc;
use schemars::JsonSchema;
use serde::Serialize;

use desk_core::entities::{Seat, SeatAssignment, SeatOccupancy, SeatingPlan};
use desk_core::ids::{PREFIX_ASSIGNMENT, PREFIX_PLAN};
use desk_core::rules::normalize_seat;
use desk_seating::{BatchValidator, SeatLayout, SeatRejection, generate};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_opt_u32, get_u32, parse_datetime, parse_enum, unique_or};
use crate::service::DeskService;

const PLAN_COLS: &str = "id, exam_id, layout, grid_rows, grid_cols, total_seats, created_by, created_at";
const SEAT_COLS: &str = "plan_id, seat_code, position, row_index, col_number";
const ASSIGNMENT_COLS: &str = "id, plan_id, student_id, seat_code, assigned_by, created_at";

fn row_to_plan(row: &libsql::Row) -> Result<SeatingPlan, DatabaseError> {
    Ok(SeatingPlan {
        id: row.get(0)?,
        exam_id: row.get(1)?,
        layout: parse_enum(&row.get::<String>(2)?)?,
        grid_rows: get_opt_u32(row, 3)?,
        grid_cols: get_opt_u32(row, 4)?,
        total_seats: get_u32(row, 5)?,
        created_by: row.get(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

fn row_to_seat(row: &libsql::Row) -> Result<Seat, DatabaseError> {
    Ok(Seat {
        plan_id: row.get(0)?,
        code: row.get(1)?,
        position: get_u32(row, 2)?,
        row: get_opt_u32(row, 3)?,
        column: get_opt_u32(row, 4)?,
    })
}

fn row_to_assignment(row: &libsql::Row) -> Result<SeatAssignment, DatabaseError> {
    Ok(SeatAssignment {
        id: row.get(0)?,
        plan_id: row.get(1)?,
        student_id: row.get(2)?,
        seat_code: row.get(3)?,
        assigned_by: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

/// A batch entry that was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct RejectedAssignment {
    pub student_id: String,
    pub seat_code: String,
    pub rejection: SeatRejection,
    pub message: String,
}

/// Outcome of [`DeskService::assign_seats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AssignmentReport {
    /// New or moved assignments written by this batch.
    pub applied: Vec<SeatAssignment>,
    /// Entries that re-targeted the seat the student already held.
    pub unchanged: Vec<SeatAssignment>,
    pub rejected: Vec<RejectedAssignment>,
}

impl DeskService {
    /// Build a plan from `layout` and replace the exam's current plan with
    /// it. The old plan's seats and assignments go with it, in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// `NoResult` for an unknown exam, `Validation` for an invalid layout.
    pub async fn generate_seating_plan(
        &self,
        exam_id: &str,
        layout: &SeatLayout,
        actor_id: &str,
    ) -> Result<SeatingPlan, DatabaseError> {
        self.get_exam(exam_id).await?;
        let seats = generate(layout).map_err(|e| DatabaseError::Validation(e.to_string()))?;
        let total_seats = u32::try_from(seats.len())
            .map_err(|_| DatabaseError::Validation("too many seats".into()))?;

        let now = Utc::now();
        let plan_id = self.db().generate_id(PREFIX_PLAN).await?;
        let (grid_rows, grid_cols) = layout.dimensions().unzip();

        let tx = self.db().transaction().await?;
        let replaced = tx
            .conn()
            .execute("DELETE FROM seating_plans WHERE exam_id = ?1", [exam_id])
            .await?;
        tx.conn()
            .execute(
                &format!("INSERT INTO seating_plans ({PLAN_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                libsql::params![
                    plan_id.as_str(),
                    exam_id,
                    layout.kind().as_str(),
                    grid_rows,
                    grid_cols,
                    total_seats,
                    actor_id,
                    now.to_rfc3339()
                ],
            )
            .await?;
        for (position, seat) in (0u32..).zip(&seats) {
            tx.conn()
                .execute(
                    &format!("INSERT INTO seats ({SEAT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                    libsql::params![
                        plan_id.as_str(),
                        seat.code.as_str(),
                        position,
                        seat.row,
                        seat.column
                    ],
                )
                .await?;
        }
        tx.commit().await?;

        tracing::info!(
            exam_id,
            plan_id = %plan_id,
            layout = %layout.kind(),
            total_seats,
            replaced_previous = replaced > 0,
            "seating plan generated"
        );
        Ok(SeatingPlan {
            id: plan_id,
            exam_id: exam_id.to_string(),
            layout: layout.kind(),
            grid_rows,
            grid_cols,
            total_seats,
            created_by: actor_id.to_string(),
            created_at: now,
        })
    }

    /// The exam's current plan, if one has been generated.
    pub async fn get_seating_plan(&self, exam_id: &str) -> Result<Option<SeatingPlan>, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                &format!("SELECT {PLAN_COLS} FROM seating_plans WHERE exam_id = ?1"),
                [exam_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_plan(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_seating_plan_by_id(&self, plan_id: &str) -> Result<SeatingPlan, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(&format!("SELECT {PLAN_COLS} FROM seating_plans WHERE id = ?1"), [plan_id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_plan(&row)
    }

    /// Seats in generation order.
    pub async fn list_seats(&self, plan_id: &str) -> Result<Vec<Seat>, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                &format!("SELECT {SEAT_COLS} FROM seats WHERE plan_id = ?1 ORDER BY position"),
                [plan_id],
            )
            .await?;

        let mut seats = Vec::new();
        while let Some(row) = rows.next().await? {
            seats.push(row_to_seat(&row)?);
        }
        Ok(seats)
    }

    pub async fn list_assignments(&self, plan_id: &str) -> Result<Vec<SeatAssignment>, DatabaseError> {
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                &format!(
                    "SELECT {ASSIGNMENT_COLS} FROM seat_assignments WHERE plan_id = ?1 ORDER BY created_at, seat_code"
                ),
                [plan_id],
            )
            .await?;

        let mut assignments = Vec::new();
        while let Some(row) = rows.next().await? {
            assignments.push(row_to_assignment(&row)?);
        }
        Ok(assignments)
    }

    /// Occupancy of every seat in the exam's plan, derived from assignments
    /// and check-ins at read time.
    ///
    /// # Errors
    ///
    /// `NoResult` when the exam has no seating plan.
    pub async fn seat_map(&self, exam_id: &str) -> Result<Vec<SeatOccupancy>, DatabaseError> {
        let plan = self
            .get_seating_plan(exam_id)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        let reader = self.db().reader().await;
        let mut rows = reader
            .conn()
            .query(
                "SELECT s.seat_code, s.row_index, s.col_number, a.student_id,
                        (SELECT c.student_id FROM check_ins c
                         WHERE c.exam_id = ?2 AND c.claimed_seat = s.seat_code
                         ORDER BY c.checked_in_at LIMIT 1)
                 FROM seats s
                 LEFT JOIN seat_assignments a ON a.plan_id = s.plan_id AND a.seat_code = s.seat_code
                 WHERE s.plan_id = ?1
                 ORDER BY s.position",
                libsql::params![plan.id.as_str(), exam_id],
            )
            .await?;

        let mut map = Vec::new();
        while let Some(row) = rows.next().await? {
            map.push(SeatOccupancy {
                code: row.get(0)?,
                row: get_opt_u32(&row, 1)?,
                column: get_opt_u32(&row, 2)?,
                assigned_student_id: get_opt_string(&row, 3)?,
                checked_in_student_id: get_opt_string(&row, 4)?,
            });
        }
        Ok(map)
    }

    /// Apply an ordered batch of `(student_id, seat_code)` assignments.
    ///
    /// Entries are validated left to right against the plan's seats and the
    /// seats already held, so the first claim on a seat wins. Accepted
    /// entries are written in one transaction; rejected entries are reported
    /// and leave no state.
    ///
    /// # Errors
    ///
    /// `NoResult` for an unknown plan; `UniqueViolation` if a concurrent
    /// writer took a seat between validation and write, in which case
    /// nothing from this batch is written.
    pub async fn assign_seats(
        &self,
        plan_id: &str,
        assignments: &[(String, String)],
        actor_id: &str,
    ) -> Result<AssignmentReport, DatabaseError> {
        let plan = self.get_seating_plan_by_id(plan_id).await?;
        let seats = self.list_seats(plan_id).await?;
        let existing = self.list_assignments(plan_id).await?;
        let roster: HashSet<String> = self
            .list_roster(&plan.exam_id)
            .await?
            .into_iter()
            .map(|entry| entry.student_id)
            .collect();

        let mut validator = BatchValidator::new(
            seats.into_iter().map(|s| s.code),
            existing
                .iter()
                .map(|a| (a.student_id.clone(), a.seat_code.clone())),
        );

        let mut report = AssignmentReport::default();
        let mut to_write = Vec::new();
        for (student_id, seat_code) in assignments {
            let student = student_id.trim();
            let admitted = if !student.is_empty() && !roster.contains(student) {
                Err(SeatRejection::NotOnRoster {
                    student_id: student.to_string(),
                })
            } else {
                validator.admit(student, seat_code)
            };

            match admitted {
                Ok(admission) if admission.is_unchanged() => {
                    if let Some(current) = existing.iter().find(|a| a.student_id == admission.student_id) {
                        report.unchanged.push(current.clone());
                    }
                }
                Ok(admission) => to_write.push(admission),
                Err(rejection) => {
                    tracing::info!(plan_id, student_id = student, seat_code = %seat_code, %rejection, "seat assignment rejected");
                    report.rejected.push(RejectedAssignment {
                        student_id: student.to_string(),
                        seat_code: normalize_seat(Some(seat_code.as_str())).unwrap_or_default(),
                        message: rejection.to_string(),
                        rejection,
                    });
                }
            }
        }

        if to_write.is_empty() {
            return Ok(report);
        }

        let now = Utc::now();
        let mut applied = Vec::with_capacity(to_write.len());
        for admission in &to_write {
            applied.push(SeatAssignment {
                id: self.db().generate_id(PREFIX_ASSIGNMENT).await?,
                plan_id: plan_id.to_string(),
                student_id: admission.student_id.clone(),
                seat_code: admission.seat_code.clone(),
                assigned_by: actor_id.to_string(),
                created_at: now,
            });
        }

        let tx = self.db().transaction().await?;
        for assignment in &applied {
            tx.conn()
                .execute(
                    "DELETE FROM seat_assignments WHERE plan_id = ?1 AND student_id = ?2",
                    libsql::params![plan_id, assignment.student_id.as_str()],
                )
                .await?;
            tx.conn()
                .execute(
                    &format!("INSERT INTO seat_assignments ({ASSIGNMENT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                    libsql::params![
                        assignment.id.as_str(),
                        plan_id,
                        assignment.student_id.as_str(),
                        assignment.seat_code.as_str(),
                        actor_id,
                        now.to_rfc3339()
                    ],
                )
                .await
                .map_err(|e| {
                    unique_or(e, || {
                        format!(
                            "seat {} or student {} was assigned concurrently",
                            assignment.seat_code, assignment.student_id
                        )
                    })
                })?;
        }
        tx.commit().await?;

        tracing::info!(
            plan_id,
            applied = applied.len(),
            unchanged = report.unchanged.len(),
            rejected = report.rejected.len(),
            "seat batch applied"
        );
        report.applied = applied;
        Ok(report)
    }
}
