use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::LayoutKind;

/// The seat universe for one exam. Replaced wholesale on regeneration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SeatingPlan {
    pub id: String,
    pub exam_id: String,
    pub layout: LayoutKind,
    pub grid_rows: Option<u32>,
    pub grid_cols: Option<u32>,
    pub total_seats: u32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// One seat in a plan. `row` is zero-based (`A` = 0), `column` one-based.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Seat {
    pub plan_id: String,
    pub code: String,
    pub position: u32,
    pub row: Option<u32>,
    pub column: Option<u32>,
}

/// Admin-declared mapping of a student to a seat in a plan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SeatAssignment {
    pub id: String,
    pub plan_id: String,
    pub student_id: String,
    pub seat_code: String,
    pub assigned_by: String,
    pub created_at: DateTime<Utc>,
}

/// Derived occupancy of a seat, computed at read time from assignments and
/// check-ins. Never stored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SeatOccupancy {
    pub code: String,
    pub row: Option<u32>,
    pub column: Option<u32>,
    pub assigned_student_id: Option<String>,
    pub checked_in_student_id: Option<String>,
}
