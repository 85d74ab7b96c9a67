use desk_core::entities::{CheckIn, Exam, RosterEntry, Seat, SeatOccupancy, SeatingPlan, Student, Violation};
use desk_core::responses::{CheckInResult, ExamSummary, ReplayResponse};
use desk_core::rules::ViolationDraft;
use desk_db::repos::seating::AssignmentReport;
use desk_seating::{SeatLayout, SeatRejection};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Names accepted by `examdesk schema`.
pub const SCHEMA_TYPES: &[&str] = &[
    "exam",
    "student",
    "roster-entry",
    "seating-plan",
    "seat",
    "seat-occupancy",
    "seat-layout",
    "seat-rejection",
    "assignment-report",
    "check-in",
    "check-in-result",
    "violation",
    "violation-draft",
    "exam-summary",
    "replay-response",
];

/// Handle `examdesk schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_by_name(&args.type_name)?, flags.format)
}

fn schema_by_name(name: &str) -> anyhow::Result<schemars::Schema> {
    let schema = match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "exam" => schema_for!(Exam),
        "student" => schema_for!(Student),
        "roster-entry" => schema_for!(RosterEntry),
        "seating-plan" => schema_for!(SeatingPlan),
        "seat" => schema_for!(Seat),
        "seat-occupancy" => schema_for!(SeatOccupancy),
        "seat-layout" => schema_for!(SeatLayout),
        "seat-rejection" => schema_for!(SeatRejection),
        "assignment-report" => schema_for!(AssignmentReport),
        "check-in" => schema_for!(CheckIn),
        "check-in-result" => schema_for!(CheckInResult),
        "violation" => schema_for!(Violation),
        "violation-draft" => schema_for!(ViolationDraft),
        "exam-summary" => schema_for!(ExamSummary),
        "replay-response" => schema_for!(ReplayResponse),
        _ => anyhow::bail!(
            "unknown schema type '{name}'; expected one of: {}",
            SCHEMA_TYPES.join(", ")
        ),
    };
    Ok(schema)
}
