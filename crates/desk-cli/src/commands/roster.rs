use desk_core::entities::RosterEntry;
use serde::Serialize;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RosterCommands;
use crate::commands::exam::find_exam;
use crate::commands::student::find_student;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RosterResponse {
    exam_id: String,
    entries: Vec<RosterEntry>,
}

/// Handle `examdesk roster`.
pub async fn handle(action: &RosterCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        RosterCommands::Add { exam, students } => {
            let exam = find_exam(ctx, exam).await?;
            let mut entries = Vec::with_capacity(students.len());
            for student in students {
                let student = find_student(ctx, student).await?;
                let entry = ctx
                    .service
                    .add_to_roster(&exam.id, &student.id)
                    .await
                    .map_err(|error| {
                        anyhow::anyhow!(
                            "failed to enroll '{}'; enrolled before failure: {}: {error}",
                            student.student_number,
                            entries.len()
                        )
                    })?;
                entries.push(entry);
            }
            output(
                &RosterResponse {
                    exam_id: exam.id,
                    entries,
                },
                flags.format,
            )
        }
        RosterCommands::Remove { exam, student } => {
            let exam = find_exam(ctx, exam).await?;
            let student = find_student(ctx, student).await?;
            ctx.service.remove_from_roster(&exam.id, &student.id).await?;
            output(
                &json!({ "exam_id": exam.id, "student_id": student.id, "removed": true }),
                flags.format,
            )
        }
        RosterCommands::List { exam } => {
            let exam = find_exam(ctx, exam).await?;
            let entries = ctx.service.list_roster(&exam.id).await?;
            output(
                &RosterResponse {
                    exam_id: exam.id,
                    entries,
                },
                flags.format,
            )
        }
    }
}
