use anyhow::Context;
use desk_core::entities::CheckIn;
use desk_core::enums::{DecisionStatus, VerificationOutcome};
use desk_db::repos::check_in::CheckInFilter;
use desk_db::workflow::{CheckInRequest, PhotoUpload};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CheckinCommands;
use crate::commands::exam::find_exam;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::commands::student::find_student;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CheckInListResponse {
    check_ins: Vec<CheckIn>,
}

/// Handle `examdesk checkin`.
pub async fn handle(action: &CheckinCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CheckinCommands::Perform {
            exam,
            student,
            photo,
            photo_size,
            content_type,
            seat,
            notes,
        } => {
            let exam = find_exam(ctx, exam).await?;
            let student = find_student(ctx, student).await?;
            let size_bytes = match photo_size {
                Some(size) => *size,
                None => std::fs::metadata(photo)
                    .with_context(|| format!("cannot stat '{photo}'; pass --photo-size"))?
                    .len(),
            };
            let request = CheckInRequest {
                exam_id: exam.id,
                student_id: student.id,
                claimed_seat: seat.clone(),
                photo: PhotoUpload::new(photo.as_str(), content_type.as_str(), size_bytes),
                notes: notes.clone(),
            };
            let result = ctx
                .service
                .perform_check_in(&ctx.verifier, &request, ctx.actor()?)
                .await?;
            output(&result, flags.format)
        }
        CheckinCommands::Override { id, notes } => {
            let check_in = ctx
                .service
                .override_check_in(id, notes.as_deref(), ctx.actor()?)
                .await?;
            output(&check_in, flags.format)
        }
        CheckinCommands::Get { id } => output(&ctx.service.get_check_in(id).await?, flags.format),
        CheckinCommands::List {
            exam,
            decision,
            outcome,
        } => {
            let exam_id = match exam {
                Some(exam) => Some(find_exam(ctx, exam).await?.id),
                None => None,
            };
            let filter = CheckInFilter {
                exam_id,
                decision_status: decision
                    .as_deref()
                    .map(|d| parse_enum::<DecisionStatus>(d, "decision"))
                    .transpose()?,
                verification_outcome: outcome
                    .as_deref()
                    .map(|o| parse_enum::<VerificationOutcome>(o, "outcome"))
                    .transpose()?,
                limit: Some(effective_limit(flags.limit, ctx.config.general.default_limit)),
            };
            let check_ins = ctx.service.list_check_ins(&filter).await?;
            output(&CheckInListResponse { check_ins }, flags.format)
        }
    }
}
