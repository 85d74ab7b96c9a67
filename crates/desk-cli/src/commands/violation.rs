use desk_core::entities::Violation;
use desk_core::enums::{Severity, ViolationCategory, ViolationStatus};
use desk_db::repos::violation::{NewViolation, ViolationFilter};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ViolationCommands;
use crate::commands::exam::find_exam;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::commands::student::find_student;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ViolationListResponse {
    violations: Vec<Violation>,
}

/// Handle `examdesk violation`.
pub async fn handle(action: &ViolationCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ViolationCommands::Record {
            exam,
            student,
            category,
            severity,
            description,
            evidence,
            check_in,
        } => {
            let new = NewViolation {
                exam_id: find_exam(ctx, exam).await?.id,
                student_id: find_student(ctx, student).await?.id,
                check_in_id: check_in.clone(),
                category: parse_enum::<ViolationCategory>(category, "category")?,
                severity: parse_enum::<Severity>(severity, "severity")?,
                description: description.clone(),
                evidence_ref: evidence.clone(),
            };
            let violation = ctx.service.record_violation(&new, ctx.actor()?).await?;
            output(&violation, flags.format)
        }
        ViolationCommands::Status { id, status, notes } => {
            let status = parse_enum::<ViolationStatus>(status, "status")?;
            let violation = ctx
                .service
                .set_violation_status(id, status, notes.as_deref(), ctx.actor()?)
                .await?;
            output(&violation, flags.format)
        }
        ViolationCommands::Get { id } => output(&ctx.service.get_violation(id).await?, flags.format),
        ViolationCommands::List {
            exam,
            student,
            category,
            severity,
            status,
        } => {
            let exam_id = match exam {
                Some(exam) => Some(find_exam(ctx, exam).await?.id),
                None => None,
            };
            let student_id = match student {
                Some(student) => Some(find_student(ctx, student).await?.id),
                None => None,
            };
            let filter = ViolationFilter {
                exam_id,
                student_id,
                category: category
                    .as_deref()
                    .map(|c| parse_enum::<ViolationCategory>(c, "category"))
                    .transpose()?,
                severity: severity
                    .as_deref()
                    .map(|s| parse_enum::<Severity>(s, "severity"))
                    .transpose()?,
                status: status
                    .as_deref()
                    .map(|s| parse_enum::<ViolationStatus>(s, "status"))
                    .transpose()?,
                limit: Some(effective_limit(flags.limit, ctx.config.general.default_limit)),
            };
            let violations = ctx.service.list_violations(&filter).await?;
            output(&ViolationListResponse { violations }, flags.format)
        }
        ViolationCommands::Replay => {
            if !ctx.service.queue().is_enabled() {
                tracing::warn!("violation queue is disabled; nothing to replay");
            }
            let response = ctx.service.replay_deferred_violations().await?;
            output(&response, flags.format)
        }
    }
}
