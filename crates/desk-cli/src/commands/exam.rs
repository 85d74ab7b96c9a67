use desk_core::entities::Exam;
use desk_core::enums::ExamStatus;
use desk_db::error::DatabaseError;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ExamCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_timestamp};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ExamListResponse {
    exams: Vec<Exam>,
}

/// Handle `examdesk exam`.
pub async fn handle(action: &ExamCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ExamCommands::Create {
            code,
            title,
            starts_at,
            ends_at,
            capacity,
        } => {
            let starts_at = parse_timestamp(starts_at, "starts_at")?;
            let ends_at = parse_timestamp(ends_at, "ends_at")?;
            let exam = ctx
                .service
                .create_exam(code, title, starts_at, ends_at, *capacity)
                .await?;
            output(&exam, flags.format)
        }
        ExamCommands::Get { id } => output(&find_exam(ctx, id).await?, flags.format),
        ExamCommands::List => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            let exams = ctx.service.list_exams(limit).await?;
            output(&ExamListResponse { exams }, flags.format)
        }
        ExamCommands::Transition { id, status } => {
            let status = parse_enum::<ExamStatus>(status, "status")?;
            let exam = find_exam(ctx, id).await?;
            let exam = ctx.service.transition_exam(&exam.id, status).await?;
            output(&exam, flags.format)
        }
    }
}

/// Look an exam up by ID, then by code.
pub async fn find_exam(ctx: &AppContext, id_or_code: &str) -> anyhow::Result<Exam> {
    match ctx.service.get_exam(id_or_code).await {
        Ok(exam) => Ok(exam),
        Err(DatabaseError::NoResult) => match ctx.service.get_exam_by_code(id_or_code).await {
            Ok(exam) => Ok(exam),
            Err(DatabaseError::NoResult) => anyhow::bail!("exam '{id_or_code}' not found"),
            Err(error) => Err(error.into()),
        },
        Err(error) => Err(error.into()),
    }
}
