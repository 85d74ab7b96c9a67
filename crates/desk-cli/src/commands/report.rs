use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReportCommands;
use crate::commands::exam::find_exam;
use crate::context::AppContext;
use crate::output::output;

/// Handle `examdesk report`.
pub async fn handle(action: &ReportCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ReportCommands::Summary { exam } => {
            let exam = find_exam(ctx, exam).await?;
            output(&ctx.service.exam_summary(&exam.id).await?, flags.format)
        }
    }
}
