use desk_core::entities::{SeatOccupancy, SeatingPlan};
use desk_seating::SeatLayout;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SeatingCommands;
use crate::commands::exam::find_exam;
use crate::commands::shared::parse::parse_assignment;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SeatingResponse {
    plan: Option<SeatingPlan>,
    seats: Vec<SeatOccupancy>,
}

/// Handle `examdesk seating`.
pub async fn handle(action: &SeatingCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        SeatingCommands::Generate {
            exam,
            rows,
            cols,
            codes,
        } => {
            let layout = layout_from_args(*rows, *cols, codes)?;
            let exam = find_exam(ctx, exam).await?;
            let plan = ctx
                .service
                .generate_seating_plan(&exam.id, &layout, ctx.actor()?)
                .await?;
            let seats = ctx.service.seat_map(&exam.id).await?;
            output(
                &SeatingResponse {
                    plan: Some(plan),
                    seats,
                },
                flags.format,
            )
        }
        SeatingCommands::Show { exam } => {
            let exam = find_exam(ctx, exam).await?;
            let plan = ctx.service.get_seating_plan(&exam.id).await?;
            let seats = ctx.service.seat_map(&exam.id).await?;
            output(&SeatingResponse { plan, seats }, flags.format)
        }
        SeatingCommands::Assign { exam, assignments } => {
            let exam = find_exam(ctx, exam).await?;
            let plan = ctx
                .service
                .get_seating_plan(&exam.id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("exam {} has no seating plan", exam.code))?;
            let batch = assignments
                .iter()
                .map(|raw| parse_assignment(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let report = ctx
                .service
                .assign_seats(&plan.id, &batch, ctx.actor()?)
                .await?;
            output(&report, flags.format)
        }
    }
}

fn layout_from_args(rows: Option<u32>, cols: Option<u32>, codes: &[String]) -> anyhow::Result<SeatLayout> {
    match (rows, cols) {
        (Some(rows), Some(cols)) => Ok(SeatLayout::Grid { rows, cols }),
        _ if !codes.is_empty() => Ok(SeatLayout::Explicit {
            codes: codes.to_vec(),
        }),
        _ => anyhow::bail!("give either --rows and --cols or --codes"),
    }
}
