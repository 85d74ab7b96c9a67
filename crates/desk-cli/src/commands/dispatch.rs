use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Exam { action } => commands::exam::handle(&action, ctx, flags).await,
        Commands::Student { action } => commands::student::handle(&action, ctx, flags).await,
        Commands::Roster { action } => commands::roster::handle(&action, ctx, flags).await,
        Commands::Seating { action } => commands::seating::handle(&action, ctx, flags).await,
        Commands::Checkin { action } => commands::checkin::handle(&action, ctx, flags).await,
        Commands::Violation { action } => commands::violation::handle(&action, ctx, flags).await,
        Commands::Report { action } => commands::report::handle(&action, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
