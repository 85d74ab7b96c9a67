use clap::Subcommand;

/// Report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// Check-in and violation counts for an exam.
    Summary { exam: String },
}
