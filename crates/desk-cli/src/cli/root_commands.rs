use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    CheckinCommands, ExamCommands, ReportCommands, RosterCommands, SeatingCommands, StudentCommands,
    ViolationCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Exam registry.
    Exam {
        #[command(subcommand)]
        action: ExamCommands,
    },
    /// Student registry.
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },
    /// Exam rosters.
    Roster {
        #[command(subcommand)]
        action: RosterCommands,
    },
    /// Seating plans and seat assignments.
    Seating {
        #[command(subcommand)]
        action: SeatingCommands,
    },
    /// Student check-in at the desk.
    Checkin {
        #[command(subcommand)]
        action: CheckinCommands,
    },
    /// Integrity violations.
    Violation {
        #[command(subcommand)]
        action: ViolationCommands,
    },
    /// Exam reports.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Print the JSON schema of an output type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name, e.g. check-in-result
    pub type_name: String,
}
