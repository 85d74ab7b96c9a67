use clap::Subcommand;

/// Roster commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RosterCommands {
    /// Enroll students in an exam.
    Add {
        exam: String,
        #[arg(required = true)]
        students: Vec<String>,
    },
    /// Remove a student from an exam.
    Remove { exam: String, student: String },
    /// List an exam's roster.
    List { exam: String },
}
