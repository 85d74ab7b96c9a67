use clap::Subcommand;

/// Exam registry commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ExamCommands {
    /// Create an exam in draft.
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        title: String,
        /// RFC 3339 start time
        #[arg(long)]
        starts_at: String,
        /// RFC 3339 end time
        #[arg(long)]
        ends_at: String,
        #[arg(long)]
        capacity: u32,
    },
    /// Get an exam by ID or code.
    Get { id: String },
    /// List exams.
    List,
    /// Move an exam to a new status.
    Transition { id: String, status: String },
}
