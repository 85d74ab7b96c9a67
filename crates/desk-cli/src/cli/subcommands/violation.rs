use clap::Subcommand;

/// Violation commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ViolationCommands {
    /// Record a violation observed by a proctor.
    Record {
        #[arg(long)]
        exam: String,
        #[arg(long)]
        student: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "medium")]
        severity: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        evidence: Option<String>,
        #[arg(long)]
        check_in: Option<String>,
    },
    /// Move a violation to a new status.
    Status {
        id: String,
        status: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Get a violation by ID.
    Get { id: String },
    /// List violations.
    List {
        #[arg(long)]
        exam: Option<String>,
        #[arg(long)]
        student: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        severity: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Retry violations queued after failed writes.
    Replay,
}
