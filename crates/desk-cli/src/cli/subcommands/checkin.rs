use clap::Subcommand;

/// Check-in commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CheckinCommands {
    /// Check a student in.
    Perform {
        #[arg(long)]
        exam: String,
        #[arg(long)]
        student: String,
        /// Captured photo reference
        #[arg(long)]
        photo: String,
        /// Photo size in bytes; read from the file when omitted
        #[arg(long)]
        photo_size: Option<u64>,
        #[arg(long, default_value = "image/jpeg")]
        content_type: String,
        /// Seat the student sat down in
        #[arg(long)]
        seat: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Override the machine decision on a check-in.
    Override {
        id: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Get a check-in by ID.
    Get { id: String },
    /// List check-ins.
    List {
        #[arg(long)]
        exam: Option<String>,
        #[arg(long)]
        decision: Option<String>,
        #[arg(long)]
        outcome: Option<String>,
    },
}
