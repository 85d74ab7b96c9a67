use clap::Subcommand;

/// Student registry commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StudentCommands {
    /// Register a student.
    Create {
        #[arg(long)]
        number: String,
        #[arg(long)]
        name: String,
        /// Enrolled reference photo
        #[arg(long)]
        photo: Option<String>,
    },
    /// Get a student by ID or student number.
    Get { id: String },
    /// Set or clear the enrolled photo.
    SetPhoto {
        id: String,
        /// Omit to clear
        #[arg(long)]
        photo: Option<String>,
    },
}
