use clap::Subcommand;

/// Seating commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SeatingCommands {
    /// Generate and install a new seating plan, replacing the current one.
    Generate {
        exam: String,
        #[arg(long, requires = "cols", conflicts_with = "codes")]
        rows: Option<u32>,
        #[arg(long, requires = "rows")]
        cols: Option<u32>,
        /// Explicit seat codes, comma-separated
        #[arg(long, value_delimiter = ',')]
        codes: Vec<String>,
    },
    /// Show an exam's plan and seat occupancy.
    Show { exam: String },
    /// Assign seats in order: STUDENT=SEAT ...
    Assign {
        exam: String,
        #[arg(required = true)]
        assignments: Vec<String>,
    },
}
