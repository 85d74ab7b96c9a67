use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `examdesk` binary.
#[derive(Debug, Parser)]
#[command(name = "examdesk", version, about = "Exam check-in desk")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Actor id recorded on changes (defaults to general.actor)
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Database path (overrides database.path)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            actor: self.actor.clone(),
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::{CheckinCommands, SeatingCommands, ViolationCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_and_after_subcommand() {
        let cli = Cli::try_parse_from([
            "examdesk", "--format", "raw", "--actor", "proctor-7", "report", "summary", "exm-1", "--db",
            ":memory:",
        ])
        .expect("cli should parse");

        let flags = cli.global_flags();
        assert_eq!(flags.format, OutputFormat::Raw);
        assert_eq!(flags.actor.as_deref(), Some("proctor-7"));
        assert_eq!(flags.db.as_deref(), Some(":memory:"));
    }

    #[test]
    fn output_format_rejects_table() {
        assert!(Cli::try_parse_from(["examdesk", "--format", "table", "exam", "list"]).is_err());
    }

    #[test]
    fn checkin_perform_parses_photo_and_seat() {
        let cli = Cli::try_parse_from([
            "examdesk", "checkin", "perform", "--exam", "exm-1", "--student", "stu-1", "--photo",
            "captures/x.jpg", "--photo-size", "2048", "--seat", "b1",
        ])
        .expect("cli should parse");

        let Commands::Checkin {
            action:
                CheckinCommands::Perform {
                    seat, photo_size, content_type, ..
                },
        } = cli.command
        else {
            panic!("expected checkin perform");
        };
        assert_eq!(seat.as_deref(), Some("b1"));
        assert_eq!(photo_size, Some(2048));
        assert_eq!(content_type, "image/jpeg");
    }

    #[test]
    fn seating_generate_accepts_explicit_codes() {
        let cli = Cli::try_parse_from(["examdesk", "seating", "generate", "exm-1", "--codes", "A1,a1,B2"])
            .expect("cli should parse");
        let Commands::Seating {
            action: SeatingCommands::Generate { codes, rows, .. },
        } = cli.command
        else {
            panic!("expected seating generate");
        };
        assert_eq!(codes, ["A1", "a1", "B2"]);
        assert_eq!(rows, None);
    }

    #[test]
    fn seating_generate_rejects_grid_and_codes_together() {
        let parsed = Cli::try_parse_from([
            "examdesk", "seating", "generate", "exm-1", "--rows", "2", "--cols", "2", "--codes", "A1",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn violation_status_takes_positional_status() {
        let cli = Cli::try_parse_from(["examdesk", "violation", "status", "vio-1", "resolved", "--notes", "ok"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Violation {
                action: ViolationCommands::Status { .. }
            }
        ));
    }
}
