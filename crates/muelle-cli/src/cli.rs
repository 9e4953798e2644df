//! CLI definition using clap

use clap::{Parser, Subcommand};
use muelle_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "muelles")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Loading dock assignment board with departure alerts")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Snapshot directory. Uses config value if not specified.
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a dock sheet (xlsx, xls, ods, csv), a JSON/HTML payload, or a directory of them
    Import {
        /// File or directory to read, `-` for stdin
        input: String,
    },

    /// Show every dock with its current status
    Board {
        /// Filter by company name (case-insensitive substring)
        #[arg(long)]
        company: Option<String>,

        /// Only docks in warning or late state
        #[arg(long)]
        alerts_only: bool,
    },

    /// Exchange the trucks on two docks
    Swap {
        /// Dock to move from
        #[arg(allow_negative_numbers = true)]
        from: i64,

        /// Dock to move to
        #[arg(allow_negative_numbers = true)]
        to: i64,
    },

    /// Record a truck on a dock by hand
    Assign {
        /// Dock number
        #[arg(allow_negative_numbers = true)]
        dock: i64,

        /// Display label; derived from company, dock and departure if omitted
        #[arg(long)]
        id: Option<String>,

        /// Transport company
        #[arg(long, short = 'c')]
        company: Option<String>,

        /// Cargo description
        #[arg(long)]
        cargo: Option<String>,

        /// Vehicle plate (e.g., "1234 ABC")
        #[arg(long, short = 'p')]
        plate: Option<String>,

        /// Security seal code
        #[arg(long, short = 's')]
        seal: Option<String>,

        /// Arrival time today (HH:MM)
        #[arg(long)]
        arrival: Option<String>,

        /// Departure deadline today (HH:MM)
        #[arg(long, short = 'd')]
        departure: Option<String>,

        /// Free text notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Empty a dock
    Release {
        /// Dock number
        #[arg(allow_negative_numbers = true)]
        dock: i64,
    },

    /// Empty every dock
    Clear,

    /// Poll the board and print departure alerts
    Watch {
        /// Seconds between polls. Uses config value if not specified.
        #[arg(long, short = 'i')]
        interval: Option<u64>,

        /// Stop after this many polls
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Export the board to Excel
    Export {
        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Filter by company name
        #[arg(long)]
        company: Option<String>,

        /// Only docks in warning or late state
        #[arg(long)]
        alerts_only: bool,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set snapshot directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set seconds between alert polls
        #[arg(long)]
        set_poll_interval: Option<u64>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_swap() {
        let cli = Cli::try_parse_from(["muelles", "swap", "320", "331"]).unwrap();
        assert!(matches!(cli.command, Commands::Swap { from: 320, to: 331 }));
    }

    #[test]
    fn test_parse_assign_with_global_flags() {
        let cli = Cli::try_parse_from([
            "muelles", "assign", "340", "-c", "Acme", "-d", "14:30", "-f", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Assign {
                dock,
                company,
                departure,
                ..
            } => {
                assert_eq!(dock, 340);
                assert_eq!(company.as_deref(), Some("Acme"));
                assert_eq!(departure.as_deref(), Some("14:30"));
            }
            _ => panic!("expected assign"),
        }
    }

    #[test]
    fn test_parse_import_stdin() {
        let cli = Cli::try_parse_from(["muelles", "import", "-"]).unwrap();
        assert!(matches!(cli.command, Commands::Import { ref input } if input == "-"));
    }

    #[test]
    fn test_parse_board_filters() {
        let cli = Cli::try_parse_from(["muelles", "board", "--company", "acme", "--alerts-only"])
            .unwrap();
        match cli.command {
            Commands::Board {
                company,
                alerts_only,
            } => {
                assert_eq!(company.as_deref(), Some("acme"));
                assert!(alerts_only);
            }
            _ => panic!("expected board"),
        }
    }
}
