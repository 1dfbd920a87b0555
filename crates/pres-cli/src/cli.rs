//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Presentation scheduler.
///
/// Seats students into (date, period, room) slots, two per room per period,
/// keeping students that share a topic together.
#[derive(Debug, Parser)]
#[command(name = "pres", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate one or more schedules and write them as CSV.
    Generate(GenerateArgs),

    /// Show date frequencies and the slots a run would use.
    Calendar {
        /// Participants JSON file.
        #[arg(short, long)]
        participants: PathBuf,

        #[command(flatten)]
        schedule: ScheduleArgs,
    },

    /// Export one schedule from a saved set, optionally with edited placements.
    Export {
        /// Schedule set JSON, as written by `generate --json`.
        #[arg(long)]
        set: PathBuf,

        /// Schedule number to export (1-based).
        #[arg(long, default_value_t = 1)]
        schedule: usize,

        /// Replacement placement list (JSON array) for that schedule.
        #[arg(long)]
        placements: Option<PathBuf>,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Participants JSON file.
    #[arg(short, long)]
    pub participants: PathBuf,

    #[command(flatten)]
    pub schedule: ScheduleArgs,

    /// Room-to-topics JSON map applied to every schedule.
    #[arg(long, conflicts_with = "interactive")]
    pub manual: Option<PathBuf>,

    /// Ask on stdin how each schedule's rooms get their topics.
    #[arg(long)]
    pub interactive: bool,

    /// Directory for `schedule-<n>.csv` files.
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Print the whole schedule set as JSON instead of writing CSV files.
    #[arg(long)]
    pub json: bool,
}

/// Scheduling settings that override the config file.
#[derive(Debug, Default, Args)]
pub struct ScheduleArgs {
    /// Rooms in preference order (e.g., "101,102").
    #[arg(long, value_delimiter = ',')]
    pub rooms: Vec<String>,

    /// Periods as a range ("2-6") or a list ("2,3,4").
    #[arg(long)]
    pub periods: Option<String>,

    /// Number of presentation days to select.
    #[arg(long)]
    pub days: Option<u32>,

    /// Number of schedules to generate.
    #[arg(long)]
    pub schedules: Option<u32>,

    /// Percentage of students that must share a date for it to be preferred.
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Shuffle topics before assigning them to rooms.
    #[arg(long)]
    pub shuffle: bool,

    /// Seed for topic shuffling (implies --shuffle).
    #[arg(long)]
    pub seed: Option<u64>,
}
