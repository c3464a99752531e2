//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use ga_core::Tier;

/// Play-history awards for a game library.
///
/// Computes ranked award nominations (week, month, quarter, year) from a
/// JSON library of games and their dated play logs.
#[derive(Debug, Parser)]
#[command(name = "ga", version, about, long_about = None)]
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
    /// Build award nominations for a reference date.
    Awards {
        /// Reference date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Path to the library JSON file (overrides config).
        #[arg(long)]
        library: Option<PathBuf>,

        /// Show a single tier instead of all four.
        #[arg(long, value_enum)]
        tier: Option<TierArg>,

        /// Emit JSON instead of the human-readable report.
        #[arg(long)]
        json: bool,

        /// Ask Claude to pick winners for deferred categories.
        #[arg(long)]
        pick: bool,
    },

    /// List the fixed award category catalog.
    Catalog {
        /// Show a single tier instead of all four.
        #[arg(long, value_enum)]
        tier: Option<TierArg>,
    },
}

/// Tier selector for the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Week,
    Month,
    Quarter,
    Year,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Week => Self::Week,
            TierArg::Month => Self::Month,
            TierArg::Quarter => Self::Quarter,
            TierArg::Year => Self::Year,
        }
    }
}
