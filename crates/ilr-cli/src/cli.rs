//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ilr_core::NoVisaPolicy;

/// UK ILR residence day tracker.
///
/// Classifies every day of the tracked range from trip and visa records
/// and reports qualifying-day progress toward indefinite leave to remain.
#[derive(Debug, Parser)]
#[command(name = "ilr", version, about, long_about = None)]
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
    /// Create the data directory and starter data files.
    Init,

    /// Show progress toward the residence target.
    Status {
        /// Calculation date, DD-MM-YYYY (defaults to today).
        #[arg(long)]
        as_of: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// How days without visa coverage are counted.
        #[arg(long, value_enum)]
        no_visa_policy: Option<PolicyArg>,
    },

    /// Break down day classifications for a period.
    Report {
        /// Calendar year to report on.
        #[arg(long, conflicts_with = "month")]
        year: Option<i32>,

        /// Calendar month to report on, MM-YYYY.
        #[arg(long)]
        month: Option<String>,

        /// Calculation date for cumulative progress, DD-MM-YYYY (defaults to today).
        #[arg(long)]
        as_of: Option<String>,

        /// Count only days covered by this visa period (repeatable).
        #[arg(long = "visa", value_name = "ID")]
        visa: Vec<String>,

        /// List every day in the period.
        #[arg(long)]
        detailed: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// How days without visa coverage are counted.
        #[arg(long, value_enum)]
        no_visa_policy: Option<PolicyArg>,
    },

    /// Explain how a single date is classified.
    Day {
        /// The date to look up, DD-MM-YYYY.
        date: String,
    },

    /// List recorded trips.
    Trips {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List recorded visa periods.
    Visas {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// No-visa policy as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Days without visa coverage count as residence.
    Counted,
    /// Days without visa coverage never count.
    Excluded,
}

impl From<PolicyArg> for NoVisaPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Counted => Self::Counted,
            PolicyArg::Excluded => Self::Excluded,
        }
    }
}
