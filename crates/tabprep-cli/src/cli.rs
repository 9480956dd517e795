//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tabprep: prepare tabular data for modelling
#[derive(Parser)]
#[command(name = "tabprep")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormatChoice::Pretty)]
    pub log_format: LogFormatChoice,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the session API over HTTP
    Serve {
        /// Port for the web server (default from config, else 3141)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,
    },

    /// Show the shape, types and missing values of a CSV file
    Inspect {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a list of operations to a CSV file and export the result
    Run {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON array of operations, e.g. [{"op": "normalize"}]
        #[arg(long, value_name = "STEPS")]
        steps: PathBuf,

        /// Output path (default: contextual name next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Split a CSV file into train and test files
    Split {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target column, label-encoded and moved last
        #[arg(short, long)]
        target: String,

        /// Share of rows in the test file (default from config, else 0.3)
        #[arg(long)]
        test_size: Option<f64>,

        /// Directory for train_data.csv and test_data.csv
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

/// Log output format choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormatChoice {
    #[default]
    Pretty,
    Compact,
    Json,
}
