//! CLI commands and argument parsing

use crate::types::LoadPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Load a folder of CSV files into database tables
#[derive(Parser, Debug)]
#[command(name = "csv-table-loader")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Target database URL (overrides DATABASE_URL)
    #[arg(short, long, global = true)]
    pub database_url: Option<String>,

    /// Target schema (defaults to public for PostgreSQL, main for SQLite/DuckDB)
    #[arg(short, long, global = true)]
    pub schema: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load every CSV file in a folder into its own table
    Load {
        /// Folder containing the CSV files (overrides CSV_LOADER_DATA_DIR)
        dir: Option<PathBuf>,

        /// What to do with tables that already exist
        #[arg(short, long)]
        policy: Option<LoadPolicy>,

        /// Keep the file name's case instead of lower-casing table names
        #[arg(long)]
        preserve_case: bool,
    },

    /// Show which table each file would load into, without connecting
    Plan {
        /// Folder containing the CSV files (overrides CSV_LOADER_DATA_DIR)
        dir: Option<PathBuf>,

        /// Keep the file name's case instead of lower-casing table names
        #[arg(long)]
        preserve_case: bool,
    },

    /// Test the connection to the target database
    Check,

    /// List tables in the target schema
    Tables,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable progress lines
    Pretty,
    /// JSON output (one message per line)
    Json,
}
