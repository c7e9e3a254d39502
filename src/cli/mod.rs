//! CLI module
//!
//! Command-line interface for loading CSV folders.
//!
//! # Commands
//!
//! - `load` - Load every CSV file in a folder into its own table
//! - `plan` - Show file-to-table mapping without connecting
//! - `check` - Test connection to the target database
//! - `tables` - List tables in the target schema

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
