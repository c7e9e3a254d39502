//! csv-table-loader CLI
//!
//! Command-line interface for loading CSV folders into database tables

use clap::Parser;
use csv_table_loader::cli::{Cli, Runner};

fn main() {
    // A missing .env file is fine; DATABASE_URL may be set directly.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only progress output
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run() {
        eprintln!("Error: {e}");
        if !e.is_pre_write() {
            eprintln!("Run aborted; tables written before the failure, if any, were kept.");
        }
        std::process::exit(1);
    }
}
