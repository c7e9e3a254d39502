//! # csv-table-loader
//!
//! Loads a folder of CSV files into a relational database, one table per
//! file.
//!
//! ## Features
//!
//! - **Any SQL target**: PostgreSQL, MySQL, SQLite or DuckDB, attached through DuckDB
//! - **Three policies**: drop and reload, skip tables already uploaded, or overwrite
//! - **Fail fast**: every CSV is validated before its table is touched
//! - **Layered config**: YAML file, `DATABASE_URL` / `.env`, CLI flags
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csv_table_loader::{load_folder, DatabaseUrl, LoaderConfig, LoadPolicy, Result};
//!
//! fn main() -> Result<()> {
//!     let url = DatabaseUrl::parse(&std::env::var("DATABASE_URL").unwrap())?;
//!     let config = LoaderConfig::new(url, "./cleaned_data")
//!         .with_policy(LoadPolicy::SkipExisting);
//!
//!     let report = load_folder(&config, &mut |event| println!("{event:?}"))?;
//!     println!("{} tables uploaded", report.uploaded_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌───────────────────────────┐
//! │    source    │──▶│     loader     │──▶│         database          │
//! │ list + parse │   │ policy per file│   │ DuckDB + ATTACH target_db │
//! └──────────────┘   └────────────────┘   └───────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the loader
pub mod error;

/// Common types and type aliases
pub mod types;

/// Layered configuration
pub mod config;

/// CSV discovery and validation
pub mod source;

/// DuckDB-backed database target
pub mod database;

/// Folder-to-table loading
pub mod loader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{LoaderConfig, PartialConfig};
pub use database::{DatabaseEngine, DatabaseUrl};
pub use loader::{load_folder, FolderLoader, LoadEvent, LoadReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
