//! Common types used throughout the loader
//!
//! Policies and target kinds shared by configuration, the CLI and the
//! folder loader.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Load Policy
// ============================================================================

/// What to do with a table that may already exist in the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LoadPolicy {
    /// Drop the table if it exists, then load it again
    #[default]
    DropReload,
    /// Leave existing tables untouched and report them as already uploaded
    SkipExisting,
    /// Always load, replacing any existing table without checking first
    Overwrite,
}

impl fmt::Display for LoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPolicy::DropReload => write!(f, "drop-reload"),
            LoadPolicy::SkipExisting => write!(f, "skip-existing"),
            LoadPolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

// ============================================================================
// Table Name Case
// ============================================================================

/// How table names are derived from file stems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableCase {
    /// Lower-case the file stem (`Sales.csv` -> `sales`)
    #[default]
    Lower,
    /// Use the file stem as-is (`Sales.csv` -> `Sales`)
    Preserve,
}

// ============================================================================
// Database Kind
// ============================================================================

/// Kind of target database, selected by the connection URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    Postgres,
    Mysql,
    Sqlite,
    Duckdb,
}

impl DatabaseKind {
    /// Schema tables land in when none is configured
    ///
    /// MySQL has no schema level below the database, so tables go to the
    /// attached catalog's default.
    pub fn default_schema(self) -> Option<&'static str> {
        match self {
            DatabaseKind::Postgres => Some("public"),
            DatabaseKind::Sqlite | DatabaseKind::Duckdb => Some("main"),
            DatabaseKind::Mysql => None,
        }
    }

    /// DuckDB extension that provides the attach type, if any
    pub fn extension(self) -> Option<&'static str> {
        match self {
            DatabaseKind::Postgres => Some("postgres"),
            DatabaseKind::Mysql => Some("mysql"),
            DatabaseKind::Sqlite => Some("sqlite"),
            DatabaseKind::Duckdb => None,
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::Postgres => write!(f, "postgres"),
            DatabaseKind::Mysql => write!(f, "mysql"),
            DatabaseKind::Sqlite => write!(f, "sqlite"),
            DatabaseKind::Duckdb => write!(f, "duckdb"),
        }
    }
}
