//! Error types for the CSV table loader
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Every variant is fatal to the run: the loader has no retry or per-file
//! isolation, so callers simply propagate with `?`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for the loader
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Source directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("CSV parsing error in {}: {message}", path.display())]
    CsvParse { path: PathBuf, message: String },

    // ============================================================================
    // Database Errors
    // ============================================================================
    #[error("Failed to connect to {target}: {message}")]
    Connection { target: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a CSV parse error for a given file
    pub fn csv_parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::CsvParse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a connection error
    pub fn connection(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Whether the run failed before any table could have been touched
    ///
    /// Plain I/O errors only come from reading the config file or listing
    /// the source folder, both of which happen before connecting.
    pub fn is_pre_write(&self) -> bool {
        match self {
            Error::Context { source, .. } => source.is_pre_write(),
            Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. }
            | Error::YamlParse(_)
            | Error::DirectoryNotFound { .. }
            | Error::Connection { .. }
            | Error::Io(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for the loader
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Context {
            message: message.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}
