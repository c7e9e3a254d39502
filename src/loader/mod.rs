//! Folder-to-table loading
//!
//! Turns a folder of CSV files into one database table per file.
//!
//! # Policies
//!
//! - `drop-reload` - drop each table if present, then write it again
//! - `skip-existing` - leave tables that already exist untouched
//! - `overwrite` - write every table, replacing what is there

mod folder;
mod types;

pub use folder::{load_folder, FolderLoader};
pub use types::{LoadAction, LoadEvent, LoadReport, TableOutcome};

#[cfg(test)]
mod tests;
