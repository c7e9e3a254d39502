//! CSV source discovery and inspection
//!
//! Finds the `.csv` files in a folder, derives a table name for each one
//! and validates the file's structure before anything is written to the
//! target database.
//!
//! # Overview
//!
//! - `discover_csv_files` - Non-recursive listing of a folder, sorted by name
//! - `derive_table_name` - File stem, lower-cased unless case is preserved
//! - `inspect_csv` - Header row and data row count, with parse errors

mod discover;
mod inspect;

pub use discover::{derive_table_name, discover_csv_files, find_collisions, CsvSource};
pub use inspect::{inspect_csv, CsvSummary};
