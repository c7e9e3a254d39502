//! Folder listing and table naming

use crate::error::{Error, Result, ResultExt};
use crate::types::TableCase;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix a file must carry to be picked up (case-sensitive)
const CSV_SUFFIX: &str = ".csv";

/// A CSV file found in the source folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvSource {
    /// Full path to the file
    pub path: PathBuf,
    /// File name including the extension
    pub file_name: String,
}

impl CsvSource {
    /// Table this file loads into
    pub fn table_name(&self, case: TableCase) -> String {
        derive_table_name(&self.file_name, case)
    }
}

/// List the `.csv` files directly inside `dir`
///
/// Subdirectories are not traversed. Files are returned sorted by file
/// name so that runs over the same folder process files in the same order.
pub fn discover_csv_files(dir: impl AsRef<Path>) -> Result<Vec<CsvSource>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut sources = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list source directory '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str().map(String::from) else {
            tracing::warn!("Skipping file with non UTF-8 name: {}", path.display());
            continue;
        };

        if file_name.ends_with(CSV_SUFFIX) {
            sources.push(CsvSource { path, file_name });
        }
    }

    sources.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    tracing::debug!("Found {} CSV files in {}", sources.len(), dir.display());

    Ok(sources)
}

/// Derive a table name from a file name by stripping its extension
pub fn derive_table_name(file_name: &str, case: TableCase) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map_or_else(|| file_name.to_string(), |s| s.to_string_lossy().into_owned());

    match case {
        TableCase::Lower => stem.to_lowercase(),
        TableCase::Preserve => stem,
    }
}

/// Table names claimed by more than one file, with the files in load order
///
/// The last file listed for a table is the one whose data survives a run.
pub fn find_collisions(sources: &[CsvSource], case: TableCase) -> BTreeMap<String, Vec<String>> {
    let mut by_table: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for source in sources {
        by_table
            .entry(source.table_name(case))
            .or_default()
            .push(source.file_name.clone());
    }
    by_table.retain(|_, files| files.len() > 1);
    by_table
}
