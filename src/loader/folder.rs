//! Folder-to-table loader
//!
//! One straight pass over the CSV files of a folder. Each file is
//! validated, then written to its table according to the [`LoadPolicy`].
//! The first error ends the run; tables written before it stay in place.

use super::types::{LoadAction, LoadEvent, LoadReport, TableOutcome};
use crate::config::LoaderConfig;
use crate::database::DatabaseEngine;
use crate::error::{Error, Result};
use crate::source::{discover_csv_files, inspect_csv, CsvSource};
use crate::types::{LoadPolicy, TableCase};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Loads CSV sources into an attached target database
pub struct FolderLoader<'a> {
    engine: &'a DatabaseEngine,
    policy: LoadPolicy,
    table_case: TableCase,
}

impl<'a> FolderLoader<'a> {
    /// Create a loader writing through `engine`
    pub fn new(engine: &'a DatabaseEngine, policy: LoadPolicy, table_case: TableCase) -> Self {
        Self {
            engine,
            policy,
            table_case,
        }
    }

    /// Load every source in order, reporting progress through `on_event`
    pub fn run(
        &self,
        sources: &[CsvSource],
        on_event: &mut dyn FnMut(&LoadEvent),
    ) -> Result<LoadReport> {
        let start = Instant::now();

        // Only the skip policy needs to know what is already there.
        let mut existing: HashSet<String> = match self.policy {
            LoadPolicy::SkipExisting => self.engine.list_tables()?.into_iter().collect(),
            LoadPolicy::DropReload | LoadPolicy::Overwrite => HashSet::new(),
        };
        let mut claimed: HashMap<String, String> = HashMap::new();
        let mut outcomes = Vec::with_capacity(sources.len());

        for source in sources {
            let table = source.table_name(self.table_case);

            if let Some(previous_file) = claimed.insert(table.clone(), source.file_name.clone()) {
                tracing::warn!(
                    "{} and {} both map to table '{}'; {} wins",
                    previous_file,
                    source.file_name,
                    table,
                    source.file_name
                );
                on_event(&LoadEvent::NameCollision {
                    table: table.clone(),
                    previous_file,
                    file: source.file_name.clone(),
                });
            }

            if self.policy == LoadPolicy::SkipExisting && existing.contains(&table) {
                tracing::info!("Skipping {}: table '{}' already uploaded", source.file_name, table);
                on_event(&LoadEvent::Skipped {
                    file: source.file_name.clone(),
                    table: table.clone(),
                });
                outcomes.push(TableOutcome {
                    file: source.file_name.clone(),
                    table,
                    action: LoadAction::Skipped,
                    dropped: false,
                    row_count: 0,
                });
                continue;
            }

            // Parse and stage before touching the target so a bad file never
            // costs a table.
            let summary = inspect_csv(&source.path)?;
            let staged = self.engine.stage_csv(&source.path, &summary)?;
            if staged.row_count != summary.row_count {
                return Err(Error::database(format!(
                    "{}: parsed {} data rows but DuckDB read {}",
                    source.file_name, summary.row_count, staged.row_count
                )));
            }

            let dropped = if self.policy == LoadPolicy::DropReload {
                let existed = self.engine.drop_table(&table)?;
                on_event(&LoadEvent::Dropped {
                    table: table.clone(),
                    existed,
                });
                existed
            } else {
                false
            };

            on_event(&LoadEvent::Uploading {
                file: source.file_name.clone(),
                table: table.clone(),
            });

            let loaded = self.engine.write_staged(&table, staged)?;
            tracing::info!(
                "Uploaded {} -> {} ({} rows)",
                source.file_name,
                table,
                loaded.row_count
            );

            on_event(&LoadEvent::Uploaded {
                file: source.file_name.clone(),
                table: table.clone(),
                row_count: loaded.row_count,
                columns: loaded.columns,
            });

            existing.insert(table.clone());
            outcomes.push(TableOutcome {
                file: source.file_name.clone(),
                table,
                action: LoadAction::Uploaded,
                dropped,
                row_count: loaded.row_count,
            });
        }

        Ok(LoadReport {
            outcomes,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Load a folder end to end: discover files, connect, load, disconnect
///
/// The folder is listed before the connection is opened, so a missing
/// folder fails without touching the database.
pub fn load_folder(
    config: &LoaderConfig,
    on_event: &mut dyn FnMut(&LoadEvent),
) -> Result<LoadReport> {
    let sources = discover_csv_files(&config.data_dir)?;

    let engine = DatabaseEngine::connect(&config.database_url, config.schema.as_deref())?;

    on_event(&LoadEvent::Started {
        data_dir: config.data_dir.display().to_string(),
        file_count: sources.len(),
        policy: config.policy.to_string(),
    });

    let report = FolderLoader::new(&engine, config.policy, config.table_case)
        .run(&sources, on_event)?;

    engine.close()?;
    Ok(report)
}
