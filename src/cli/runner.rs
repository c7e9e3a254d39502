//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{LoaderConfig, PartialConfig};
use crate::database::DatabaseEngine;
use crate::error::Result;
use crate::loader::{load_folder, LoadEvent, LoadReport};
use crate::source::{discover_csv_files, find_collisions};
use crate::types::{LoadPolicy, TableCase};
use serde_json::{json, Value};
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Load {
                dir,
                policy,
                preserve_case,
            } => self.load(dir.as_deref(), *policy, *preserve_case),
            Commands::Plan { dir, preserve_case } => self.plan(dir.as_deref(), *preserve_case),
            Commands::Check => self.check(),
            Commands::Tables => self.tables(),
        }
    }

    /// Build configuration from file, environment and global flags
    fn layered_config(&self) -> Result<PartialConfig> {
        let file = match &self.cli.config {
            Some(path) => PartialConfig::from_file(path)?,
            None => PartialConfig::default(),
        };

        let flags = PartialConfig {
            database_url: self.cli.database_url.clone(),
            schema: self.cli.schema.clone(),
            ..PartialConfig::default()
        };

        Ok(file.merge(PartialConfig::from_env()).merge(flags))
    }

    /// Layered config plus per-command overrides
    fn command_config(
        &self,
        dir: Option<&Path>,
        policy: Option<LoadPolicy>,
        preserve_case: bool,
    ) -> Result<PartialConfig> {
        let overrides = PartialConfig {
            data_dir: dir.map(Path::to_path_buf),
            policy,
            table_case: preserve_case.then_some(TableCase::Preserve),
            ..PartialConfig::default()
        };
        Ok(self.layered_config()?.merge(overrides))
    }

    /// Load a folder into the target
    fn load(&self, dir: Option<&Path>, policy: Option<LoadPolicy>, preserve_case: bool) -> Result<()> {
        let config: LoaderConfig = self.command_config(dir, policy, preserve_case)?.resolve()?;

        tracing::info!(
            "Loading {} into {} with policy {}",
            config.data_dir.display(),
            config.database_url,
            config.policy
        );

        let report = load_folder(&config, &mut |event: &LoadEvent| self.render_event(event))?;
        self.render_summary(&config, &report);

        Ok(())
    }

    /// List files and the tables they map to
    fn plan(&self, dir: Option<&Path>, preserve_case: bool) -> Result<()> {
        let config = self.command_config(dir, None, preserve_case)?;
        let data_dir = config.data_dir();
        let case = config.table_case();

        let sources = discover_csv_files(&data_dir)?;
        let collisions = find_collisions(&sources, case);

        match self.cli.format {
            OutputFormat::Json => {
                let files: Vec<Value> = sources
                    .iter()
                    .map(|s| json!({ "file": s.file_name, "table": s.table_name(case) }))
                    .collect();
                self.output_message(&json!({
                    "type": "PLAN",
                    "data_dir": data_dir.display().to_string(),
                    "files": files,
                    "collisions": collisions,
                }));
            }
            OutputFormat::Pretty => {
                println!("{} CSV files in {}", sources.len(), data_dir.display());
                for source in &sources {
                    println!("  {} -> {}", source.file_name, source.table_name(case));
                }
                for (table, files) in &collisions {
                    println!(
                        "Warning: {} all load into '{}'; {} wins",
                        files.join(", "),
                        table,
                        files.last().map_or("", String::as_str)
                    );
                }
            }
        }

        Ok(())
    }

    /// Check the target connection
    fn check(&self) -> Result<()> {
        let config = self.layered_config()?.resolve()?;
        let engine = DatabaseEngine::connect(&config.database_url, config.schema.as_deref())?;
        engine.check_connection()?;
        let table_count = engine.list_tables()?.len();
        let schema = engine.schema().unwrap_or("default").to_string();
        let target = engine.connection_info();
        engine.close()?;

        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "CONNECTION_STATUS",
                "connectionStatus": {
                    "status": "SUCCEEDED",
                    "target": target,
                    "schema": schema,
                    "table_count": table_count,
                }
            })),
            OutputFormat::Pretty => println!(
                "Connection to {target} succeeded. Found {table_count} tables in schema {schema}."
            ),
        }

        Ok(())
    }

    /// List tables in the target schema
    fn tables(&self) -> Result<()> {
        let config = self.layered_config()?.resolve()?;
        let engine = DatabaseEngine::connect(&config.database_url, config.schema.as_deref())?;
        let tables = engine.list_tables()?;
        engine.close()?;

        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "TABLES",
                "tables": tables,
            })),
            OutputFormat::Pretty => {
                for table in &tables {
                    println!("{table}");
                }
            }
        }

        Ok(())
    }

    /// Print a loader event
    fn render_event(&self, event: &LoadEvent) {
        match self.cli.format {
            OutputFormat::Json => match serde_json::to_value(event) {
                Ok(value) => self.output_message(&value),
                Err(e) => tracing::warn!("Failed to serialize event: {e}"),
            },
            OutputFormat::Pretty => println!("{}", describe_event(event)),
        }
    }

    /// Print the end-of-run summary
    fn render_summary(&self, config: &LoaderConfig, report: &LoadReport) {
        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "SUMMARY",
                "data_dir": config.data_dir.display().to_string(),
                "policy": config.policy.to_string(),
                "uploaded": report.uploaded_count(),
                "skipped": report.skipped_count(),
                "dropped": report.dropped_count(),
                "total_rows": report.total_rows(),
                "duration_ms": report.duration_ms,
                "tables": report.outcomes,
            })),
            OutputFormat::Pretty => {
                println!();
                println!(
                    "Done: {} uploaded, {} already uploaded, {} dropped and reloaded ({} rows in {} ms)",
                    report.uploaded_count(),
                    report.skipped_count(),
                    report.dropped_count(),
                    report.total_rows(),
                    report.duration_ms
                );
            }
        }
    }

    /// Output a JSON message
    fn output_message(&self, msg: &Value) {
        println!("{}", serde_json::to_string(msg).unwrap_or_default());
    }
}

/// Human-readable line for an event
fn describe_event(event: &LoadEvent) -> String {
    match event {
        LoadEvent::Started {
            data_dir,
            file_count,
            policy,
        } => format!("Found {file_count} CSV files in {data_dir} (policy: {policy})"),
        LoadEvent::NameCollision {
            table,
            previous_file,
            file,
        } => format!("Warning: {file} replaces {previous_file} in table {table}"),
        LoadEvent::Dropped {
            table,
            existed: true,
        } => format!("Dropped old table: {table}"),
        LoadEvent::Dropped {
            table,
            existed: false,
        } => format!("No old table to drop: {table}"),
        LoadEvent::Uploading { file, table } => format!("Uploading {file} -> {table} table..."),
        LoadEvent::Uploaded {
            table, row_count, ..
        } => format!("Uploaded: {table} ({row_count} rows)"),
        LoadEvent::Skipped { file, table } => {
            format!("Skipped {file}: table {table} already uploaded")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_event() {
        assert_eq!(
            describe_event(&LoadEvent::Dropped {
                table: "sales".into(),
                existed: true
            }),
            "Dropped old table: sales"
        );
        assert_eq!(
            describe_event(&LoadEvent::Uploading {
                file: "Sales.csv".into(),
                table: "sales".into()
            }),
            "Uploading Sales.csv -> sales table..."
        );
        assert_eq!(
            describe_event(&LoadEvent::Uploaded {
                file: "Sales.csv".into(),
                table: "sales".into(),
                row_count: 12,
                columns: vec!["id".into()],
            }),
            "Uploaded: sales (12 rows)"
        );
        assert_eq!(
            describe_event(&LoadEvent::Skipped {
                file: "a.csv".into(),
                table: "a".into()
            }),
            "Skipped a.csv: table a already uploaded"
        );
    }

    #[test]
    fn test_event_json_shape() {
        let value = serde_json::to_value(LoadEvent::Uploaded {
            file: "a.csv".into(),
            table: "a".into(),
            row_count: 2,
            columns: vec!["x".into(), "y".into()],
        })
        .unwrap();

        assert_eq!(
            value,
            json!({
                "type": "UPLOADED",
                "file": "a.csv",
                "table": "a",
                "row_count": 2,
                "columns": ["x", "y"],
            })
        );
    }
}
