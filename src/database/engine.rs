//! DuckDB-based write engine
//!
//! Opens an in-memory DuckDB connection and attaches the target database
//! read-write under [`TARGET_ALIAS`]. CSV files are staged into a local
//! temporary table first, then copied into the target with
//! `CREATE TABLE ... AS SELECT`.

use super::connection::DatabaseUrl;
use super::sql::{quote_ident, quote_literal};
use crate::error::{Error, Result};
use crate::source::CsvSummary;
use crate::types::DatabaseKind;
use duckdb::{params, Connection};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Catalog name the target database is attached under
pub const TARGET_ALIAS: &str = "target_db";

/// Local temporary table each CSV is read into before the write
const STAGE_TABLE: &str = "csv_stage";

/// Database write engine using DuckDB
pub struct DatabaseEngine {
    /// DuckDB connection
    conn: Connection,
    /// Target connection URL
    url: DatabaseUrl,
    /// Schema tables are written to, if the target has one
    schema: Option<String>,
}

/// A CSV file read into the staging table, not yet written to the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCsv {
    /// Number of rows staged
    pub row_count: usize,
    /// Column names in file order
    pub columns: Vec<String>,
}

/// Result of writing one CSV file to the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedTable {
    /// Table name in the target
    pub table: String,
    /// Number of rows written
    pub row_count: usize,
    /// Column names in table order
    pub columns: Vec<String>,
}

impl DatabaseEngine {
    /// Connect to the target database
    ///
    /// `schema` overrides the kind's default schema and is created if it
    /// does not exist yet.
    pub fn connect(url: &DatabaseUrl, schema: Option<&str>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            Error::connection(url.masked(), format!("Failed to create DuckDB connection: {e}"))
        })?;

        let engine = Self {
            conn,
            url: url.clone(),
            schema: schema
                .map(String::from)
                .or_else(|| url.kind().default_schema().map(String::from)),
        };

        engine.attach_database()?;
        if schema.is_some() {
            engine.ensure_schema()?;
        }

        tracing::info!("Connected to {} target {}", url.kind(), engine.connection_info());
        Ok(engine)
    }

    /// Attach the target database to DuckDB
    fn attach_database(&self) -> Result<()> {
        let kind = self.url.kind();

        if let Some(extension) = kind.extension() {
            self.conn
                .execute_batch(&format!("INSTALL {extension}; LOAD {extension};"))
                .map_err(|e| {
                    Error::connection(
                        self.connection_info(),
                        format!("Failed to load {extension} extension: {e}"),
                    )
                })?;
        }

        let target = quote_literal(self.url.attach_target());
        let alias = quote_ident(TARGET_ALIAS);
        let attach_sql = match kind {
            DatabaseKind::Postgres => format!("ATTACH {target} AS {alias} (TYPE POSTGRES);"),
            DatabaseKind::Mysql => format!("ATTACH {target} AS {alias} (TYPE MYSQL);"),
            DatabaseKind::Sqlite => format!("ATTACH {target} AS {alias} (TYPE SQLITE);"),
            DatabaseKind::Duckdb => format!("ATTACH {target} AS {alias};"),
        };

        // The attach statement carries credentials, so only the masked URL is logged.
        tracing::debug!("Attaching {} as {}", self.connection_info(), TARGET_ALIAS);
        self.conn.execute_batch(&attach_sql).map_err(|e| {
            Error::connection(self.connection_info(), format!("Failed to attach {kind}: {e}"))
        })?;

        Ok(())
    }

    fn ensure_schema(&self) -> Result<()> {
        if let Some(schema) = &self.schema {
            let sql = format!(
                "CREATE SCHEMA IF NOT EXISTS {}.{};",
                quote_ident(TARGET_ALIAS),
                quote_ident(schema)
            );
            tracing::debug!("Executing: {}", sql);
            self.conn
                .execute_batch(&sql)
                .map_err(|e| Error::database(format!("Failed to create schema '{schema}': {e}")))?;
        }
        Ok(())
    }

    /// Test the target connection with a metadata query
    pub fn check_connection(&self) -> Result<()> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.schemata WHERE catalog_name = ?",
                params![TARGET_ALIAS],
                |row| row.get::<_, i64>(0),
            )
            .map_err(|e| Error::connection(self.connection_info(), e.to_string()))?;
        Ok(())
    }

    /// Names of the tables in the target schema, sorted
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let base = "SELECT table_name FROM information_schema.tables \
                    WHERE table_catalog = ? AND table_type = 'BASE TABLE'";

        let tables = if let Some(schema) = &self.schema {
            let mut stmt = self
                .conn
                .prepare(&format!("{base} AND table_schema = ? ORDER BY table_name"))?;
            let rows = stmt.query_map(params![TARGET_ALIAS, schema], |row| row.get(0))?;
            rows.collect::<std::result::Result<Vec<String>, _>>()?
        } else {
            let mut stmt = self.conn.prepare(&format!("{base} ORDER BY table_name"))?;
            let rows = stmt.query_map(params![TARGET_ALIAS], |row| row.get(0))?;
            rows.collect::<std::result::Result<Vec<String>, _>>()?
        };

        Ok(tables)
    }

    /// Whether a table of this exact name exists in the target schema
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.list_tables()?.iter().any(|t| t == table))
    }

    /// Drop a table if it exists, returning whether it was there
    pub fn drop_table(&self, table: &str) -> Result<bool> {
        let existed = self.table_exists(table)?;
        let sql = format!("DROP TABLE IF EXISTS {};", self.qualified(table));
        tracing::debug!("Executing: {}", sql);
        self.conn
            .execute_batch(&sql)
            .map_err(|e| Error::database(format!("Failed to drop table '{table}': {e}")))?;
        Ok(existed)
    }

    /// Write a CSV file to the target as `table`, replacing any existing table
    ///
    /// `summary` must come from inspecting the same file. Equivalent to
    /// [`stage_csv`](Self::stage_csv) followed by
    /// [`write_staged`](Self::write_staged).
    pub fn load_csv(
        &self,
        path: impl AsRef<Path>,
        table: &str,
        summary: &CsvSummary,
    ) -> Result<LoadedTable> {
        let staged = self.stage_csv(path, summary)?;
        self.write_staged(table, staged)
    }

    /// Read a CSV file into the local staging table
    ///
    /// Nothing in the target is touched, so a file DuckDB cannot read
    /// fails here without costing the table it would replace. A
    /// header-only file stages text columns with no rows; otherwise column
    /// types are inferred from the whole file.
    pub fn stage_csv(&self, path: impl AsRef<Path>, summary: &CsvSummary) -> Result<StagedCsv> {
        let path = path.as_ref();
        let stage = quote_ident(STAGE_TABLE);

        let sql = if summary.row_count == 0 {
            let columns = header_column_names(&summary.headers)
                .iter()
                .map(|name| format!("{} VARCHAR", quote_ident(name)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("CREATE OR REPLACE TEMP TABLE {stage} ({columns});")
        } else {
            let file = path
                .to_str()
                .ok_or_else(|| Error::csv_parse(path, "Path is not valid UTF-8"))?;
            format!(
                "CREATE OR REPLACE TEMP TABLE {stage} AS SELECT * FROM read_csv({}, header = true, delim = ',', quote = '\"', escape = '\"', sample_size = -1);",
                quote_literal(file)
            )
        };

        tracing::debug!("Executing: {}", sql);
        self.conn
            .execute_batch(&sql)
            .map_err(|e| Error::csv_parse(path, e.to_string()))?;

        let columns = self.stage_columns()?;

        // DuckDB reads a blank line in a one-column file as a NULL row;
        // the csv reader skips it.
        if summary.row_count > 0 {
            if let [column] = columns.as_slice() {
                let sql = format!("DELETE FROM {stage} WHERE {} IS NULL;", quote_ident(column));
                tracing::debug!("Executing: {}", sql);
                self.conn.execute_batch(&sql)?;
            }
        }

        let row_count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {stage}"), [], |row| row.get(0))?;

        Ok(StagedCsv {
            row_count: row_count as usize,
            columns,
        })
    }

    /// Copy the staged CSV into the target as `table`, replacing any existing table
    pub fn write_staged(&self, table: &str, staged: StagedCsv) -> Result<LoadedTable> {
        let stage = quote_ident(STAGE_TABLE);
        let target = self.qualified(table);
        let write_sql = format!(
            "DROP TABLE IF EXISTS {target}; CREATE TABLE {target} AS SELECT * FROM {stage};"
        );
        tracing::debug!("Executing: {}", write_sql);
        self.conn
            .execute_batch(&write_sql)
            .map_err(|e| Error::database(format!("Failed to write table '{table}': {e}")))?;

        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {stage};"))?;

        Ok(LoadedTable {
            table: table.to_string(),
            row_count: staged.row_count,
            columns: staged.columns,
        })
    }

    fn stage_columns(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT name FROM pragma_table_info({}) ORDER BY cid",
            quote_literal(STAGE_TABLE)
        ))?;
        let columns = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(columns)
    }

    /// Number of rows in a target table
    pub fn row_count(&self, table: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.qualified(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Column names of a target table, in table order
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let base = "SELECT column_name FROM information_schema.columns \
                    WHERE table_catalog = ? AND table_name = ?";

        let columns = if let Some(schema) = &self.schema {
            let mut stmt = self.conn.prepare(&format!(
                "{base} AND table_schema = ? ORDER BY ordinal_position"
            ))?;
            let rows = stmt.query_map(params![TARGET_ALIAS, table, schema], |row| row.get(0))?;
            rows.collect::<std::result::Result<Vec<String>, _>>()?
        } else {
            let mut stmt = self
                .conn
                .prepare(&format!("{base} ORDER BY ordinal_position"))?;
            let rows = stmt.query_map(params![TARGET_ALIAS, table], |row| row.get(0))?;
            rows.collect::<std::result::Result<Vec<String>, _>>()?
        };

        Ok(columns)
    }

    /// Fully qualified, quoted name of a target table
    fn qualified(&self, table: &str) -> String {
        match &self.schema {
            Some(schema) => format!(
                "{}.{}.{}",
                quote_ident(TARGET_ALIAS),
                quote_ident(schema),
                quote_ident(table)
            ),
            None => format!("{}.{}", quote_ident(TARGET_ALIAS), quote_ident(table)),
        }
    }

    /// Database kind of the target
    pub fn kind(&self) -> DatabaseKind {
        self.url.kind()
    }

    /// Schema tables are written to
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Target URL for logging, password masked
    pub fn connection_info(&self) -> String {
        self.url.masked()
    }

    /// Detach the target and close the connection
    pub fn close(self) -> Result<()> {
        self.conn
            .execute_batch(&format!("DETACH {};", quote_ident(TARGET_ALIAS)))?;
        self.conn.close().map_err(|(_, e)| Error::DuckDb(e))
    }
}

/// Column names for a header-only file, named the way DuckDB's CSV reader
/// names them: blank headers become `column<i>` and repeats get a `_<n>`
/// suffix.
fn header_column_names(headers: &[String]) -> Vec<String> {
    let width = headers.len().saturating_sub(1).to_string().len();
    let mut seen = HashSet::new();

    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let base = if header.trim().is_empty() {
                format!("column{i:0width$}")
            } else {
                header.clone()
            };
            let mut name = base.clone();
            let mut suffix = 1;
            // DuckDB identifiers are case-insensitive.
            while !seen.insert(name.to_lowercase()) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}
