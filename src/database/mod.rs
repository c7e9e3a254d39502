//! Database target support via DuckDB
//!
//! This module provides connectivity to the target database using DuckDB as
//! the write engine. DuckDB attaches PostgreSQL, MySQL, SQLite and DuckDB
//! catalogs and writes CSV data into them with `CREATE TABLE ... AS`.

mod connection;
mod engine;
mod sql;

pub use connection::DatabaseUrl;
pub use engine::{DatabaseEngine, LoadedTable, StagedCsv, TARGET_ALIAS};
pub use sql::{quote_ident, quote_literal};
