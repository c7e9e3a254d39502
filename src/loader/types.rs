//! Events and results of a folder load

use serde::Serialize;

// ============================================================================
// Events
// ============================================================================

/// Progress notification emitted while a folder is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadEvent {
    /// A run is starting
    Started {
        data_dir: String,
        file_count: usize,
        policy: String,
    },
    /// Another file already mapped to this table; the later file wins
    NameCollision {
        table: String,
        previous_file: String,
        file: String,
    },
    /// The target table was dropped ahead of a reload
    Dropped { table: String, existed: bool },
    /// A file is about to be written
    Uploading { file: String, table: String },
    /// A file was written
    Uploaded {
        file: String,
        table: String,
        row_count: usize,
        columns: Vec<String>,
    },
    /// The table already exists and was left alone
    Skipped { file: String, table: String },
}

// ============================================================================
// Results
// ============================================================================

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadAction {
    /// Written to the target
    Uploaded,
    /// Table already present, nothing written
    Skipped,
}

/// Outcome for one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOutcome {
    pub file: String,
    pub table: String,
    pub action: LoadAction,
    /// Whether an existing table was dropped first
    pub dropped: bool,
    /// Rows written (0 when skipped)
    pub row_count: usize,
}

/// Summary of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// One entry per source file, in processing order
    pub outcomes: Vec<TableOutcome>,
    /// Wall time of the run
    pub duration_ms: u64,
}

impl LoadReport {
    /// Number of files written to the target
    pub fn uploaded_count(&self) -> usize {
        self.count(LoadAction::Uploaded)
    }

    /// Number of files skipped as already uploaded
    pub fn skipped_count(&self) -> usize {
        self.count(LoadAction::Skipped)
    }

    /// Number of pre-existing tables dropped
    pub fn dropped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.dropped).count()
    }

    /// Rows written across all tables
    pub fn total_rows(&self) -> usize {
        self.outcomes.iter().map(|o| o.row_count).sum()
    }

    /// Tables written in this run, in order
    pub fn uploaded_tables(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.action == LoadAction::Uploaded)
            .map(|o| o.table.as_str())
            .collect()
    }

    fn count(&self, action: LoadAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }
}
