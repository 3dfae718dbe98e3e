//! CSV import of tabular event logs.
//!
//! Rows are grouped into traces by a case-id column; each trace carries the values of an
//! activity column. When a timestamp column is configured, events within a case are ordered by
//! parsed timestamp ([`TIMESTAMP_FORMAT`]), otherwise original row order is preserved. Trace
//! order in the resulting log follows the first appearance of each case id in the file.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::event_log::event_log_struct::EventLog;

/// Timestamp format of the timestamp column (`dd/MM/yyyy HH:mm:ss`).
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Error type for CSV event log parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CsvLogImportError {
    /// CSV parsing or IO error
    CsvError(String),
    /// A required column is missing from the header row
    MissingColumn(String),
    /// Invalid timestamp value
    InvalidTimestamp {
        /// 1-based file row (including the header row) where the error occurred
        row: usize,
        /// The invalid timestamp value
        value: String,
    },
}

impl Display for CsvLogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CsvError(e) => write!(f, "CSV error: {e}"),
            Self::MissingColumn(col) => write!(f, "Missing required column: {col}"),
            Self::InvalidTimestamp { row, value } => {
                write!(f, "Invalid timestamp at row {row}: '{value}'")
            }
        }
    }
}

impl std::error::Error for CsvLogImportError {}

impl From<csv::Error> for CsvLogImportError {
    fn from(e: csv::Error) -> Self {
        Self::CsvError(e.to_string())
    }
}

impl From<std::io::Error> for CsvLogImportError {
    fn from(e: std::io::Error) -> Self {
        Self::CsvError(e.to_string())
    }
}

/// Options for CSV event log import.
///
/// Column names are matched against the header row ASCII-case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvImportOptions {
    /// Name of the column holding the case identifier
    pub case_id_column: String,
    /// Name of the column holding the activity label
    pub activity_column: String,
    /// Optional name of the column holding the event timestamp; when set, events within a case
    /// are sorted by parsed timestamp
    pub timestamp_column: Option<String>,
    /// Field delimiter (`b','` by default)
    pub delimiter: u8,
}

impl CsvImportOptions {
    /// Options for the given case-id and activity columns, comma-delimited, without timestamps.
    pub fn new<S: Into<String>>(case_id_column: S, activity_column: S) -> Self {
        Self {
            case_id_column: case_id_column.into(),
            activity_column: activity_column.into(),
            timestamp_column: None,
            delimiter: b',',
        }
    }
}

impl Default for CsvImportOptions {
    fn default() -> Self {
        Self::new("case_id", "activity")
    }
}

/// Import an [`EventLog`] from CSV data.
pub fn import_csv_log<R: Read>(
    reader: R,
    options: &CsvImportOptions,
) -> Result<EventLog, CsvLogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| CsvLogImportError::MissingColumn(name.to_string()))
    };

    let case_index = column_index(&options.case_id_column)?;
    let activity_index = column_index(&options.activity_column)?;
    let timestamp_index = match &options.timestamp_column {
        Some(column) => Some(column_index(column)?),
        None => None,
    };

    let mut case_order: Vec<String> = Vec::new();
    let mut cases: HashMap<String, Vec<(Option<NaiveDateTime>, String)>> = HashMap::new();

    for (i, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = i + 2;

        let case_id = record.get(case_index).unwrap_or_default().to_string();
        let activity = record.get(activity_index).unwrap_or_default().to_string();

        let timestamp = match timestamp_index {
            Some(index) => {
                let value = record.get(index).unwrap_or_default();
                let parsed = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(
                    |_| CsvLogImportError::InvalidTimestamp {
                        row,
                        value: value.to_string(),
                    },
                )?;
                Some(parsed)
            }
            None => None,
        };

        if !cases.contains_key(&case_id) {
            case_order.push(case_id.clone());
        }
        cases
            .entry(case_id)
            .or_default()
            .push((timestamp, activity));
    }

    let mut log = EventLog::new();
    for case_id in case_order {
        let mut events = cases.remove(&case_id).unwrap_or_default();
        if timestamp_index.is_some() {
            events.sort_by_key(|(timestamp, _)| *timestamp);
        }
        log.add_trace(events.into_iter().map(|(_, activity)| activity).collect());
    }

    Ok(log)
}

/// Import an [`EventLog`] from a CSV file.
pub fn import_csv_log_file<P: AsRef<Path>>(
    path: P,
    options: &CsvImportOptions,
) -> Result<EventLog, CsvLogImportError> {
    let file = File::open(path)?;
    import_csv_log(BufReader::new(file), options)
}
