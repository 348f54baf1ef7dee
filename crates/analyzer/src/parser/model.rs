use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Line does not match the entry grammar")]
    NoMatch,

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// One logical log record, possibly spanning several physical lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Timestamp text exactly as it appeared in the log
    pub date: String,

    /// Parsed timestamp (offset preserved)
    pub timestamp: DateTime<FixedOffset>,

    /// Parenthesised process-name tag, e.g. "Microsoft Teams"
    pub process_name: String,

    /// Digit run identifying the emitting process
    pub pid: String,

    /// Free-form category ("info", "error", "event", ...)
    #[serde(rename = "type")]
    pub entry_type: String,

    /// Message text; continuation lines are appended with their line break
    pub message: String,

    /// 1-based physical line number of the line that started this entry
    pub sequence: u64,
}

impl LogEntry {
    pub fn append_continuation(&mut self, line: &str) {
        self.message.push('\n');
        self.message.push_str(line);
    }

    pub fn to_row(&self) -> TabularRow {
        TabularRow {
            id: self.sequence,
            date: self.date.clone(),
            pid: self.pid.clone(),
            entry_type: self.entry_type.clone(),
            message: self.message.clone(),
        }
    }
}

/// Flat row handed to the table view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabularRow {
    pub id: u64,
    pub date: String,
    pub pid: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub lines_read: u64,
    pub entries: u64,
    pub continuation_lines: u64,
    pub orphaned_lines: u64,
}
