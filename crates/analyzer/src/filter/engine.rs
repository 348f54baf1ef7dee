use std::sync::atomic::{AtomicU64, Ordering};

use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::TabularRow;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    Include,
    Exclude,
}

/// Which row column a filter looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowColumn {
    #[default]
    Any,
    Date,
    Pid,
    Type,
    Message,
}

#[derive(Debug, Default)]
pub struct FilterStats {
    pub rows_scanned: AtomicU64,
    pub rows_matched: AtomicU64,
}

/// Regex filter over table rows, the table's per-column header filters.
pub struct RowFilter {
    matcher: RegexMatcher,
    mode: FilterMode,
    column: RowColumn,
    stats: FilterStats,
}

impl RowFilter {
    pub fn new(pattern: &str, case_sensitive: bool, mode: FilterMode) -> Result<Self, FilterError> {
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(!case_sensitive)
            .build(pattern)
            .map_err(|e| FilterError::InvalidRegex(e.to_string()))?;

        Ok(Self {
            matcher,
            mode,
            column: RowColumn::Any,
            stats: FilterStats::default(),
        })
    }

    pub fn on_column(mut self, column: RowColumn) -> Self {
        self.column = column;
        self
    }

    pub fn should_include(&self, row: &TabularRow) -> bool {
        self.stats.rows_scanned.fetch_add(1, Ordering::Relaxed);

        let matches = match self.column {
            RowColumn::Any => [&row.date, &row.pid, &row.entry_type, &row.message]
                .into_iter()
                .any(|field| self.is_match(field)),
            RowColumn::Date => self.is_match(&row.date),
            RowColumn::Pid => self.is_match(&row.pid),
            RowColumn::Type => self.is_match(&row.entry_type),
            RowColumn::Message => self.is_match(&row.message),
        };

        let include = match self.mode {
            FilterMode::Include => matches,
            FilterMode::Exclude => !matches,
        };

        if include {
            self.stats.rows_matched.fetch_add(1, Ordering::Relaxed);
        }

        include
    }

    /// Rows passing the filter, order preserved.
    pub fn apply<'a>(&'a self, rows: &'a [TabularRow]) -> impl Iterator<Item = &'a TabularRow> + 'a {
        rows.iter().filter(move |row| self.should_include(row))
    }

    #[inline]
    fn is_match(&self, field: &str) -> bool {
        self.matcher.is_match(field.as_bytes()).unwrap_or(false)
    }

    /// (scanned, matched)
    pub fn stats(&self) -> (u64, u64) {
        (
            self.stats.rows_scanned.load(Ordering::Relaxed),
            self.stats.rows_matched.load(Ordering::Relaxed),
        )
    }
}
