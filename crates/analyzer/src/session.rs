//! Session — one parse run from raw lines to per-process summaries.
//!
//! Each completed entry is classified, analyzed and folded into the
//! registry before the next one is looked at, so a session abandoned
//! mid-stream still holds a consistent registry.

use serde::Serialize;

use crate::analysis::{Analyzer, Severity};
use crate::parser::{LineParser, LogEntry, ParseStats, TabularRow};
use crate::process::{ProcessRegistry, ProcessSummary};

/// Decoded explanation attached to a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowExplanation {
    pub id: u64,
    pub explanation: String,
}

/// Everything the presentation layer needs from one run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub rows: Vec<TabularRow>,
    pub processes: Vec<ProcessSummary>,
    pub row_explanations: Vec<RowExplanation>,
    pub orphaned_lines: Vec<String>,
    pub stats: ParseStats,
}

pub struct AnalysisSession {
    parser: LineParser,
    analyzer: Analyzer,
    registry: ProcessRegistry,
    rows: Vec<TabularRow>,
    row_explanations: Vec<RowExplanation>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            parser: LineParser::new(),
            analyzer: Analyzer::new(),
            registry: ProcessRegistry::new(),
            rows: Vec::new(),
            row_explanations: Vec::new(),
        }
    }

    /// Feed one raw line.
    pub fn push_line(&mut self, line: &str) {
        if let Some(entry) = self.parser.push(line) {
            self.ingest(entry);
        }
    }

    pub fn push_lines<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for line in lines {
            self.push_line(line.as_ref());
        }
    }

    fn ingest(&mut self, entry: LogEntry) {
        let analyses = self.analyzer.analyze(&entry.entry_type, &entry.message);

        if let Some(verbose) = analyses.iter().find(|a| a.severity == Severity::Verbose) {
            if !verbose.explanation.is_empty() {
                self.row_explanations.push(RowExplanation {
                    id: entry.sequence,
                    explanation: verbose.explanation_text(),
                });
            }
        }

        self.rows.push(entry.to_row());
        self.registry.ingest(entry, analyses);
    }

    /// Registry as built so far; the held-back last entry is not in it yet.
    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Flush the last entry and finalize every process.
    pub fn finish(mut self) -> (ProcessRegistry, AnalysisReport) {
        if let Some(entry) = self.parser.finish() {
            self.ingest(entry);
        }
        self.registry.finalize();

        let stats = self.parser.stats();
        let orphaned_lines = self.parser.take_orphans();
        if !orphaned_lines.is_empty() {
            tracing::warn!(count = orphaned_lines.len(), "lines before the first entry could not be attributed");
        }
        tracing::info!(
            lines = stats.lines_read,
            entries = stats.entries,
            processes = self.registry.len(),
            "log analysis complete"
        );

        let report = AnalysisReport {
            rows: self.rows,
            processes: self.registry.summaries(),
            row_explanations: self.row_explanations,
            orphaned_lines,
            stats,
        };
        (self.registry, report)
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze a complete in-memory log.
pub fn analyze_text(text: &str) -> (ProcessRegistry, AnalysisReport) {
    let mut session = AnalysisSession::new();
    session.push_lines(text.lines());
    session.finish()
}
