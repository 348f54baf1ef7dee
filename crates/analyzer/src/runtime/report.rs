//! Report — text and JSON rendering of a finished run.

use std::fmt::Write;

use serde::Serialize;
use thiserror::Error;

use crate::conf::{AnalyzerConfig, OutputFormat};
use crate::filter::RowFilter;
use crate::parser::{ParseStats, TabularRow};
use crate::process::ProcessSummary;
use crate::session::{AnalysisReport, RowExplanation};

/// Report after the row filter and verbosity settings are applied.
#[derive(Debug, Serialize)]
pub struct RenderedReport<'a> {
    pub stats: ParseStats,
    pub processes: Vec<ProcessSummary>,
    pub rows: Vec<&'a TabularRow>,
    pub row_explanations: &'a [RowExplanation],
    pub orphaned_lines: &'a [String],
}

impl<'a> RenderedReport<'a> {
    pub fn new(report: &'a AnalysisReport, config: &AnalyzerConfig, filter: Option<&RowFilter>) -> Self {
        let rows = match filter {
            Some(filter) => report.rows.iter().filter(|row| filter.should_include(row)).collect(),
            None => report.rows.iter().collect(),
        };

        let mut processes = report.processes.clone();
        let row_explanations: &[RowExplanation] = if config.include_verbose {
            &report.row_explanations
        } else {
            for process in &mut processes {
                process.verbose.clear();
            }
            &[]
        };

        Self {
            stats: report.stats,
            processes,
            rows,
            row_explanations,
            orphaned_lines: &report.orphaned_lines,
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to encode JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to format text report")]
    Text(#[from] std::fmt::Error),
}

pub fn render(rendered: &RenderedReport<'_>, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rendered)?),
        OutputFormat::Text => Ok(render_text(rendered)?),
    }
}

fn render_text(report: &RenderedReport<'_>) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    for process in &report.processes {
        writeln!(out, "== Process {} ==", process.pid)?;
        if let Some(name) = &process.process_name {
            writeln!(out, "Name: {}", name)?;
        }
        writeln!(out, "Entries: {}", process.entry_count)?;
        writeln!(out, "Duration: {}", process.duration)?;
        writeln!(out, "App version: {}", process.app_version)?;
        writeln!(out, "Launch reason: {}", process.app_launch_reason)?;
        writeln!(out, "User rings: {}", list_or_na(&process.user_rings))?;
        writeln!(out, "Web client sessions: {}", list_or_na(&process.web_client_sessions))?;
        for switch in &process.tenant_switch_info {
            writeln!(out, "{}", switch)?;
        }
        if !process.verbose.is_empty() {
            writeln!(out, "Verbose:\n{}", process.verbose)?;
        }
        writeln!(out, "Warnings:\n{}", process.warnings)?;
        writeln!(out, "Failures:\n{}", process.failures)?;
        out.push('\n');
    }

    writeln!(out, "{:>6}  {:<34}  {:>6}  {:<8}  message", "id", "date", "pid", "type")?;
    for row in &report.rows {
        let first_line = row.message.lines().next().unwrap_or_default();
        writeln!(
            out,
            "{:>6}  {:<34}  {:>6}  {:<8}  {}",
            row.id, row.date, row.pid, row.entry_type, first_line
        )?;
    }

    writeln!(
        out,
        "\n{} lines, {} entries, {} continuation lines, {} orphaned lines",
        report.stats.lines_read,
        report.stats.entries,
        report.stats.continuation_lines,
        report.stats.orphaned_lines
    )?;
    Ok(out)
}

fn list_or_na(values: &[String]) -> String {
    if values.is_empty() {
        crate::process::NOT_AVAILABLE.to_string()
    } else {
        values.join(", ")
    }
}
