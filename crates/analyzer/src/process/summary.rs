//! Summary — display-ready rendering of one process.

use chrono::TimeDelta;
use serde::Serialize;

use crate::analysis::Analysis;

use super::model::{Process, NOT_AVAILABLE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    pub pid: String,
    pub process_name: Option<String>,
    pub entry_count: usize,
    pub duration: String,
    pub app_version: String,
    pub app_launch_reason: String,
    pub user_rings: Vec<String>,
    pub web_client_sessions: Vec<String>,
    pub tenant_switch_info: Vec<String>,
    pub verbose: String,
    pub warnings: String,
    pub failures: String,
}

impl From<&Process> for ProcessSummary {
    fn from(process: &Process) -> Self {
        Self {
            pid: process.pid().to_string(),
            process_name: process.process_name().map(str::to_string),
            entry_count: process.entries().len(),
            duration: process
                .session_duration()
                .map(format_duration)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            app_version: process.app_version().to_string(),
            app_launch_reason: process.app_launch_reason().to_string(),
            user_rings: process.user_ring_history().to_vec(),
            web_client_sessions: process.web_client_sessions().map(str::to_string).collect(),
            tenant_switch_info: tenant_switch_info(process.tenant_switches(), process.user_ring_history()),
            verbose: format_findings(process.verbose_findings()),
            warnings: format_findings(process.warning_findings()),
            failures: format_findings(process.failure_findings()),
        }
    }
}

/// `"{hours}h {minutes}m {seconds}s"`; hours are not wrapped into days.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds().abs();
    format!("{}h {}m {}s", total / 3600, (total / 60) % 60, total % 60)
}

/// One `"title:"` header per finding with its lines beneath, or `"N/A"`.
pub fn format_findings(findings: &[Analysis]) -> String {
    let blocks: Vec<String> = findings
        .iter()
        .filter(|finding| !finding.explanation.is_empty())
        .map(|finding| {
            let mut block = format!("{}:", finding.title);
            for line in &finding.explanation {
                block.push_str("\n  - ");
                block.push_str(line);
            }
            block
        })
        .collect();

    if blocks.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        blocks.join("\n")
    }
}

/// Tenant switch `i` moved the user from ring `i` to ring `i + 1`.
pub fn tenant_switch_info(switches: &[String], rings: &[String]) -> Vec<String> {
    (0..switches.len())
        .filter_map(|i| {
            let from = rings.get(i)?;
            let to = rings.get(i + 1)?;
            Some(format!("Switched tenant from {} to {}.", from, to))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Severity;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::seconds(0)), "0h 0m 0s");
        assert_eq!(format_duration(TimeDelta::seconds(3 * 3600 + 4 * 60 + 5)), "3h 4m 5s");
        assert_eq!(format_duration(TimeDelta::seconds(30 * 3600)), "30h 0m 0s");
    }

    #[test]
    fn test_format_findings_placeholder() {
        assert_eq!(format_findings(&[]), "N/A");
        let empty = Analysis::new(Severity::Verbose, "t");
        assert_eq!(format_findings(&[empty]), "N/A");
    }

    #[test]
    fn test_format_findings_blocks() {
        let mut first = Analysis::with_line(Severity::Warning, "trace-a", "one");
        first.push_line("two");
        let second = Analysis::with_line(Severity::Warning, "trace-b", "three");
        assert_eq!(
            format_findings(&[first, second]),
            "trace-a:\n  - one\n  - two\ntrace-b:\n  - three"
        );
    }

    #[test]
    fn test_tenant_switch_info_pairs_rings() {
        let rings: Vec<String> = ["ring1", "ring3", "ring0"].iter().map(|s| s.to_string()).collect();
        let switches: Vec<String> = vec!["false".into(), "true".into(), "false".into()];
        assert_eq!(
            tenant_switch_info(&switches, &rings),
            vec![
                "Switched tenant from ring1 to ring3.".to_string(),
                "Switched tenant from ring3 to ring0.".to_string(),
            ]
        );
        assert!(tenant_switch_info(&switches, &[]).is_empty());
    }

    #[test]
    fn test_summary_of_empty_process() {
        let summary = ProcessSummary::from(&Process::new("7"));
        assert_eq!(summary.pid, "7");
        assert_eq!(summary.duration, "N/A");
        assert_eq!(summary.warnings, "N/A");
        assert_eq!(summary.failures, "N/A");
        assert_eq!(summary.app_version, "N/A");
        assert!(summary.process_name.is_none());
    }
}
