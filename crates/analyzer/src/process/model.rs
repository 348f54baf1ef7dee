use chrono::TimeDelta;
use indexmap::IndexSet;

use crate::analysis::{Analysis, MetadataKey, Severity};
use crate::parser::LogEntry;

pub const NOT_AVAILABLE: &str = "N/A";

/// Accumulated view of every entry and finding sharing one pid.
#[derive(Debug, Clone)]
pub struct Process {
    pid: String,
    entries: Vec<LogEntry>,
    session_duration: Option<TimeDelta>,
    app_version: String,
    app_launch_reason: String,
    web_client_sessions: IndexSet<String>,
    user_ring_history: Vec<String>,
    tenant_switches: Vec<String>,
    verbose_findings: Vec<Analysis>,
    warning_findings: Vec<Analysis>,
    failure_findings: Vec<Analysis>,
}

impl Process {
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            entries: Vec::new(),
            session_duration: None,
            app_version: NOT_AVAILABLE.to_string(),
            app_launch_reason: NOT_AVAILABLE.to_string(),
            web_client_sessions: IndexSet::new(),
            user_ring_history: Vec::new(),
            tenant_switches: Vec::new(),
            verbose_findings: Vec::new(),
            warning_findings: Vec::new(),
            failure_findings: Vec::new(),
        }
    }

    /// Record one entry and fold its findings in.
    ///
    /// The entry is appended exactly once, in arrival order, whether or not
    /// it produced any analysis.
    pub fn ingest(&mut self, entry: LogEntry, analyses: Vec<Analysis>) {
        for analysis in analyses {
            self.apply(analysis);
        }
        self.entries.push(entry);
    }

    fn apply(&mut self, analysis: Analysis) {
        match analysis.severity {
            Severity::Verbose => self.verbose_findings.push(analysis),
            Severity::Warning => self.warning_findings.push(analysis),
            Severity::Failure => self.failure_findings.push(analysis),
            Severity::Metadata => self.apply_metadata(&analysis),
        }
    }

    /// Scalar fields are last-write-wins; sessions accumulate deduplicated,
    /// rings and tenant switches accumulate as observed.
    fn apply_metadata(&mut self, analysis: &Analysis) {
        for (key, value) in &analysis.fields {
            match key {
                MetadataKey::AppVersion => self.app_version = value.clone(),
                MetadataKey::AppLaunchReason => self.app_launch_reason = value.clone(),
                MetadataKey::WebAppSession => {
                    self.web_client_sessions.insert(value.clone());
                }
                MetadataKey::UserRingInfo => self.user_ring_history.push(value.clone()),
                MetadataKey::IsHomeTenant => self.tenant_switches.push(value.clone()),
            }
        }
    }

    /// Compute the session duration from the entry time span. Idempotent.
    pub fn finalize(&mut self) {
        let first = self.entries.iter().map(|e| e.timestamp).min();
        let last = self.entries.iter().map(|e| e.timestamp).max();
        self.session_duration = match (first, last) {
            (Some(first), Some(last)) => Some(last.signed_duration_since(first)),
            _ => None,
        };
    }

    pub fn pid(&self) -> &str {
        &self.pid
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn session_duration(&self) -> Option<TimeDelta> {
        self.session_duration
    }

    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    pub fn app_launch_reason(&self) -> &str {
        &self.app_launch_reason
    }

    pub fn web_client_sessions(&self) -> impl Iterator<Item = &str> {
        self.web_client_sessions.iter().map(String::as_str)
    }

    pub fn user_ring_history(&self) -> &[String] {
        &self.user_ring_history
    }

    pub fn tenant_switches(&self) -> &[String] {
        &self.tenant_switches
    }

    pub fn verbose_findings(&self) -> &[Analysis] {
        &self.verbose_findings
    }

    pub fn warning_findings(&self) -> &[Analysis] {
        &self.warning_findings
    }

    pub fn failure_findings(&self) -> &[Analysis] {
        &self.failure_findings
    }

    /// Process-name tag of the first entry, if any.
    pub fn process_name(&self) -> Option<&str> {
        self.entries.first().map(|e| e.process_name.as_str())
    }
}
