use indexmap::IndexMap;

use crate::analysis::Analysis;
use crate::parser::LogEntry;

use super::model::Process;
use super::summary::ProcessSummary;

/// Map from pid to its aggregate, in first-seen order.
///
/// Built fresh for every parse run and owned by a single consumer; nothing
/// here is shared across runs.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    processes: IndexMap<String, Process>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing aggregate for `pid`, or a newly registered one.
    pub fn get_or_create(&mut self, pid: &str) -> &mut Process {
        if !self.processes.contains_key(pid) {
            tracing::debug!(pid, "new process observed");
        }
        self.processes
            .entry(pid.to_string())
            .or_insert_with(|| Process::new(pid))
    }

    pub fn get(&self, pid: &str) -> Option<&Process> {
        self.processes.get(pid)
    }

    /// Route an entry and its findings to the entry's process.
    pub fn ingest(&mut self, entry: LogEntry, analyses: Vec<Analysis>) -> &Process {
        let process = self.get_or_create(&entry.pid);
        process.ingest(entry, analyses);
        process
    }

    /// Compute derived fields on every process. Idempotent.
    pub fn finalize(&mut self) {
        for process in self.processes.values_mut() {
            process.finalize();
        }
    }

    pub fn enumerate(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    pub fn summaries(&self) -> Vec<ProcessSummary> {
        self.enumerate().map(ProcessSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{MetadataKey, Severity};
    use crate::parser::parse_line;

    fn entry(pid: &str, sequence: u64) -> LogEntry {
        let line = format!("Mon Jan 02 2023 10:00:0{} GMT+0000 (foo) <{}> -- info -- m", sequence % 10, pid);
        parse_line(&line, sequence).unwrap()
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = ProcessRegistry::new();
        registry.get_or_create("1");
        registry.get_or_create("1");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_enumerate_in_first_seen_order() {
        let mut registry = ProcessRegistry::new();
        for (i, pid) in ["30", "10", "30", "20", "10"].iter().enumerate() {
            registry.ingest(entry(pid, i as u64 + 1), Vec::new());
        }
        let pids: Vec<_> = registry.enumerate().map(|p| p.pid()).collect();
        assert_eq!(pids, vec!["30", "10", "20"]);
        assert_eq!(registry.get("30").unwrap().entries().len(), 2);
    }

    #[test]
    fn test_ingest_keeps_arrival_order_per_process() {
        let mut registry = ProcessRegistry::new();
        registry.ingest(entry("5", 1), Vec::new());
        registry.ingest(entry("6", 2), Vec::new());
        registry.ingest(entry("5", 3), Vec::new());
        let sequences: Vec<_> = registry.get("5").unwrap().entries().iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 3]);
    }

    #[test]
    fn test_ingest_folds_findings() {
        let mut registry = ProcessRegistry::new();
        let process = registry.ingest(
            entry("5", 1),
            vec![
                Analysis::with_line(Severity::Failure, "Local Storage", "boom"),
                Analysis::metadata(vec![(MetadataKey::AppVersion, "2.0".to_string())]),
            ],
        );
        assert_eq!(process.failure_findings().len(), 1);
        assert_eq!(process.app_version(), "2.0");
    }

    #[test]
    fn test_summaries_after_finalize() {
        let mut registry = ProcessRegistry::new();
        registry.ingest(entry("5", 1), Vec::new());
        registry.ingest(entry("5", 4), Vec::new());
        registry.finalize();
        let summaries = registry.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].duration, "0h 0m 3s");
        assert_eq!(summaries[0].entry_count, 2);
    }
}
