use super::classify::classify;
use super::event_trace::EventTraceAnalyzer;
use super::metadata::MetadataAnalyzer;
use super::storage::StorageAnalyzer;
use super::traits::*;

/// Analyzer orchestrator
/// 1. Classify the entry (first matching rule wins)
/// 2. Run the one analyzer registered for that kind, if any
pub struct Analyzer {
    analyzers: Vec<Box<dyn EntryAnalyzer>>,
}

impl Analyzer {
    pub fn new() -> Self {
        let analyzers: Vec<Box<dyn EntryAnalyzer>> = vec![
            Box::new(EventTraceAnalyzer),
            Box::new(StorageAnalyzer),
            Box::new(MetadataAnalyzer),
        ];

        Self { analyzers }
    }

    /// Findings for one entry. Empty when the entry is not analyzable or
    /// its analyzer found nothing.
    pub fn analyze(&self, entry_type: &str, message: &str) -> Vec<Analysis> {
        let entry = classify(entry_type, message);
        if !entry.is_applicable() {
            return Vec::new();
        }

        self.analyzers
            .iter()
            .find(|analyzer| analyzer.kind() == entry.kind)
            .and_then(|analyzer| analyzer.analyze(entry.message))
            .unwrap_or_default()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
