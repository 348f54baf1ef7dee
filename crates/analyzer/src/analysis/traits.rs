pub use super::model::{Analysis, AnalysisKind, AnalyzableEntry, MetadataKey, Severity};

pub trait EntryAnalyzer: Send + Sync {
    /// Analyze one classified message. `None` means nothing was found.
    fn analyze(&self, message: &str) -> Option<Vec<Analysis>>;
    fn kind(&self) -> AnalysisKind;
}
