/// Entry analysis
///
/// Classifies each entry by content and runs at most one specialised
/// analyzer over it:
///
/// - `classify.rs`: marker precedence rules
/// - `dispatch.rs`: classifier + analyzer orchestration
/// - `event_trace/`: stateful decoder for the `ssoEventData` auth trace
/// - `metadata.rs`: app start, session, ring and tenant banners
/// - `storage.rs`: storage.json failures

pub mod classify;
pub mod dispatch;
pub mod event_trace;
pub mod metadata;
pub mod model;
pub mod storage;
pub mod traits;

pub use classify::classify;
pub use dispatch::Analyzer;
pub use model::{Analysis, AnalysisKind, AnalyzableEntry, MetadataKey, Severity};
pub use traits::EntryAnalyzer;
