//! Process aggregation — per-pid accumulation of entries and findings.

pub mod model;
pub mod registry;
pub mod summary;

pub use model::{Process, NOT_AVAILABLE};
pub use registry::ProcessRegistry;
pub use summary::ProcessSummary;
