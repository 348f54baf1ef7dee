/// Log line parsing
///
/// Turns the raw text stream written by the desktop client's logger into an
/// ordered sequence of [`LogEntry`] values, merging continuation lines
/// (stack traces, JSON blobs) into the entry they belong to.
///
/// # Architecture
///
/// - `model.rs`: entry, row and statistics types
/// - `line.rs`: line grammar, push-driven parser and lazy iterator adapter

pub mod line;
pub mod model;

pub use line::{parse_line, Entries, LineParser};
pub use model::{LogEntry, ParseError, ParseStats, TabularRow};
