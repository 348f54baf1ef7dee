//! Row filtering for the table view.

pub mod engine;

pub use engine::{FilterError, FilterMode, RowColumn, RowFilter};
