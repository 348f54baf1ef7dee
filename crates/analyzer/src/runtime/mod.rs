//! Runtime module — driver lifecycle: boot, read, analyze, render.

pub mod boot;
pub mod reader;
pub mod report;
pub mod run;

pub use run::{analyze_reader, run, RunError};
