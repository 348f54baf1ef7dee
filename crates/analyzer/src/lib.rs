// Domain-driven module structure for the log analyzer.

// Core pipeline
pub mod parser;
pub mod analysis;
pub mod process;
pub mod session;

// Presentation support
pub mod filter;

// Driver
pub mod conf;
pub mod runtime;
