//! Subcommand implementations.

pub mod compose;
pub mod ingest;
pub mod stats;
