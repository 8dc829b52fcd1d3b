//! Corpus accumulation.
//!
//! - `InitialFamily`: buffered counts for one initials signature
//! - `Corpus`: owns every resident family and flushes them to a store
//! - `TargetFilter`: keeps only n-grams useful for one acrostic while scraping

/// Buffered counts for one signature, plus the persisted line format.
mod family;

/// The buffered, threshold-flushing accumulator.
mod accumulator;

/// Scraping-mode n-gram filter.
mod filter;

pub use accumulator::{Corpus, CorpusOptions, FlushStats, IngestStats};
pub use family::{InitialFamily, parse_line, sanitize_text, serialize_line};
pub use filter::TargetFilter;
