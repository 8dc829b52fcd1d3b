//! Acrostic composition from harvested n-gram corpora.
//!
//! This crate provides the whole pipeline behind the acrostic generator:
//! - Token cleaning and n-gram extraction keyed by initials
//! - A buffered corpus accumulator that merges counts into durable storage
//! - Storage backends with merge-on-write and randomized sampling
//! - Fitness-weighted composition of word sequences spelling a target
//!
//! The two halves are independent: ingestion fills a store, composition
//! reads it back (usually in a separate invocation).

/// Crate-wide error type and result alias.
pub mod error;

/// Configuration file loading and validation.
pub mod config;

/// Tokens, n-grams and window extraction.
pub mod ngram;

/// Initial-keyed families and the buffered accumulator.
pub mod corpus;

/// Durable merge stores and the dedupe ledger.
pub mod store;

/// Candidate scoring, weighted sampling and acrostic composition.
pub mod compose;

/// Raw text sources (plain line files, wiki dumps).
pub mod source;

/// I/O utilities (file naming, listing, atomic replace).
///
/// Not exposed
pub(crate) mod io;

pub use error::{AcrosticError, ExhaustionReason, Result};
