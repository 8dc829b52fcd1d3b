//! Acrostic composition.
//!
//! Given a target such as `"cat"`, the composer walks the target left to right.
//! At each position it gathers candidates whose initials match the longest
//! possible prefix of what is left, scores them, and draws one by weighted
//! sampling. Whole attempts are retried when the result is too long or was
//! already published.

/// The bounded attempt loop and acceptance bookkeeping.
pub mod composer;

/// Fitness policies and weighted sampling.
pub mod scoring;

/// Capitalization and joining of the final text.
pub mod render;

/// Where finished compositions go.
pub mod publish;

pub use composer::{Chunk, ComposeOptions, Composer, Composition};
pub use publish::{PublishSink, StdoutSink};
pub use scoring::{LegacyScorer, PopularityScorer, Scorer, weighted_index};
