//! Durable merge stores.
//!
//! A store persists `(initials, text) → (seen, used)` and offers:
//! - merge-on-write of a buffered family (existing counts are incremented)
//! - lookup by initials with a bounded random sample
//! - "used" bookkeeping driven by the composer
//!
//! The dedupe `Ledger` lives here too since it shares the storage directory.

use rand::RngCore;
use rand::seq::{IteratorRandom, SliceRandom};

use crate::corpus::InitialFamily;
use crate::error::Result;
use crate::ngram::NGram;

mod file;
mod ledger;
mod memory;

pub use file::FileStore;
pub use ledger::Ledger;
pub use memory::MemoryStore;

/// `used` value of a text that has never been selected.
pub const BASELINE_USED: u64 = 1;

/// One stored text offered to the composer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
	pub text: String,
	pub initials: String,
	/// Corpus occurrences.
	pub seen: u64,
	/// Baseline of 1, plus one per accepted composition using the text.
	pub used: u64,
}

impl Candidate {
	/// Number of tokens (one per initial).
	pub fn token_count(&self) -> usize {
		self.initials.chars().count()
	}

	/// Whether any token carries a tag marker.
	pub fn is_tagged(&self) -> bool {
		self.text.contains(crate::ngram::token::TAG_MARKER)
	}
}

/// Outcome of merging one family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
	/// Texts that were not stored before.
	pub inserted: usize,
	/// Stored texts whose count was incremented.
	pub updated: usize,
	/// Stored texts copied through unchanged.
	pub kept: usize,
}

impl MergeStats {
	pub fn absorb(&mut self, other: MergeStats) {
		self.inserted += other.inserted;
		self.updated += other.updated;
		self.kept += other.kept;
	}
}

/// Backing storage for a corpus.
///
/// Single-writer: one process merges into a given signature at a time.
pub trait CorpusStore {
	/// Adds the family's buffered counts to the stored ones.
	///
	/// The family itself is left untouched, so a failed merge can be retried;
	/// merging the same buffer twice double-counts.
	fn merge(&mut self, family: &InitialFamily) -> Result<MergeStats>;

	/// Every stored text for a signature (empty if the signature is unknown).
	fn entries(&self, initials: &str) -> Result<Vec<Candidate>>;

	/// Increments the `used` count of each n-gram.
	fn record_uses(&mut self, ngrams: &[NGram]) -> Result<()>;

	/// Every signature with at least one stored text.
	fn signatures(&self) -> Result<Vec<String>>;

	/// Up to `limit` stored texts for a signature, in random order.
	fn sample(&self, initials: &str, limit: usize, rng: &mut dyn RngCore) -> Result<Vec<Candidate>> {
		let mut picked = self.entries(initials)?.into_iter().choose_multiple(&mut *rng, limit);
		picked.shuffle(&mut *rng);
		Ok(picked)
	}
}
