use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::family::InitialFamily;
use super::filter::TargetFilter;
use crate::config::{AcrosticConfig, ExtractionMode};
use crate::error::{AcrosticError, Result};
use crate::ngram::{Extractor, NGram};
use crate::store::{CorpusStore, MergeStats};

/// Accumulator settings.
#[derive(Clone, Debug)]
pub struct CorpusOptions {
	/// Maximum n-gram length (L).
	pub max_ngram_len: usize,
	/// Flush once more than this many new texts are buffered.
	pub flush_threshold: usize,
	pub extraction: ExtractionMode,
	pub keep_tags: bool,
}

impl Default for CorpusOptions {
	fn default() -> Self {
		AcrosticConfig::default().into()
	}
}

impl From<&AcrosticConfig> for CorpusOptions {
	fn from(config: &AcrosticConfig) -> Self {
		Self {
			max_ngram_len: config.max_ngram_len,
			flush_threshold: config.flush_threshold,
			extraction: config.extraction,
			keep_tags: config.keep_tags,
		}
	}
}

impl From<AcrosticConfig> for CorpusOptions {
	fn from(config: AcrosticConfig) -> Self {
		(&config).into()
	}
}

/// Totals of one flush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
	/// Families with buffered counts that were merged.
	pub families: usize,
	pub merged: MergeStats,
}

/// Totals of one `ingest` run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
	/// Text units consumed.
	pub units: usize,
	/// N-grams routed to families (after filtering).
	pub ngrams: usize,
}

/// Buffers n-gram counts per initials signature and flushes them to a store.
///
/// # Responsibilities
/// - Route each n-gram to the family of its initials (created on demand)
/// - Count the new texts buffered since the last flush
/// - Merge every resident family into the store once the threshold is passed
///
/// # Lifecycle
/// Construct, add repeatedly, then `finish`. Dropping a corpus with buffered
/// counts flushes them too, so an early return on error does not lose work
/// already accepted. A crash before any flush does lose the buffer.
///
/// # Invariants
/// - Between flushes, buffered counts and stored counts are disjoint
/// - After a successful flush every family buffer is empty
pub struct Corpus<S: CorpusStore> {
	store: S,
	/// Resident families indexed by initials (sparse).
	families: HashMap<String, InitialFamily>,
	/// New texts buffered since the last flush.
	buffered: usize,
	/// New texts buffered over the whole lifetime.
	total: usize,
	extractor: Extractor,
	options: CorpusOptions,
	filter: Option<TargetFilter>,
}

impl<S: CorpusStore> Corpus<S> {
	/// Creates an empty accumulator over `store`.
	///
	/// # Errors
	/// Returns an error if the n-gram limit or flush threshold is zero.
	pub fn new(store: S, options: CorpusOptions) -> Result<Self> {
		if options.flush_threshold == 0 {
			return Err(AcrosticError::config("flush_threshold must be at least 1"));
		}
		let extractor = Extractor::new(options.max_ngram_len, options.keep_tags)?;
		Ok(Self {
			store,
			families: HashMap::new(),
			buffered: 0,
			total: 0,
			extractor,
			options,
			filter: None,
		})
	}

	/// Enables scraping mode: only n-grams accepted by `filter` are counted.
	pub fn with_filter(mut self, filter: TargetFilter) -> Self {
		self.filter = Some(filter);
		self
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	/// New texts buffered since the last flush.
	pub fn buffered(&self) -> usize {
		self.buffered
	}

	/// New texts buffered since construction.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Number of resident families holding buffered counts.
	pub fn resident_families(&self) -> usize {
		self.families.values().filter(|family| !family.is_empty()).count()
	}

	/// Buffers one occurrence of `ngram`.
	///
	/// Flushes everything once more than `flush_threshold` new texts are buffered.
	pub fn add_ngram(&mut self, ngram: &NGram) -> Result<()> {
		let family = match self.families.entry(ngram.initials().to_owned()) {
			Entry::Occupied(entry) => entry.into_mut(),
			Entry::Vacant(entry) => {
				entry.insert(InitialFamily::new(ngram.initials(), self.options.max_ngram_len)?)
			}
		};

		if !family.add(ngram, 1)? {
			self.buffered += 1;
			self.total += 1;
		}

		if self.buffered > self.options.flush_threshold {
			self.flush()?;
		}
		Ok(())
	}

	/// Extracts the n-grams of one text unit and buffers those passing the filter.
	///
	/// Returns how many n-grams were buffered.
	pub fn add_text(&mut self, text: &str) -> Result<usize> {
		let ngrams = self.extractor.extract(text, self.options.extraction)?;
		let mut added = 0;
		for ngram in &ngrams {
			if self.filter.as_ref().is_some_and(|filter| !filter.accepts(ngram)) {
				continue;
			}
			self.add_ngram(ngram)?;
			added += 1;
		}
		Ok(added)
	}

	/// Drains a text source into the corpus, one unit at a time.
	pub fn ingest<I>(&mut self, source: I) -> Result<IngestStats>
	where
		I: IntoIterator<Item = Result<String>>,
	{
		let mut stats = IngestStats::default();
		for unit in source {
			stats.ngrams += self.add_text(&unit?)?;
			stats.units += 1;
		}
		log::info!("ingested {} units ({} n-grams)", stats.units, stats.ngrams);
		Ok(stats)
	}

	/// Merges every resident family into the store and clears it.
	///
	/// A family is cleared only once its merge succeeded, so a failed flush can
	/// be retried without double counting.
	pub fn flush(&mut self) -> Result<FlushStats> {
		let mut stats = FlushStats::default();
		for family in self.families.values_mut() {
			if family.is_empty() {
				continue;
			}
			stats.merged.absorb(self.store.merge(family)?);
			family.clear();
			stats.families += 1;
		}
		self.families.clear();
		self.buffered = 0;

		log::info!(
			"flushed {} families: {} new texts, {} updated",
			stats.families,
			stats.merged.inserted,
			stats.merged.updated
		);
		Ok(stats)
	}

	/// Final flush; consumes the accumulator.
	pub fn finish(mut self) -> Result<FlushStats> {
		self.flush()
	}
}

impl<S: CorpusStore> Drop for Corpus<S> {
	fn drop(&mut self) {
		if self.resident_families() == 0 {
			return;
		}
		if let Err(e) = self.flush() {
			log::error!("flush on drop failed, buffered counts lost: {}", e);
		}
	}
}
