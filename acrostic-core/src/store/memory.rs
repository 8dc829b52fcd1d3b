use std::collections::BTreeMap;

use super::{BASELINE_USED, Candidate, CorpusStore, MergeStats};
use crate::corpus::{InitialFamily, sanitize_text};
use crate::error::Result;
use crate::ngram::{DEFAULT_MAX_LEN, NGram};

#[derive(Clone, Copy, Debug)]
struct Counts {
	seen: u64,
	used: u64,
}

/// In-process store with the same semantics as `FileStore`.
///
/// Ordered maps keep iteration deterministic, which makes seeded sampling
/// reproducible.
#[derive(Debug, Default)]
pub struct MemoryStore {
	families: BTreeMap<String, BTreeMap<String, Counts>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a text directly with explicit counts, replacing any previous entry.
	pub fn insert(&mut self, text: &str, seen: u64, used: u64) -> Result<()> {
		let ngram = NGram::parse(&sanitize_text(text), DEFAULT_MAX_LEN)?;
		self.families
			.entry(ngram.initials().to_owned())
			.or_default()
			.insert(ngram.text().to_owned(), Counts { seen, used });
		Ok(())
	}

	/// Builder-style `insert`.
	pub fn with_entry(mut self, text: &str, seen: u64, used: u64) -> Result<Self> {
		self.insert(text, seen, used)?;
		Ok(self)
	}

	/// Stored `(seen, used)` of a text.
	pub fn counts(&self, initials: &str, text: &str) -> Option<(u64, u64)> {
		self.families
			.get(initials)?
			.get(text)
			.map(|counts| (counts.seen, counts.used))
	}
}

impl CorpusStore for MemoryStore {
	fn merge(&mut self, family: &InitialFamily) -> Result<MergeStats> {
		let mut stats = MergeStats::default();
		if family.is_empty() {
			return Ok(stats);
		}

		let stored = self.families.entry(family.initials().to_owned()).or_default();
		stats.kept = stored.values().filter(|counts| counts.seen > 0).count();
		for (text, count) in family.iter() {
			match stored.get_mut(text) {
				Some(counts) if counts.seen > 0 => {
					counts.seen += count;
					stats.updated += 1;
					stats.kept -= 1;
				}
				// known only through usage so far
				Some(counts) => {
					counts.seen = count;
					stats.inserted += 1;
				}
				None => {
					stored.insert(text.to_owned(), Counts { seen: count, used: BASELINE_USED });
					stats.inserted += 1;
				}
			}
		}
		Ok(stats)
	}

	fn entries(&self, initials: &str) -> Result<Vec<Candidate>> {
		Ok(self
			.families
			.get(initials)
			.map(|stored| {
				stored
					.iter()
					.filter(|(_, counts)| counts.seen > 0)
					.map(|(text, counts)| Candidate {
						text: text.clone(),
						initials: initials.to_owned(),
						seen: counts.seen,
						used: counts.used,
					})
					.collect()
			})
			.unwrap_or_default())
	}

	fn record_uses(&mut self, ngrams: &[NGram]) -> Result<()> {
		for ngram in ngrams {
			self.families
				.entry(ngram.initials().to_owned())
				.or_default()
				.entry(ngram.text().to_owned())
				.and_modify(|counts| counts.used += 1)
				.or_insert(Counts { seen: 0, used: BASELINE_USED + 1 });
		}
		Ok(())
	}

	fn signatures(&self) -> Result<Vec<String>> {
		Ok(self
			.families
			.iter()
			.filter(|(_, stored)| stored.values().any(|counts| counts.seen > 0))
			.map(|(initials, _)| initials.clone())
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn family(initials: &str, entries: &[(&str, u64)]) -> InitialFamily {
		let mut family = InitialFamily::new(initials, DEFAULT_MAX_LEN).unwrap();
		for (text, count) in entries {
			family.add(&NGram::parse(text, DEFAULT_MAX_LEN).unwrap(), *count).unwrap();
		}
		family
	}

	#[test]
	fn merge_sums_existing_counts() {
		let mut store = MemoryStore::new().with_entry("a b", 2, 1).unwrap();
		let stats = store.merge(&family("ab", &[("a b", 3), ("all bets", 1)])).unwrap();
		assert_eq!(stats, MergeStats { inserted: 1, updated: 1, kept: 0 });
		assert_eq!(store.counts("ab", "a b"), Some((5, 1)));
		assert_eq!(store.counts("ab", "all bets"), Some((1, BASELINE_USED)));
	}

	#[test]
	fn usage_only_entries_stay_hidden() {
		let mut store = MemoryStore::new();
		store.record_uses(&[NGram::parse("close all tabs", DEFAULT_MAX_LEN).unwrap()]).unwrap();
		assert!(store.entries("cat").unwrap().is_empty());
		assert!(store.signatures().unwrap().is_empty());

		let stats = store.merge(&family("cat", &[("close all tabs", 4)])).unwrap();
		assert_eq!(stats.inserted, 1);
		assert_eq!(store.counts("cat", "close all tabs"), Some((4, BASELINE_USED + 1)));
		assert_eq!(store.signatures().unwrap(), vec!["cat".to_owned()]);
	}
}
