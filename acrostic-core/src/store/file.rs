use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::{BASELINE_USED, Candidate, CorpusStore, MergeStats};
use crate::corpus::{InitialFamily, parse_line, serialize_line};
use crate::error::{AcrosticError, Result};
use crate::io::{self, COUNTS_EXTENSION, USED_EXTENSION};
use crate::ngram::NGram;

/// Flat-file store: one `<n>_<initials>.txt` per signature.
///
/// Each line is `<text>\t<count>\n`. Usage counts live in a sidecar
/// `<n>_<initials>.used` with the same line format.
///
/// Every rewrite goes through a temporary file in the same directory that is
/// renamed into place, so an interrupted merge leaves the previous file intact.
#[derive(Debug)]
pub struct FileStore {
	dir: PathBuf,
}

impl FileStore {
	/// Opens (and creates if needed) a store directory.
	///
	/// `"."` and `"./"` resolve to the current working directory.
	pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
		let dir = io::normalize_folder(dir);
		fs::create_dir_all(&dir)?;
		if !dir.is_dir() {
			return Err(AcrosticError::config(format!("expected a directory, got: {}", dir.display())));
		}
		Ok(Self { dir })
	}

	/// Path of the count file for a signature.
	pub fn family_path(&self, initials: &str) -> PathBuf {
		self.dir.join(io::family_file_name(initials, COUNTS_EXTENSION))
	}

	fn used_path(&self, initials: &str) -> PathBuf {
		self.dir.join(io::family_file_name(initials, USED_EXTENSION))
	}

	/// Reads every record of a line file (empty if the file does not exist).
	fn read_records(path: &Path) -> Result<Vec<(String, u64)>> {
		if !path.exists() {
			return Ok(Vec::new());
		}
		let reader = BufReader::new(File::open(path)?);
		let mut records = Vec::new();
		for line in reader.lines() {
			records.push(parse_line(&line?)?);
		}
		Ok(records)
	}

	fn read_used(&self, initials: &str) -> Result<HashMap<String, u64>> {
		Ok(Self::read_records(&self.used_path(initials))?.into_iter().collect())
	}
}

impl CorpusStore for FileStore {
	/// Streams the stored file into a fresh one.
	///
	/// - Stored texts absent from the buffer are copied unchanged
	/// - Stored texts present in the buffer get the sum of both counts
	/// - Remaining buffered texts are appended
	fn merge(&mut self, family: &InitialFamily) -> Result<MergeStats> {
		let mut stats = MergeStats::default();
		if family.is_empty() {
			return Ok(stats);
		}

		let path = self.family_path(family.initials());
		let mut pending: HashMap<&str, u64> = family.iter().collect();
		let existing = if path.exists() { Some(File::open(&path)?) } else { None };

		io::replace_atomically(&path, |out| {
			if let Some(file) = existing {
				for line in BufReader::new(file).lines() {
					let line = line?;
					let (text, count) = parse_line(&line)?;
					match pending.remove(text.as_str()) {
						Some(buffered) => {
							out.write_all(serialize_line(&text, count + buffered).as_bytes())?;
							stats.updated += 1;
						}
						None => {
							out.write_all(line.as_bytes())?;
							out.write_all(b"\n")?;
							stats.kept += 1;
						}
					}
				}
			}

			let mut fresh: Vec<(&str, u64)> = pending.drain().collect();
			fresh.sort_unstable();
			for (text, count) in fresh {
				out.write_all(serialize_line(text, count).as_bytes())?;
				stats.inserted += 1;
			}
			Ok(())
		})?;

		log::debug!(
			"merged '{}' into {}: {} new, {} updated, {} kept",
			family.initials(),
			path.display(),
			stats.inserted,
			stats.updated,
			stats.kept
		);
		Ok(stats)
	}

	fn entries(&self, initials: &str) -> Result<Vec<Candidate>> {
		let records = Self::read_records(&self.family_path(initials))?;
		if records.is_empty() {
			return Ok(Vec::new());
		}
		let used = self.read_used(initials)?;

		Ok(records
			.into_iter()
			.map(|(text, seen)| Candidate {
				used: used.get(&text).copied().unwrap_or(BASELINE_USED),
				initials: initials.to_owned(),
				text,
				seen,
			})
			.collect())
	}

	fn record_uses(&mut self, ngrams: &[NGram]) -> Result<()> {
		let mut by_initials: HashMap<&str, Vec<&str>> = HashMap::new();
		for ngram in ngrams {
			by_initials.entry(ngram.initials()).or_default().push(ngram.text());
		}

		for (initials, texts) in by_initials {
			let mut used: Vec<(String, u64)> = Self::read_records(&self.used_path(initials))?;
			let mut index: HashMap<String, usize> =
				used.iter().enumerate().map(|(i, (text, _))| (text.clone(), i)).collect();
			for text in texts {
				match index.get(text) {
					Some(&i) => used[i].1 += 1,
					None => {
						index.insert(text.to_owned(), used.len());
						used.push((text.to_owned(), BASELINE_USED + 1));
					}
				}
			}
			io::replace_atomically(self.used_path(initials), |out| {
				for (text, count) in &used {
					out.write_all(serialize_line(text, *count).as_bytes())?;
				}
				Ok(())
			})?;
		}
		Ok(())
	}

	fn signatures(&self) -> Result<Vec<String>> {
		io::list_files(&self.dir, COUNTS_EXTENSION)?
			.iter()
			.map(|name| io::parse_family_file_name(name, COUNTS_EXTENSION))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn family(initials: &str, entries: &[(&str, u64)]) -> InitialFamily {
		let mut family = InitialFamily::new(initials, 5).unwrap();
		for (text, count) in entries {
			family.add(&NGram::parse(text, 5).unwrap(), *count).unwrap();
		}
		family
	}

	#[test]
	fn first_merge_writes_fresh_file() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = FileStore::open(dir.path()).unwrap();
		let stats = store.merge(&family("cat", &[("close all tabs", 10), ("catch a thief", 5)])).unwrap();

		assert_eq!(stats, MergeStats { inserted: 2, updated: 0, kept: 0 });
		let content = fs::read_to_string(dir.path().join("3_cat.txt")).unwrap();
		assert_eq!(content, "catch a thief\t5\nclose all tabs\t10\n");
	}

	#[test]
	fn empty_family_touches_nothing() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = FileStore::open(dir.path()).unwrap();
		store.merge(&InitialFamily::new("cat", 5).unwrap()).unwrap();
		assert!(!store.family_path("cat").exists());
	}

	#[test]
	fn entries_default_used_to_baseline() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = FileStore::open(dir.path()).unwrap();
		store.merge(&family("ab", &[("a b", 2)])).unwrap();

		let entries = store.entries("ab").unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].seen, 2);
		assert_eq!(entries[0].used, BASELINE_USED);
		assert!(store.entries("zz").unwrap().is_empty());
	}

	#[test]
	fn record_uses_updates_sidecar() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = FileStore::open(dir.path()).unwrap();
		store.merge(&family("ab", &[("a b", 2), ("all bets", 1)])).unwrap();

		let ab = NGram::parse("a b", 5).unwrap();
		store.record_uses(&[ab.clone()]).unwrap();
		store.record_uses(&[ab.clone(), NGram::parse("all bets", 5).unwrap(), ab]).unwrap();

		let entries = store.entries("ab").unwrap();
		let used: HashMap<_, _> = entries.iter().map(|c| (c.text.as_str(), c.used)).collect();
		assert_eq!(used["a b"], 4);
		assert_eq!(used["all bets"], 2);
		// sidecar keeps first-use order, one line per text
		assert_eq!(
			fs::read_to_string(dir.path().join("2_ab.used")).unwrap(),
			"a b\t4\nall bets\t2\n"
		);
		// seen counts are never touched by usage
		assert_eq!(fs::read_to_string(store.family_path("ab")).unwrap(), "a b\t2\nall bets\t1\n");
	}

	#[test]
	fn sample_is_bounded() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = FileStore::open(dir.path()).unwrap();
		let texts: Vec<String> = (0..50).map(|i| format!("w{}", i)).collect();
		let entries: Vec<(&str, u64)> = texts.iter().map(|t| (t.as_str(), 1)).collect();
		store.merge(&family("w", &entries)).unwrap();

		let mut rng = StdRng::seed_from_u64(7);
		let sample = store.sample("w", 10, &mut rng).unwrap();
		assert_eq!(sample.len(), 10);
		assert_eq!(store.sample("w", 200, &mut rng).unwrap().len(), 50);
	}

	#[test]
	fn signatures_list_count_files_only() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = FileStore::open(dir.path()).unwrap();
		store.merge(&family("ab", &[("a b", 1)])).unwrap();
		store.merge(&family("c", &[("cat", 1)])).unwrap();
		store.record_uses(&[NGram::parse("cat", 5).unwrap()]).unwrap();

		assert_eq!(store.signatures().unwrap(), vec!["ab".to_owned(), "c".to_owned()]);

		fs::write(dir.path().join("notes.txt"), "hello").unwrap();
		assert!(matches!(store.signatures(), Err(AcrosticError::Format { .. })));
	}
}
