use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AcrosticError, Result};
use crate::io;

/// File name of the ledger inside a storage directory.
pub const LEDGER_FILE: &str = "ledger.bin";

/// Persisted set of every composition already emitted.
///
/// Entries are stored lower-cased, so lookups are case-insensitive.
/// The set only grows; nothing here prunes it.
#[derive(Debug, Default)]
pub struct Ledger {
	entries: BTreeSet<String>,
	/// `None` for a ledger that is never written to disk.
	path: Option<PathBuf>,
}

impl Ledger {
	/// Loads the ledger from `path`, or starts an empty one if the file is absent.
	///
	/// Uses `postcard` for compact serialization.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref().to_path_buf();
		let entries = if path.exists() {
			let bytes = fs::read(&path)?;
			postcard::from_bytes(&bytes)?
		} else {
			BTreeSet::new()
		};
		Ok(Self { entries, path: Some(path) })
	}

	/// Opens `<dir>/ledger.bin`.
	pub fn open_in<P: AsRef<Path>>(dir: P) -> Result<Self> {
		Self::open(dir.as_ref().join(LEDGER_FILE))
	}

	pub fn in_memory() -> Self {
		Self::default()
	}

	pub fn contains(&self, rendered: &str) -> bool {
		self.entries.contains(&rendered.to_lowercase())
	}

	/// Adds a composition and persists the whole set.
	///
	/// Returns `false` if it was already present (nothing is written then).
	pub fn insert(&mut self, rendered: &str) -> Result<bool> {
		let key = rendered.to_lowercase();
		if !self.entries.insert(key.clone()) {
			return Ok(false);
		}
		if let Some(path) = &self.path {
			let written = postcard::to_stdvec(&self.entries)
				.map_err(AcrosticError::from)
				.and_then(|bytes| {
					io::replace_atomically(path, |out| {
						out.write_all(&bytes)?;
						Ok(())
					})
				});
			if let Err(e) = written {
				self.entries.remove(&key);
				return Err(e);
			}
		}
		Ok(true)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lookups_ignore_case() {
		let mut ledger = Ledger::in_memory();
		assert!(ledger.insert("Close\nAll\nTabs").unwrap());
		assert!(ledger.contains("close\nall\ntabs"));
		assert!(ledger.contains("CLOSE\nALL\nTABS"));
		assert!(!ledger.insert("close\nall\ntabs").unwrap());
		assert_eq!(ledger.len(), 1);
	}

	#[test]
	fn survives_reopen() {
		let dir = tempfile::tempdir().unwrap();
		{
			let mut ledger = Ledger::open_in(dir.path()).unwrap();
			ledger.insert("Catch\nA\nThief").unwrap();
		}
		let ledger = Ledger::open_in(dir.path()).unwrap();
		assert!(ledger.contains("catch\na\nthief"));
		assert_eq!(ledger.len(), 1);
	}
}
