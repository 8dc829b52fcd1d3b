//! Configuration file loading (JSON).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AcrosticError, Result};

/// Which windows are taken out of each text unit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
	/// Every contiguous window of length 1..=L.
	#[default]
	All,
	/// Only windows ending at the last token.
	Suffixes,
}

/// Which fitness policy ranks candidates.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
	#[default]
	Popularity,
	Legacy,
}

/// Acrostic engine settings.
///
/// Every field has a default so partial files stay valid.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AcrosticConfig {
	/// Directory holding family files, usage sidecars and the ledger.
	#[serde(default = "default_storage_dir")]
	pub storage_dir: PathBuf,
	/// Maximum n-gram length (L).
	#[serde(default = "default_max_ngram_len")]
	pub max_ngram_len: usize,
	/// Buffered-new entries tolerated before a full flush.
	#[serde(default = "default_flush_threshold")]
	pub flush_threshold: usize,
	/// Candidates gathered per composition step.
	#[serde(default = "default_pool_size")]
	pub pool_size: usize,
	/// Composition attempts before giving up.
	#[serde(default = "default_max_attempts")]
	pub max_attempts: usize,
	/// Maximum rendered length, in characters.
	#[serde(default = "default_char_limit")]
	pub char_limit: usize,
	/// Separator placed between rendered tokens.
	#[serde(default = "default_separator")]
	pub separator: String,
	#[serde(default)]
	pub extraction: ExtractionMode,
	/// Keep a leading `#` on tag-like tokens.
	#[serde(default)]
	pub keep_tags: bool,
	/// Drop n-grams containing `http` while scraping.
	#[serde(default = "default_true")]
	pub exclude_urls: bool,
	/// Consult and update the dedupe ledger.
	#[serde(default = "default_true")]
	pub dedupe: bool,
	#[serde(default)]
	pub scorer: ScorerKind,
}

fn default_storage_dir() -> PathBuf {
	PathBuf::from("./corpus")
}

fn default_max_ngram_len() -> usize {
	5
}

fn default_flush_threshold() -> usize {
	100_000
}

fn default_pool_size() -> usize {
	200
}

fn default_max_attempts() -> usize {
	100
}

fn default_char_limit() -> usize {
	140
}

fn default_separator() -> String {
	"\n".to_owned()
}

fn default_true() -> bool {
	true
}

impl Default for AcrosticConfig {
	fn default() -> Self {
		Self {
			storage_dir: default_storage_dir(),
			max_ngram_len: default_max_ngram_len(),
			flush_threshold: default_flush_threshold(),
			pool_size: default_pool_size(),
			max_attempts: default_max_attempts(),
			char_limit: default_char_limit(),
			separator: default_separator(),
			extraction: ExtractionMode::default(),
			keep_tags: false,
			exclude_urls: true,
			dedupe: true,
			scorer: ScorerKind::default(),
		}
	}
}

impl AcrosticConfig {
	/// Loads a configuration file.
	///
	/// A missing file yields the defaults; an unreadable or malformed one is an error.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let config = match fs::read_to_string(path) {
			Ok(content) => serde_json::from_str(&content)
				.map_err(|e| AcrosticError::config(format!("{}: {}", path.display(), e)))?,
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				log::debug!("no configuration at {}, using defaults", path.display());
				Self::default()
			}
			Err(e) => return Err(e.into()),
		};
		config.validate()?;
		Ok(config)
	}

	/// Checks the tunables that the algorithms cannot work without.
	pub fn validate(&self) -> Result<()> {
		let checks = [
			(self.max_ngram_len, "max_ngram_len"),
			(self.flush_threshold, "flush_threshold"),
			(self.pool_size, "pool_size"),
			(self.max_attempts, "max_attempts"),
			(self.char_limit, "char_limit"),
		];
		for (value, name) in checks {
			if value == 0 {
				return Err(AcrosticError::config(format!("{} must be at least 1", name)));
			}
		}
		Ok(())
	}
}
