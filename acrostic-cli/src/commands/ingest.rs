//! Ingest command - fill the corpus from text files.

use std::path::PathBuf;

use acrostic_core::config::AcrosticConfig;
use acrostic_core::corpus::{Corpus, FlushStats, IngestStats, TargetFilter};
use acrostic_core::source::{LineSource, WikipediaDump};
use acrostic_core::store::FileStore;
use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the ingest command.
#[derive(Debug, Args)]
pub struct IngestArgs {
	/// Files to read, in order.
	#[arg(required = true)]
	pub files: Vec<PathBuf>,

	/// Read MediaWiki XML exports (one unit per page) instead of plain lines.
	#[arg(long)]
	pub wikipedia: bool,

	/// Only keep n-grams usable for this target word.
	#[arg(long)]
	pub target: Option<String>,
}

/// What one ingest run did.
#[derive(Debug, Default)]
pub struct IngestSummary {
	pub read: IngestStats,
	pub flushed: FlushStats,
}

/// Drains every file into a corpus over the configured store, then flushes.
pub fn run(args: &IngestArgs, config: &AcrosticConfig) -> Result<IngestSummary> {
	let store = FileStore::open(&config.storage_dir)
		.with_context(|| format!("Failed to open storage at {}", config.storage_dir.display()))?;
	let mut corpus = Corpus::new(store, config.into())?;
	if let Some(target) = &args.target {
		corpus = corpus.with_filter(TargetFilter::new(target, config.exclude_urls));
	}

	let mut summary = IngestSummary::default();
	for path in &args.files {
		log::info!("reading {}", path.display());
		let stats = if args.wikipedia {
			corpus.ingest(WikipediaDump::open(path)?)
		} else {
			corpus.ingest(LineSource::open(path)?)
		}
		.with_context(|| format!("Failed to ingest {}", path.display()))?;
		summary.read.units += stats.units;
		summary.read.ngrams += stats.ngrams;
	}

	summary.flushed = corpus.finish()?;
	Ok(summary)
}

/// Execute the ingest command.
pub fn execute(args: IngestArgs, config: &AcrosticConfig) -> Result<()> {
	let summary = run(&args, config)?;
	println!(
		"{} units, {} n-grams; {} new texts, {} updated",
		summary.read.units, summary.read.ngrams, summary.flushed.merged.inserted, summary.flushed.merged.updated
	);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use acrostic_core::store::CorpusStore;
	use std::fs;

	#[test]
	fn ingest_writes_family_files() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("input.txt");
		fs::write(&input, "Close all tabs\n\nCatch a thief\n").unwrap();
		let config = AcrosticConfig { storage_dir: dir.path().join("corpus"), ..AcrosticConfig::default() };
		let args = IngestArgs { files: vec![input], wikipedia: false, target: Some("cat".into()) };

		let summary = run(&args, &config).unwrap();
		assert_eq!(summary.read.units, 2);

		let store = FileStore::open(&config.storage_dir).unwrap();
		let texts: Vec<String> = store.entries("cat").unwrap().into_iter().map(|c| c.text).collect();
		assert_eq!(texts, vec!["close all tabs"]);
	}

	#[test]
	fn missing_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let config = AcrosticConfig { storage_dir: dir.path().to_path_buf(), ..AcrosticConfig::default() };
		let args = IngestArgs { files: vec![dir.path().join("absent.txt")], wikipedia: false, target: None };
		assert!(run(&args, &config).is_err());
	}
}
