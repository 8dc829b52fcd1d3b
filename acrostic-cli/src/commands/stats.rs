//! Stats command - inspect stored families.

use acrostic_core::config::AcrosticConfig;
use acrostic_core::store::{Candidate, CorpusStore, FileStore};
use anyhow::Result;
use clap::Args;

/// Arguments for the stats command.
#[derive(Debug, Args)]
pub struct StatsArgs {
	/// Show the most frequent texts of one signature instead of the overview.
	#[arg(long)]
	pub initials: Option<String>,

	/// Number of texts shown with `--initials`.
	#[arg(long, default_value = "20")]
	pub limit: usize,
}

/// One line of the overview.
#[derive(Debug, PartialEq, Eq)]
pub struct FamilySummary {
	pub initials: String,
	pub texts: usize,
	pub seen: u64,
}

/// Every stored signature with its text count and total occurrences.
pub fn overview<S: CorpusStore>(store: &S) -> Result<Vec<FamilySummary>> {
	let mut summaries = Vec::new();
	for initials in store.signatures()? {
		let entries = store.entries(&initials)?;
		summaries.push(FamilySummary {
			texts: entries.len(),
			seen: entries.iter().map(|c| c.seen).sum(),
			initials,
		});
	}
	Ok(summaries)
}

/// The `limit` most seen texts of a signature, ties broken alphabetically.
pub fn top<S: CorpusStore>(store: &S, initials: &str, limit: usize) -> Result<Vec<Candidate>> {
	let mut entries = store.entries(&initials.to_lowercase())?;
	entries.sort_by(|a, b| b.seen.cmp(&a.seen).then_with(|| a.text.cmp(&b.text)));
	entries.truncate(limit);
	Ok(entries)
}

/// Execute the stats command.
pub fn execute(args: StatsArgs, config: &AcrosticConfig) -> Result<()> {
	let store = FileStore::open(&config.storage_dir)?;

	match &args.initials {
		Some(initials) => {
			for candidate in top(&store, initials, args.limit)? {
				println!("{}\tseen {}\tused {}", candidate.text, candidate.seen, candidate.used);
			}
		}
		None => {
			let summaries = overview(&store)?;
			if summaries.is_empty() {
				println!("No families stored in {}", config.storage_dir.display());
				return Ok(());
			}
			for summary in &summaries {
				println!("{}\t{} texts\t{} occurrences", summary.initials, summary.texts, summary.seen);
			}
		}
	}
	Ok(())
}
