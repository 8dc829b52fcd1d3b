//! Compose command - draw an acrostic from the corpus.

use acrostic_core::compose::{Composer, Composition, PublishSink, StdoutSink};
use acrostic_core::config::AcrosticConfig;
use acrostic_core::store::{FileStore, Ledger};
use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the compose command.
#[derive(Debug, Args)]
pub struct ComposeArgs {
	/// Word whose letters the result spells.
	pub target: String,

	/// Print the result without recording usage or ledger entries.
	#[arg(long)]
	pub dry_run: bool,
}

fn composer(config: &AcrosticConfig) -> Result<Composer<FileStore>> {
	let store = FileStore::open(&config.storage_dir)
		.with_context(|| format!("Failed to open storage at {}", config.storage_dir.display()))?;
	let ledger = if config.dedupe {
		Ledger::open_in(&config.storage_dir)?
	} else {
		Ledger::in_memory()
	};
	Ok(Composer::new(store, ledger, config.into(), config.scorer.build())?)
}

/// Composes for `args.target` and hands the result to `sink`.
///
/// In dry-run mode the sink is bypassed and nothing is recorded.
pub fn run<P>(args: &ComposeArgs, config: &AcrosticConfig, sink: &mut P) -> Result<Composition>
where
	P: PublishSink + ?Sized,
{
	let mut composer = composer(config)?;
	if args.dry_run {
		return Ok(composer.compose(&args.target)?);
	}
	composer
		.compose_and_publish(&args.target, sink)
		.with_context(|| format!("Failed to compose '{}'", args.target))
}

/// Execute the compose command.
pub fn execute(args: ComposeArgs, config: &AcrosticConfig) -> Result<()> {
	let composition = run(&args, config, &mut StdoutSink)?;
	if args.dry_run {
		println!("{}", composition.rendered);
	}
	log::debug!("composed '{}' in {} attempt(s)", composition.target, composition.attempts);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn seeded_config() -> (tempfile::TempDir, AcrosticConfig) {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("3_cat.txt"), "close all tabs\t10\ncatch a thief\t5\n").unwrap();
		let config = AcrosticConfig { storage_dir: dir.path().to_path_buf(), ..AcrosticConfig::default() };
		(dir, config)
	}

	#[test]
	fn publishes_and_records() {
		let (dir, config) = seeded_config();
		let mut published = Vec::new();
		let mut sink = |rendered: &str| -> acrostic_core::Result<()> {
			published.push(rendered.to_owned());
			Ok(())
		};
		let args = ComposeArgs { target: "cat".into(), dry_run: false };

		let composition = run(&args, &config, &mut sink).unwrap();
		assert_eq!(composition.rendered, "Close\nAll\nTabs");
		assert_eq!(published, vec!["Close\nAll\nTabs".to_owned()]);
		assert!(Ledger::open_in(dir.path()).unwrap().contains("close\nall\ntabs"));

		// the only candidate is now a duplicate
		assert!(run(&args, &config, &mut |_: &str| -> acrostic_core::Result<()> { Ok(()) }).is_err());
	}

	#[test]
	fn dry_run_records_nothing() {
		let (dir, config) = seeded_config();
		let mut sink = |_: &str| -> acrostic_core::Result<()> { panic!("dry run must not publish") };
		let args = ComposeArgs { target: "cat".into(), dry_run: true };

		run(&args, &config, &mut sink).unwrap();
		run(&args, &config, &mut sink).unwrap();
		assert!(!dir.path().join("ledger.bin").exists());
	}
}
