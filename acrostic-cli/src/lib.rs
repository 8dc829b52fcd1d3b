//! Command-line frontend for the acrostic engine.
//!
//! ## Commands
//!
//! - `acrostic ingest` - Feed text files (or wiki dumps) into the corpus
//! - `acrostic compose` - Compose and publish an acrostic
//! - `acrostic stats` - Inspect stored families
//!
//! Settings come from a JSON file (`--config`, or `ACROSTIC_CONFIG`); a
//! missing file means defaults.

pub mod commands;

use std::path::PathBuf;

use acrostic_core::config::AcrosticConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// Acrostic generator over harvested n-gram corpora.
#[derive(Debug, Parser)]
#[command(name = "acrostic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	/// Configuration file.
	#[arg(long, env = "ACROSTIC_CONFIG", default_value = "acrostic.json")]
	pub config: PathBuf,

	/// Overrides the storage directory of the configuration.
	#[arg(long)]
	pub storage_dir: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

impl Cli {
	/// Loads the configuration file and applies flag overrides.
	pub fn load_config(&self) -> Result<AcrosticConfig> {
		let mut config = AcrosticConfig::load(&self.config)
			.with_context(|| format!("Failed to load configuration from {}", self.config.display()))?;
		if let Some(dir) = &self.storage_dir {
			config.storage_dir = dir.clone();
		}
		Ok(config)
	}
}

#[derive(Debug, Subcommand)]
pub enum Commands {
	/// Extract n-grams from text files and merge them into the corpus.
	Ingest(commands::ingest::IngestArgs),
	/// Compose an acrostic for a target word.
	Compose(commands::compose::ComposeArgs),
	/// Show stored families.
	Stats(commands::stats::StatsArgs),
}
