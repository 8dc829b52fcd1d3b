//! The `acrostic` binary.

use anyhow::Result;
use clap::Parser;

use acrostic_cli::{Cli, Commands, commands};

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();
	let config = cli.load_config()?;

	match cli.command {
		Commands::Ingest(args) => commands::ingest::execute(args, &config),
		Commands::Compose(args) => commands::compose::execute(args, &config),
		Commands::Stats(args) => commands::stats::execute(args, &config),
	}
}
