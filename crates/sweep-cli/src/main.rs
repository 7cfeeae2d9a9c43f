// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod app;
mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::App;
use commands::Commands;

#[derive(Debug, Parser)]
#[command(name = "sweep", version, about = "Scheduled cache purges with overdue fallback")]
struct Cli {
	/// Config file (defaults to /etc/sweep/sweep.toml)
	#[arg(long, global = true, env = "SWEEP_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let config = match &cli.config {
		Some(path) => sweep_config::load_config_with_file(path)?,
		None => sweep_config::load_config()?,
	};

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
		)
		.with_writer(std::io::stderr)
		.init();

	let app = App::build(config)?;
	commands::dispatch(cli.command, app).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn cli_definition_is_valid() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_subcommands() {
		let cli = Cli::try_parse_from(["sweep", "status", "--json"]).unwrap();
		assert!(matches!(cli.command, Commands::Status(ref args) if args.json));

		let cli = Cli::try_parse_from(["sweep", "--config", "/tmp/s.toml", "check-overdue"]).unwrap();
		assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.toml")));
		assert!(matches!(cli.command, Commands::CheckOverdue));

		let cli = Cli::try_parse_from(["sweep", "run", "--tag", "deploy"]).unwrap();
		assert!(matches!(cli.command, Commands::Run(ref args) if args.tag.as_deref() == Some("deploy")));
	}
}
