// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use sweep_core::TriggerTag;
use sweep_jobs::{InProcessTriggerHost, OverdueCheck, Scheduler, SkipReason};
use tracing::{info, instrument, warn};

use crate::app::App;

#[derive(Debug, Subcommand)]
pub enum Commands {
	/// Purge now and record the outcome
	Run(RunArgs),
	/// Show the last purge and overall health
	Status(StatusArgs),
	/// Hide the status notice permanently
	Dismiss,
	/// Purge if the last success is older than the overdue threshold
	CheckOverdue,
	/// List the next scheduled purge for each configured hour
	Next,
	/// Run scheduled purges and overdue checks until interrupted
	Daemon(DaemonArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
	/// Value recorded in the log's TRIGGERED_BY field
	#[arg(long)]
	pub tag: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct StatusArgs {
	/// Print JSON instead of text
	#[arg(long)]
	pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct DaemonArgs {
	/// Seconds between trigger polls
	#[arg(long, default_value_t = 60)]
	pub poll_secs: u64,
}

pub async fn dispatch(command: Commands, app: App) -> anyhow::Result<()> {
	match command {
		Commands::Run(args) => handle_run(args, &app).await,
		Commands::Status(args) => handle_status(args, &app).await,
		Commands::Dismiss => handle_dismiss(&app).await,
		Commands::CheckOverdue => handle_check_overdue(&app).await,
		Commands::Next => handle_next(&app).await,
		Commands::Daemon(args) => handle_daemon(args, app).await,
	}
}

#[instrument(skip(app))]
async fn handle_run(args: RunArgs, app: &App) -> anyhow::Result<()> {
	let tag = match args.tag {
		Some(tag) => TriggerTag::Custom(tag),
		None => TriggerTag::Manual,
	};
	let attempt = app.recorder.run(&tag).await;

	println!(
		"{} via {} in {:.2}s",
		attempt.outcome, attempt.strategy_used, attempt.duration_secs
	);
	if !attempt.detail().is_empty() {
		println!("{}", attempt.detail());
	}

	if attempt.is_success() {
		Ok(())
	} else {
		anyhow::bail!("cache purge failed")
	}
}

async fn handle_status(args: StatusArgs, app: &App) -> anyhow::Result<()> {
	let Some(summary) = app.summarizer().render().await else {
		if args.json {
			println!("null");
		} else {
			println!("Notice dismissed.");
		}
		return Ok(());
	};

	if args.json {
		println!("{}", serde_json::to_string_pretty(&summary)?);
	} else {
		println!("{summary}");
	}
	Ok(())
}

async fn handle_dismiss(app: &App) -> anyhow::Result<()> {
	app.summarizer().dismiss().await?;
	println!("Notice dismissed.");
	Ok(())
}

async fn handle_check_overdue(app: &App) -> anyhow::Result<()> {
	match app.monitor().check().await {
		OverdueCheck::Skipped(SkipReason::CliContext) => println!("Skipped: running inside the CLI."),
		OverdueCheck::Skipped(SkipReason::RateLimited) => println!("Skipped: checked recently."),
		OverdueCheck::Skipped(SkipReason::BackingOff) => println!("Skipped: backing off after a failed purge."),
		OverdueCheck::Fresh { last_success } => println!("Last success at {last_success}, not overdue."),
		OverdueCheck::Triggered(attempt) => {
			println!("Overdue: purge {} via {}", attempt.outcome, attempt.strategy_used);
			if !attempt.is_success() {
				anyhow::bail!("overdue purge failed: {}", attempt.detail());
			}
		}
	}
	Ok(())
}

async fn handle_next(app: &App) -> anyhow::Result<()> {
	let host = Arc::new(InProcessTriggerHost::default());
	let scheduler = Scheduler::new(host, app.recorder.clone());
	let hours = &app.config.schedule.hours;

	let report = scheduler.register(hours).await;
	for hour in &report.skipped {
		println!("Skipped invalid hour {hour}");
	}
	for run in scheduler.next_runs(hours).await {
		if let Some(next_fire) = run.next_fire {
			println!("{}  {}", run.hook_id, next_fire.format("%Y-%m-%d %H:%M:%S UTC"));
		}
	}
	Ok(())
}

#[instrument(skip(app))]
async fn handle_daemon(args: DaemonArgs, app: App) -> anyhow::Result<()> {
	let host = Arc::new(InProcessTriggerHost::new(Duration::from_secs(args.poll_secs.max(1))));
	let scheduler = Scheduler::new(host.clone(), app.recorder.clone());

	let report = scheduler.register(&app.config.schedule.hours).await;
	info!(
		registered = ?report.registered,
		already_scheduled = ?report.already_scheduled,
		skipped = ?report.skipped,
		"daily purges registered"
	);
	if report.registered.is_empty() && report.already_scheduled.is_empty() {
		warn!("no valid schedule hours, relying on overdue checks only");
	}

	let host_task = tokio::spawn({
		let host = host.clone();
		async move { host.run().await }
	});

	let monitor = app.monitor();
	let mut overdue_tick = tokio::time::interval(app.config.overdue.check_interval().max(Duration::from_secs(1)));

	loop {
		tokio::select! {
			_ = overdue_tick.tick() => {
				monitor.check().await;
			}
			result = tokio::signal::ctrl_c() => {
				if let Err(e) = result {
					warn!(error = %e, "failed to listen for shutdown signal");
				}
				info!("shutdown requested");
				break;
			}
		}
	}

	host.shutdown();
	host_task.await?;
	Ok(())
}
