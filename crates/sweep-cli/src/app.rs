// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wiring from resolved configuration to the purge components.

use std::sync::Arc;

use chrono::Duration;
use sweep_config::SweepConfig;
use sweep_jobs::{ExecutionRecorder, OverdueMonitor};
use sweep_log::LogStore;
use sweep_notice::{FileDismissStore, NoticeSummarizer};
use sweep_strategy::{CliPurgeStrategy, ExecutionContext, PurgeStrategyChain};
use tracing::debug;

pub struct App {
	pub config: SweepConfig,
	pub log: Arc<LogStore>,
	pub recorder: Arc<ExecutionRecorder>,
}

impl App {
	/// Only the CLI strategy is available to a standalone process.
	pub fn build(config: SweepConfig) -> anyhow::Result<Self> {
		let timezone = config.site.tz()?;
		let context = ExecutionContext::detect(&config.cli.context_env);
		debug!(?context, "detected execution context");

		let chain = PurgeStrategyChain::new(context)
			.with_cli(Arc::new(CliPurgeStrategy::new(&config.cli, &config.site)));
		let log = Arc::new(LogStore::new(config.log.path.clone()));
		let recorder = Arc::new(ExecutionRecorder::new(Arc::new(chain), log.clone(), timezone));

		Ok(Self { config, log, recorder })
	}

	pub fn summarizer(&self) -> NoticeSummarizer {
		NoticeSummarizer::new(
			self.log.clone(),
			Arc::new(FileDismissStore::new(self.config.notice.state_path.clone())),
			self.config.schedule.hours.clone(),
			Duration::hours(i64::from(self.config.overdue.threshold_hours)),
		)
	}

	pub fn monitor(&self) -> OverdueMonitor {
		OverdueMonitor::from_config(self.recorder.clone(), &self.config.overdue)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use sweep_config::{SiteConfig, SweepConfigLayer};

	fn config_in(dir: &tempfile::TempDir) -> SweepConfig {
		let mut config = sweep_config::finalize(SweepConfigLayer::default()).unwrap();
		config.log.path = dir.path().join("purge.log").to_string_lossy().into_owned();
		config.notice.state_path = dir.path().join("notice.json").to_string_lossy().into_owned();
		config
	}

	#[test]
	fn rejects_unknown_timezone() {
		let dir = tempfile::tempdir().unwrap();
		let mut config = config_in(&dir);
		config.site = SiteConfig {
			root: "/".to_string(),
			timezone: "Mars/Olympus".to_string(),
		};
		assert!(App::build(config).is_err());
	}

	#[tokio::test]
	async fn summarizer_uses_configured_state_path() {
		let dir = tempfile::tempdir().unwrap();
		let app = App::build(config_in(&dir)).unwrap();

		let summarizer = app.summarizer();
		assert!(summarizer.render().await.is_some());
		summarizer.dismiss().await.unwrap();
		assert!(dir.path().join("notice.json").exists());
		assert!(app.summarizer().render().await.is_none());
	}
}
