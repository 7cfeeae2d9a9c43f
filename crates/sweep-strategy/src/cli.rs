// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Purge through the external CLI: `<exe> edge-cache purge --domain=<root>`.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use sweep_config::{CliConfig, SiteConfig};
use sweep_core::StrategyKind;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::StrategyError;
use crate::locator::CliLocator;
use crate::strategy::PurgeStrategy;

pub struct CliPurgeStrategy {
	locator: CliLocator,
	site_root: String,
	timeout: Duration,
	success_markers: Vec<String>,
	context_env: String,
}

impl CliPurgeStrategy {
	pub fn new(cli: &CliConfig, site: &SiteConfig) -> Self {
		Self {
			locator: CliLocator::from_config(cli),
			site_root: site.root.clone(),
			timeout: cli.timeout(),
			success_markers: cli.success_markers.clone(),
			context_env: cli.context_env.clone(),
		}
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	fn args(&self) -> [String; 3] {
		[
			"edge-cache".to_string(),
			"purge".to_string(),
			format!("--domain={}", self.site_root),
		]
	}
}

#[async_trait]
impl PurgeStrategy for CliPurgeStrategy {
	fn kind(&self) -> StrategyKind {
		StrategyKind::CliSubprocess
	}

	#[instrument(skip(self), fields(site_root = %self.site_root))]
	async fn purge(&self) -> Result<String, StrategyError> {
		let exe = self.locator.locate().ok_or(StrategyError::CliNotFound)?;

		let mut cmd = Command::new(&exe);
		cmd.args(self.args())
			.env(&self.context_env, "1")
			.stdin(Stdio::null())
			.kill_on_drop(true);

		debug!(exe = %exe.display(), "running purge CLI");

		let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
			Ok(result) => result.map_err(|source| StrategyError::Spawn {
				path: exe.clone(),
				source,
			})?,
			Err(_) => {
				warn!(exe = %exe.display(), timeout_secs = self.timeout.as_secs(), "purge CLI timed out");
				return Err(StrategyError::Timeout(self.timeout));
			}
		};

		let combined = combine_output(&output.stdout, &output.stderr);
		if output_indicates_success(&combined, &self.success_markers) {
			Ok(combined)
		} else if combined.is_empty() {
			Err(StrategyError::Failed(format!("CLI exited with {} and no output", output.status)))
		} else {
			Err(StrategyError::Failed(combined))
		}
	}
}

/// stdout followed by stderr, each trimmed.
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
	let stdout = String::from_utf8_lossy(stdout);
	let stderr = String::from_utf8_lossy(stderr);
	[stdout.trim(), stderr.trim()]
		.into_iter()
		.filter(|s| !s.is_empty())
		.collect::<Vec<_>>()
		.join("\n")
}

/// Case-insensitive match of any non-blank marker.
pub fn output_indicates_success(output: &str, markers: &[String]) -> bool {
	let output = output.to_lowercase();
	markers
		.iter()
		.map(|m| m.trim().to_lowercase())
		.any(|m| !m.is_empty() && output.contains(&m))
}
