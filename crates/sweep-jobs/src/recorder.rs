// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use chrono_tz::Tz;
use sweep_core::{LogEntry, PurgeAttempt, TriggerTag};
use sweep_log::LogStore;
use sweep_strategy::PurgeStrategyChain;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Runs the strategy chain once and writes exactly one log entry for it.
pub struct ExecutionRecorder {
	chain: Arc<PurgeStrategyChain>,
	log: Arc<LogStore>,
	timezone: Tz,
}

impl ExecutionRecorder {
	pub fn new(chain: Arc<PurgeStrategyChain>, log: Arc<LogStore>, timezone: Tz) -> Self {
		Self { chain, log, timezone }
	}

	pub fn chain(&self) -> &Arc<PurgeStrategyChain> {
		&self.chain
	}

	pub fn log(&self) -> &Arc<LogStore> {
		&self.log
	}

	/// The returned attempt reflects the purge, not whether the log write
	/// succeeded.
	#[instrument(skip(self, triggered_by), fields(triggered_by = %triggered_by))]
	pub async fn run(&self, triggered_by: &TriggerTag) -> PurgeAttempt {
		let id = Uuid::new_v4();
		let started_at = Utc::now();
		let timer = Instant::now();

		let outcome = self.chain.attempt_purge().await;

		let attempt = PurgeAttempt {
			id,
			triggered_by: triggered_by.to_string(),
			started_at,
			strategy_used: outcome.strategy_used,
			outcome: outcome.status,
			output: outcome.output,
			error: outcome.error,
			duration_secs: timer.elapsed().as_secs_f64(),
		};

		if attempt.is_success() {
			info!(
				attempt_id = %id,
				strategy = %attempt.strategy_used,
				duration_secs = attempt.duration_secs,
				"cache purge succeeded"
			);
		} else {
			warn!(
				attempt_id = %id,
				strategy = %attempt.strategy_used,
				error = %attempt.error,
				"cache purge failed"
			);
		}

		let entry = LogEntry::from_attempt(&attempt, self.timezone);
		if self.log.append(&entry).await.is_err() {
			warn!(attempt_id = %id, "purge outcome was not persisted");
		}

		attempt
	}
}
