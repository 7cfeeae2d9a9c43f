// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Out-of-band purge when the log shows no recent success.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sweep_config::OverdueConfig;
use sweep_core::{is_overdue, PurgeAttempt, TriggerTag};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::recorder::ExecutionRecorder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	/// Running inside the external CLI.
	CliContext,
	/// Checked less than one check interval ago.
	RateLimited,
	/// The previous fallback failed and its backoff has not elapsed.
	BackingOff,
}

#[derive(Debug, Clone)]
pub enum OverdueCheck {
	Skipped(SkipReason),
	Fresh { last_success: DateTime<Utc> },
	Triggered(PurgeAttempt),
}

/// Cap on the doublings of the check interval between failed fallbacks.
const MAX_BACKOFF_DOUBLINGS: u32 = 6;

#[derive(Debug, Default)]
struct FallbackState {
	last_check: Option<DateTime<Utc>>,
	last_failure: Option<DateTime<Utc>>,
	consecutive_failures: u32,
}

pub struct OverdueMonitor {
	recorder: Arc<ExecutionRecorder>,
	threshold: Duration,
	check_interval: Duration,
	state: Mutex<FallbackState>,
}

impl OverdueMonitor {
	pub fn new(recorder: Arc<ExecutionRecorder>, threshold: Duration, check_interval: Duration) -> Self {
		Self {
			recorder,
			threshold,
			check_interval,
			state: Mutex::new(FallbackState::default()),
		}
	}

	pub fn from_config(recorder: Arc<ExecutionRecorder>, config: &OverdueConfig) -> Self {
		let threshold = Duration::from_std(config.threshold()).unwrap_or(Duration::MAX);
		let check_interval = Duration::from_std(config.check_interval()).unwrap_or(Duration::MAX);
		Self::new(recorder, threshold, check_interval)
	}

	pub async fn check(&self) -> OverdueCheck {
		self.check_at(Utc::now()).await
	}

	#[instrument(skip(self))]
	pub async fn check_at(&self, now: DateTime<Utc>) -> OverdueCheck {
		if self.recorder.chain().context().is_inside_cli() {
			return OverdueCheck::Skipped(SkipReason::CliContext);
		}

		let mut state = self.state.lock().await;
		if let Some(previous) = state.last_check {
			if now - previous < self.check_interval {
				return OverdueCheck::Skipped(SkipReason::RateLimited);
			}
		}
		state.last_check = Some(now);

		let last_success = self.recorder.log().last_success_timestamp().await;
		if !is_overdue(last_success, now, self.threshold) {
			if let Some(at) = last_success {
				debug!(last_success = %at, "last purge is recent");
				state.consecutive_failures = 0;
				state.last_failure = None;
				return OverdueCheck::Fresh { last_success: at };
			}
		}

		if let Some(failed_at) = state.last_failure {
			let backoff = self.backoff(state.consecutive_failures);
			if now - failed_at < backoff {
				debug!(
					consecutive_failures = state.consecutive_failures,
					backoff_secs = backoff.num_seconds(),
					"overdue fallback backing off"
				);
				return OverdueCheck::Skipped(SkipReason::BackingOff);
			}
		}

		warn!(
			last_success = ?last_success,
			threshold_hours = self.threshold.num_hours(),
			"cache purge overdue, running fallback"
		);
		let attempt = self.recorder.run(&TriggerTag::OverdueFallback).await;
		if attempt.is_success() {
			state.consecutive_failures = 0;
			state.last_failure = None;
		} else {
			state.consecutive_failures = state.consecutive_failures.saturating_add(1);
			state.last_failure = Some(now);
		}
		OverdueCheck::Triggered(attempt)
	}

	/// Check interval doubled once per consecutive failure, up to a cap.
	fn backoff(&self, failures: u32) -> Duration {
		let factor = 1_i32 << failures.min(MAX_BACKOFF_DOUBLINGS);
		self.check_interval.checked_mul(factor).unwrap_or(Duration::MAX)
	}
}
