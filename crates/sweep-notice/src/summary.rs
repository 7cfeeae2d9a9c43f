// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use sweep_core::{HealthState, LogEntry, PurgeStatus};

/// "Scheduled daily at 03:00, 10:00 UTC". Invalid hours are left out.
pub fn schedule_text(hours: &[i64]) -> String {
	let valid: BTreeSet<i64> = hours.iter().copied().filter(|h| (0..=23).contains(h)).collect();
	if valid.is_empty() {
		return "No valid schedule hours configured".to_string();
	}
	let times: Vec<String> = valid.iter().map(|h| format!("{h:02}:00")).collect();
	format!("Scheduled daily at {} UTC", times.join(", "))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastRunSummary {
	pub utc_timestamp: String,
	pub local_timestamp: String,
	pub timezone: String,
	pub status: PurgeStatus,
	pub triggered_by: String,
	pub execution_time_seconds: f64,
	/// Only set for failures.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl From<LogEntry> for LastRunSummary {
	fn from(entry: LogEntry) -> Self {
		let error = match entry.status {
			PurgeStatus::Failure => entry.error,
			PurgeStatus::Success => None,
		};
		Self {
			utc_timestamp: entry.utc_timestamp,
			local_timestamp: entry.local_timestamp,
			timezone: entry.local_timezone_label,
			status: entry.status,
			triggered_by: entry.triggered_by,
			execution_time_seconds: entry.execution_time_seconds,
			error,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
	pub schedule: String,
	pub last_run: Option<LastRunSummary>,
	pub health: HealthState,
}

impl fmt::Display for Summary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Cache purge: {}", self.schedule)?;
		let Some(run) = &self.last_run else {
			return write!(f, "No purge has run yet.");
		};
		writeln!(
			f,
			"Last run: {} UTC ({} {})",
			run.utc_timestamp, run.local_timestamp, run.timezone
		)?;
		writeln!(
			f,
			"Status: {} (triggered by {}, {:.2}s)",
			run.status, run.triggered_by, run.execution_time_seconds
		)?;
		if let Some(error) = &run.error {
			writeln!(f, "Error: {error}")?;
		}
		write!(f, "Health: {}", self.health)
	}
}
