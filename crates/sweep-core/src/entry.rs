// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persisted purge log entries.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::attempt::{PurgeAttempt, PurgeStatus};
use crate::error::{CoreError, Result};

/// Terminates every entry in the purge log.
pub const LOG_SEPARATOR: &str =
	"--------------------------------------------------------------------------------";

/// Format used for both the UTC and the local timestamp of an entry.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One record in the append-only purge log. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
	pub utc_timestamp: String,
	pub local_timestamp: String,
	/// IANA name of the site timezone: "Europe/Berlin"
	pub local_timezone_label: String,
	pub status: PurgeStatus,
	pub triggered_by: String,
	pub execution_time_seconds: f64,
	pub output: Option<String>,
	pub error: Option<String>,
}

impl LogEntry {
	/// Build the log record for a finished attempt, rendering local time in `timezone`.
	pub fn from_attempt(attempt: &PurgeAttempt, timezone: Tz) -> Self {
		let local = attempt.started_at.with_timezone(&timezone);
		Self {
			utc_timestamp: attempt.started_at.format(TIMESTAMP_FORMAT).to_string(),
			local_timestamp: local.format(TIMESTAMP_FORMAT).to_string(),
			local_timezone_label: timezone.name().to_string(),
			status: attempt.outcome,
			triggered_by: attempt.triggered_by.clone(),
			execution_time_seconds: attempt.duration_secs,
			output: non_empty(&attempt.output),
			error: non_empty(&attempt.error),
		}
	}

	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Parse the UTC timestamp field back into an instant.
	pub fn utc_datetime(&self) -> Result<DateTime<Utc>> {
		parse_utc_timestamp(&self.utc_timestamp)
	}
}

/// Parse a `YYYY-MM-DD HH:MM:SS` string as a UTC instant.
pub fn parse_utc_timestamp(value: &str) -> Result<DateTime<Utc>> {
	NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
		.map(|naive| naive.and_utc())
		.map_err(|_| CoreError::InvalidTimestamp(value.to_string()))
}

fn non_empty(value: &str) -> Option<String> {
	let trimmed = value.trim();
	if trimmed.is_empty() {
		None
	} else {
		Some(trimmed.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attempt::StrategyKind;
	use chrono::TimeZone;
	use uuid::Uuid;

	fn attempt_at(started_at: DateTime<Utc>) -> PurgeAttempt {
		PurgeAttempt {
			id: Uuid::new_v4(),
			triggered_by: "wp-cron-10h-utc".to_string(),
			started_at,
			strategy_used: StrategyKind::CliSubprocess,
			outcome: PurgeStatus::Success,
			output: "  Success: Purged all.\n".to_string(),
			error: "   ".to_string(),
			duration_secs: 1.234,
		}
	}

	#[test]
	fn from_attempt_renders_local_time_in_site_timezone() {
		let started = Utc.with_ymd_and_hms(2026, 1, 19, 10, 0, 5).unwrap();
		let entry = LogEntry::from_attempt(&attempt_at(started), chrono_tz::Australia::Sydney);

		assert_eq!(entry.utc_timestamp, "2026-01-19 10:00:05");
		// AEDT is UTC+11
		assert_eq!(entry.local_timestamp, "2026-01-19 21:00:05");
		assert_eq!(entry.local_timezone_label, "Australia/Sydney");
	}

	#[test]
	fn from_attempt_trims_output_and_drops_blank_error() {
		let started = Utc.with_ymd_and_hms(2026, 1, 19, 10, 0, 5).unwrap();
		let entry = LogEntry::from_attempt(&attempt_at(started), chrono_tz::UTC);

		assert_eq!(entry.output.as_deref(), Some("Success: Purged all."));
		assert!(entry.error.is_none());
	}

	#[test]
	fn utc_datetime_parses_back() {
		let started = Utc.with_ymd_and_hms(2026, 3, 1, 0, 30, 0).unwrap();
		let entry = LogEntry::from_attempt(&attempt_at(started), chrono_tz::UTC);
		assert_eq!(entry.utc_datetime().unwrap(), started);
	}

	#[test]
	fn parse_utc_timestamp_rejects_garbage() {
		assert!(parse_utc_timestamp("yesterday").is_err());
		assert!(parse_utc_timestamp("2026-13-01 00:00:00").is_err());
	}

	#[test]
	fn separator_is_eighty_dashes() {
		assert_eq!(LOG_SEPARATOR.len(), 80);
		assert!(LOG_SEPARATOR.chars().all(|c| c == '-'));
	}
}
