// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health indicator derived from the purge log.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

use crate::attempt::PurgeStatus;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
	Healthy,
	Degraded,
	Unhealthy,
	/// Nothing logged yet.
	Unknown,
}

impl fmt::Display for HealthState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Healthy => write!(f, "healthy"),
			Self::Degraded => write!(f, "degraded"),
			Self::Unhealthy => write!(f, "unhealthy"),
			Self::Unknown => write!(f, "unknown"),
		}
	}
}

/// True when no success exists or the last one is strictly older than `threshold`.
pub fn is_overdue(last_success: Option<DateTime<Utc>>, now: DateTime<Utc>, threshold: Duration) -> bool {
	match last_success {
		None => true,
		Some(at) => now - at > threshold,
	}
}

pub fn determine_health(
	last_status: Option<PurgeStatus>,
	last_success: Option<DateTime<Utc>>,
	now: DateTime<Utc>,
	threshold: Duration,
) -> HealthState {
	let Some(last_status) = last_status else {
		return HealthState::Unknown;
	};

	if is_overdue(last_success, now, threshold) {
		return HealthState::Unhealthy;
	}

	match last_status {
		PurgeStatus::Success => HealthState::Healthy,
		PurgeStatus::Failure => HealthState::Degraded,
	}
}
