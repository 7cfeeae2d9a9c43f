// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Overdue fallback section.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_THRESHOLD_HOURS: u32 = 25;
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OverdueConfigLayer {
	pub threshold_hours: Option<u32>,
	pub check_interval_secs: Option<u64>,
}

impl OverdueConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.threshold_hours.is_some() {
			self.threshold_hours = other.threshold_hours;
		}
		if other.check_interval_secs.is_some() {
			self.check_interval_secs = other.check_interval_secs;
		}
	}

	pub fn finalize(self) -> OverdueConfig {
		OverdueConfig {
			threshold_hours: self.threshold_hours.unwrap_or(DEFAULT_THRESHOLD_HOURS),
			check_interval_secs: self
				.check_interval_secs
				.unwrap_or(DEFAULT_CHECK_INTERVAL_SECS),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverdueConfig {
	/// A purge fires when the last success is strictly older than this.
	pub threshold_hours: u32,
	/// Minimum spacing between two overdue checks in one process.
	pub check_interval_secs: u64,
}

impl OverdueConfig {
	pub fn threshold(&self) -> Duration {
		Duration::from_secs(self.threshold_hours as u64 * 3600)
	}

	pub fn check_interval(&self) -> Duration {
		Duration::from_secs(self.check_interval_secs)
	}
}

impl Default for OverdueConfig {
	fn default() -> Self {
		Self {
			threshold_hours: DEFAULT_THRESHOLD_HOURS,
			check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
		}
	}
}
