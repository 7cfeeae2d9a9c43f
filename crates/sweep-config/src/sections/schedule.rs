// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Purge schedule section.

use serde::{Deserialize, Serialize};

fn default_hours() -> Vec<i64> {
	vec![10]
}

/// Schedule configuration layer (partial, for merging).
///
/// Hours stay signed; range checks happen per hour in the scheduler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScheduleConfigLayer {
	pub hours: Option<Vec<i64>>,
}

impl ScheduleConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.hours.is_some() {
			self.hours = other.hours;
		}
	}

	pub fn finalize(self) -> ScheduleConfig {
		ScheduleConfig {
			hours: self.hours.unwrap_or_else(default_hours),
		}
	}
}

/// UTC hours at which a daily purge fires. Immutable for the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleConfig {
	pub hours: Vec<i64>,
}

impl Default for ScheduleConfig {
	fn default() -> Self {
		Self {
			hours: default_hours(),
		}
	}
}
