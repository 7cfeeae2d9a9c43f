// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use crate::error::{CoreError, Result};

/// Origin of a purge attempt. Rendered into the log's `TRIGGERED_BY` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriggerTag {
	/// Daily trigger registered for a UTC hour (0-23).
	ScheduledHour(u8),
	/// Out-of-band purge fired because no success was logged recently.
	OverdueFallback,
	/// Operator-initiated run.
	Manual,
	Custom(String),
}

impl TriggerTag {
	/// Tag for a scheduled hour, rejecting values outside 0-23.
	pub fn scheduled(hour: i64) -> Result<Self> {
		u8::try_from(hour)
			.ok()
			.filter(|h| *h <= 23)
			.map(Self::ScheduledHour)
			.ok_or(CoreError::HourOutOfRange(hour))
	}
}

impl fmt::Display for TriggerTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ScheduledHour(hour) => write!(f, "wp-cron-{hour}h-utc"),
			Self::OverdueFallback => write!(f, "overdue-fallback"),
			Self::Manual => write!(f, "manual"),
			Self::Custom(tag) => write!(f, "{tag}"),
		}
	}
}
