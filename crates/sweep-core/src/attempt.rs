// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Purge attempt types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

/// Outcome of a purge attempt, as persisted in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurgeStatus {
	Success,
	Failure,
}

impl PurgeStatus {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success)
	}
}

impl fmt::Display for PurgeStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Success => write!(f, "SUCCESS"),
			Self::Failure => write!(f, "FAILURE"),
		}
	}
}

impl FromStr for PurgeStatus {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"SUCCESS" => Ok(Self::Success),
			"FAILURE" => Ok(Self::Failure),
			_ => Err(CoreError::UnknownStatus(s.to_string())),
		}
	}
}

/// Which mechanism carried out (or last attempted) a purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
	/// In-process page cache object exposing a flush operation.
	CacheObjectFlush,
	/// In-process edge cache purge function.
	EdgeFunctionFlush,
	/// External CLI invoked as a subprocess.
	CliSubprocess,
	/// Local object cache flush, used when re-entered from the external CLI.
	ObjectCacheFlush,
	/// No strategy ran (guard rejected the call or nothing was available).
	None,
}

impl fmt::Display for StrategyKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CacheObjectFlush => write!(f, "cache-object-flush"),
			Self::EdgeFunctionFlush => write!(f, "edge-function-flush"),
			Self::CliSubprocess => write!(f, "cli-subprocess"),
			Self::ObjectCacheFlush => write!(f, "object-cache-flush"),
			Self::None => write!(f, "none"),
		}
	}
}

impl FromStr for StrategyKind {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"cache-object-flush" => Ok(Self::CacheObjectFlush),
			"edge-function-flush" => Ok(Self::EdgeFunctionFlush),
			"cli-subprocess" => Ok(Self::CliSubprocess),
			"object-cache-flush" => Ok(Self::ObjectCacheFlush),
			"none" => Ok(Self::None),
			_ => Err(CoreError::UnknownStrategy(s.to_string())),
		}
	}
}

/// A single purge invocation, from start to recorded outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeAttempt {
	/// Correlates tracing events for one attempt; never persisted to the log.
	pub id: Uuid,
	pub triggered_by: String,
	pub started_at: DateTime<Utc>,
	pub strategy_used: StrategyKind,
	pub outcome: PurgeStatus,
	pub output: String,
	pub error: String,
	/// Elapsed wall-clock seconds.
	pub duration_secs: f64,
}

impl PurgeAttempt {
	pub fn is_success(&self) -> bool {
		self.outcome.is_success()
	}

	/// Free-text detail: the error for failures, the captured output otherwise.
	pub fn detail(&self) -> &str {
		match self.outcome {
			PurgeStatus::Failure if !self.error.is_empty() => &self.error,
			_ => &self.output,
		}
	}
}
