// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StrategyError>;

#[derive(Debug, Error)]
pub enum StrategyError {
	#[error("strategy unavailable: {0}")]
	Unavailable(String),

	#[error("purge failed: {0}")]
	Failed(String),

	#[error("CLI not found")]
	CliNotFound,

	#[error("cannot recurse: running inside the CLI and no object cache is available")]
	CannotRecurse,

	#[error("CLI timed out after {}s", .0.as_secs())]
	Timeout(Duration),

	#[error("failed to spawn {path}: {source}")]
	Spawn {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("purge already in progress")]
	AlreadyInProgress,

	#[error("strategy panicked: {0}")]
	Panicked(String),
}
