// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for core purge types.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur when converting core types.
#[derive(Debug, Error)]
pub enum CoreError {
	#[error("unknown purge status: {0}")]
	UnknownStatus(String),

	#[error("unknown strategy: {0}")]
	UnknownStrategy(String),

	#[error("invalid timestamp: {0}")]
	InvalidTimestamp(String),

	#[error("hour out of range: {0}")]
	HourOutOfRange(i64),
}
