// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Debug, Error)]
pub enum SchedulerError {
	#[error("hook {hook_id} has an interval shorter than 1 ms")]
	InvalidInterval { hook_id: String },

	#[error("trigger host error: {0}")]
	Host(String),
}
