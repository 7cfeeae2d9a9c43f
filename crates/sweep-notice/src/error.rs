// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NoticeError>;

#[derive(Debug, Error)]
pub enum NoticeError {
	#[error("cannot resolve notice state path: {0}")]
	Path(#[from] sweep_config::ConfigError),

	#[error("{operation} failed for {path}: {source}")]
	Io {
		operation: &'static str,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid notice state in {path}: {source}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
}
