// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the purge log store.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LogStoreError>;

#[derive(Debug, Error)]
pub enum LogStoreError {
	#[error("cannot resolve log path: {0}")]
	Path(#[from] sweep_config::ConfigError),

	#[error("{operation} failed for {path}: {source}")]
	Io {
		operation: &'static str,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("not writable: {0}")]
	NotWritable(PathBuf),

	#[error("not a directory: {0}")]
	NotADirectory(PathBuf),

	#[error("timed out waiting for the lock on {0}")]
	LockTimeout(PathBuf),
}

impl LogStoreError {
	pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			operation,
			path: path.into(),
			source,
		}
	}
}
