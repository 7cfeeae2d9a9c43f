// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Purge log file section.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
	"~/logs/cache-purge.log".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogConfigLayer {
	pub path: Option<String>,
}

impl LogConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.path.is_some() {
			self.path = other.path;
		}
	}

	pub fn finalize(self) -> LogConfig {
		LogConfig {
			path: self.path.unwrap_or_else(default_path),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
	/// May start with `~`; expanded when the log is opened.
	pub path: String,
}

impl Default for LogConfig {
	fn default() -> Self {
		Self {
			path: default_path(),
		}
	}
}
