// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator notice section.

use serde::{Deserialize, Serialize};

fn default_state_path() -> String {
	"~/.local/state/sweep/notice.json".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NoticeConfigLayer {
	pub state_path: Option<String>,
}

impl NoticeConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.state_path.is_some() {
			self.state_path = other.state_path;
		}
	}

	pub fn finalize(self) -> NoticeConfig {
		NoticeConfig {
			state_path: self.state_path.unwrap_or_else(default_state_path),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoticeConfig {
	/// Where the dismissed flag is persisted.
	pub state_path: String,
}

impl Default for NoticeConfig {
	fn default() -> Self {
		Self {
			state_path: default_state_path(),
		}
	}
}
