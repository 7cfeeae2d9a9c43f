// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! External purge CLI section.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_candidate_paths() -> Vec<String> {
	vec![
		"/usr/local/bin/wp".to_string(),
		"/usr/bin/wp".to_string(),
		"/opt/homebrew/bin/wp".to_string(),
	]
}

fn default_program() -> String {
	"wp".to_string()
}

fn default_success_markers() -> Vec<String> {
	vec!["success".to_string(), "purged".to_string()]
}

fn default_context_env() -> String {
	"WP_CLI".to_string()
}

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfigLayer {
	pub binary_path: Option<String>,
	pub candidate_paths: Option<Vec<String>>,
	pub program: Option<String>,
	pub timeout_secs: Option<u64>,
	pub success_markers: Option<Vec<String>>,
	pub context_env: Option<String>,
}

impl CliConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.binary_path.is_some() {
			self.binary_path = other.binary_path;
		}
		if other.candidate_paths.is_some() {
			self.candidate_paths = other.candidate_paths;
		}
		if other.program.is_some() {
			self.program = other.program;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.success_markers.is_some() {
			self.success_markers = other.success_markers;
		}
		if other.context_env.is_some() {
			self.context_env = other.context_env;
		}
	}

	pub fn finalize(self) -> CliConfig {
		CliConfig {
			binary_path: self.binary_path,
			candidate_paths: self.candidate_paths.unwrap_or_else(default_candidate_paths),
			program: self.program.unwrap_or_else(default_program),
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
			success_markers: self.success_markers.unwrap_or_else(default_success_markers),
			context_env: self.context_env.unwrap_or_else(default_context_env),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
	/// Explicit executable path; searched before anything else.
	pub binary_path: Option<String>,
	/// Well-known install locations, searched in order.
	pub candidate_paths: Vec<String>,
	/// Program name looked up on `PATH` as the last resort.
	pub program: String,
	pub timeout_secs: u64,
	/// Case-insensitive substrings that mark the CLI output as a success.
	pub success_markers: Vec<String>,
	/// Environment variable the CLI sets in processes it spawns.
	pub context_env: String,
}

impl CliConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

impl Default for CliConfig {
	fn default() -> Self {
		CliConfigLayer::default().finalize()
	}
}
