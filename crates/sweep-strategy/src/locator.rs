// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Finds the external purge CLI executable.

use std::path::{Path, PathBuf};

use sweep_config::CliConfig;
use tracing::{debug, trace, warn};

/// Search order: configured path, then fixed candidates, then `PATH`.
#[derive(Debug, Clone)]
pub struct CliLocator {
	binary_path: Option<String>,
	candidate_paths: Vec<String>,
	program: String,
}

impl CliLocator {
	pub fn new(binary_path: Option<String>, candidate_paths: Vec<String>, program: impl Into<String>) -> Self {
		Self {
			binary_path,
			candidate_paths,
			program: program.into(),
		}
	}

	pub fn from_config(config: &CliConfig) -> Self {
		Self::new(
			config.binary_path.clone(),
			config.candidate_paths.clone(),
			config.program.clone(),
		)
	}

	pub fn locate(&self) -> Option<PathBuf> {
		if let Some(configured) = &self.binary_path {
			match resolve(configured) {
				Some(path) => return Some(path),
				None => warn!(path = %configured, "configured CLI path is not executable"),
			}
		}

		for candidate in &self.candidate_paths {
			if let Some(path) = resolve(candidate) {
				debug!(path = %path.display(), "found CLI at candidate path");
				return Some(path);
			}
		}

		match which::which(&self.program) {
			Ok(path) => {
				debug!(path = %path.display(), "found CLI on PATH");
				Some(path)
			}
			Err(e) => {
				trace!(program = %self.program, error = %e, "CLI not on PATH");
				None
			}
		}
	}
}

fn resolve(raw: &str) -> Option<PathBuf> {
	let path = sweep_config::expand_home(raw).ok()?;
	is_executable(&path).then_some(path)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
	use std::os::unix::fs::PermissionsExt;
	std::fs::metadata(path)
		.map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
		.unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
	path.is_file()
}
