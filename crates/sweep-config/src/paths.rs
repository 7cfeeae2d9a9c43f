// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Home-directory shorthand expansion for configured paths.

use std::path::PathBuf;

use crate::ConfigError;

/// Expand a leading `~` to the current user's home directory.
///
/// Only `~` on its own or followed by a separator is expanded; `~user` forms
/// and paths without a leading tilde are returned unchanged.
pub fn expand_home(path: &str) -> Result<PathBuf, ConfigError> {
	match path.strip_prefix('~') {
		Some("") => dirs::home_dir().ok_or(ConfigError::HomeDirNotFound),
		Some(rest) if rest.starts_with('/') || rest.starts_with(std::path::MAIN_SEPARATOR) => {
			let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
			Ok(home.join(rest.trim_start_matches(['/', std::path::MAIN_SEPARATOR])))
		}
		_ => Ok(PathBuf::from(path)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_expands_leading_tilde() {
		let home = dirs::home_dir().unwrap();
		let expanded = expand_home("~/logs/cache-purge.log").unwrap();
		assert_eq!(expanded, home.join("logs/cache-purge.log"));
	}

	#[test]
	fn test_bare_tilde_is_home() {
		let home = dirs::home_dir().unwrap();
		assert_eq!(expand_home("~").unwrap(), home);
	}

	#[test]
	fn test_absolute_path_unchanged() {
		assert_eq!(
			expand_home("/var/log/cache-purge.log").unwrap(),
			PathBuf::from("/var/log/cache-purge.log")
		);
	}

	#[test]
	fn test_tilde_user_form_unchanged() {
		assert_eq!(
			expand_home("~other/file.log").unwrap(),
			PathBuf::from("~other/file.log")
		);
	}
}
