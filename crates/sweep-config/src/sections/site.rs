// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Site identity section.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_root() -> String {
	"/".to_string()
}

fn default_timezone() -> String {
	"UTC".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SiteConfigLayer {
	pub root: Option<String>,
	pub timezone: Option<String>,
}

impl SiteConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.root.is_some() {
			self.root = other.root;
		}
		if other.timezone.is_some() {
			self.timezone = other.timezone;
		}
	}

	pub fn finalize(self) -> SiteConfig {
		SiteConfig {
			root: self.root.unwrap_or_else(default_root),
			timezone: self.timezone.unwrap_or_else(default_timezone),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
	/// Passed to the purge CLI as `--domain=<root>`.
	pub root: String,
	/// IANA timezone used for the local timestamp in log entries.
	pub timezone: String,
}

impl SiteConfig {
	pub fn tz(&self) -> Result<Tz, ConfigError> {
		self.timezone
			.parse()
			.map_err(|_| ConfigError::InvalidValue {
				key: "site.timezone".to_string(),
				message: format!("unknown timezone '{}'", self.timezone),
			})
	}
}

impl Default for SiteConfig {
	fn default() -> Self {
		Self {
			root: default_root(),
			timezone: default_timezone(),
		}
	}
}
