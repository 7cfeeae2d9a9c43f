// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::SweepConfigLayer;
use crate::sections::{
	CliConfigLayer, LogConfigLayer, LoggingConfigLayer, NoticeConfigLayer, OverdueConfigLayer,
	ScheduleConfigLayer, SiteConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<SweepConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<SweepConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(SweepConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/sweep/sweep.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<SweepConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(SweepConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: SweepConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: SWEEP_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<SweepConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(SweepConfigLayer {
			schedule: Some(load_schedule_from_env()?),
			log: Some(load_log_from_env()),
			site: Some(load_site_from_env()),
			cli: Some(load_cli_from_env()?),
			overdue: Some(load_overdue_from_env()?),
			notice: Some(load_notice_from_env()),
			logging: Some(load_logging_from_env()),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_u32(name: &str) -> Result<Option<u32>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u32 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_list(name: &str) -> Option<Vec<String>> {
	env_var(name).map(|s| {
		s.split(',')
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty())
			.collect()
	})
}

fn load_schedule_from_env() -> Result<ScheduleConfigLayer, ConfigError> {
	let hours = match env_list("SWEEP_SCHEDULE_HOURS") {
		Some(values) => Some(
			values
				.iter()
				.map(|v| {
					v.parse::<i64>().map_err(|_| ConfigError::InvalidValue {
						key: "SWEEP_SCHEDULE_HOURS".to_string(),
						message: format!("invalid hour '{v}'"),
					})
				})
				.collect::<Result<Vec<_>, _>>()?,
		),
		None => None,
	};

	Ok(ScheduleConfigLayer { hours })
}

fn load_log_from_env() -> LogConfigLayer {
	LogConfigLayer {
		path: env_var("SWEEP_LOG_PATH"),
	}
}

fn load_site_from_env() -> SiteConfigLayer {
	SiteConfigLayer {
		root: env_var("SWEEP_SITE_ROOT"),
		timezone: env_var("SWEEP_SITE_TIMEZONE"),
	}
}

fn load_cli_from_env() -> Result<CliConfigLayer, ConfigError> {
	Ok(CliConfigLayer {
		binary_path: env_var("SWEEP_CLI_BINARY_PATH"),
		candidate_paths: env_list("SWEEP_CLI_CANDIDATE_PATHS"),
		program: env_var("SWEEP_CLI_PROGRAM"),
		timeout_secs: env_u64("SWEEP_CLI_TIMEOUT_SECS")?,
		success_markers: env_list("SWEEP_CLI_SUCCESS_MARKERS"),
		context_env: env_var("SWEEP_CLI_CONTEXT_ENV"),
	})
}

fn load_overdue_from_env() -> Result<OverdueConfigLayer, ConfigError> {
	Ok(OverdueConfigLayer {
		threshold_hours: env_u32("SWEEP_OVERDUE_THRESHOLD_HOURS")?,
		check_interval_secs: env_u64("SWEEP_OVERDUE_CHECK_INTERVAL_SECS")?,
	})
}

fn load_notice_from_env() -> NoticeConfigLayer {
	NoticeConfigLayer {
		state_path: env_var("SWEEP_NOTICE_STATE_PATH"),
	}
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("SWEEP_LOG_LEVEL"),
	}
}
