// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration for the scheduled cache purge system.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`SWEEP_*`)
//! - `~` expansion for configured file paths
//!
//! # Usage
//!
//! ```ignore
//! use sweep_config::load_config;
//!
//! let config = load_config()?;
//! println!("purging daily at {:?} UTC", config.schedule.hours);
//! ```

pub mod error;
pub mod layer;
pub mod paths;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::SweepConfigLayer;
pub use paths::expand_home;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct SweepConfig {
	pub schedule: ScheduleConfig,
	pub log: LogConfig,
	pub site: SiteConfig,
	pub cli: CliConfig,
	pub overdue: OverdueConfig,
	pub notice: NoticeConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`SWEEP_*`)
/// 2. Config file (`/etc/sweep/sweep.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<SweepConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<SweepConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<SweepConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = SweepConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: SweepConfigLayer) -> Result<SweepConfig, ConfigError> {
	let schedule = layer.schedule.unwrap_or_default().finalize();
	let log = layer.log.unwrap_or_default().finalize();
	let site = layer.site.unwrap_or_default().finalize();
	let cli = layer.cli.unwrap_or_default().finalize();
	let overdue = layer.overdue.unwrap_or_default().finalize();
	let notice = layer.notice.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&site, &cli)?;

	info!(
		hours = ?schedule.hours,
		log_path = %log.path,
		site_root = %site.root,
		timezone = %site.timezone,
		cli_binary = ?cli.binary_path,
		overdue_threshold_hours = overdue.threshold_hours,
		"Sweep configuration loaded"
	);

	Ok(SweepConfig {
		schedule,
		log,
		site,
		cli,
		overdue,
		notice,
		logging,
	})
}

/// Validate cross-field configuration rules.
///
/// Schedule hours are range-checked per hour by the scheduler, not here.
fn validate_config(site: &SiteConfig, cli: &CliConfig) -> Result<(), ConfigError> {
	site.tz()?;

	if cli.timeout_secs == 0 {
		return Err(ConfigError::Validation(
			"cli.timeout_secs must be greater than zero".to_string(),
		));
	}

	if cli.success_markers.iter().all(|m| m.trim().is_empty()) {
		return Err(ConfigError::Validation(
			"cli.success_markers must contain at least one non-empty marker".to_string(),
		));
	}

	Ok(())
}
