// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{
	CliConfigLayer, LogConfigLayer, LoggingConfigLayer, NoticeConfigLayer, OverdueConfigLayer,
	ScheduleConfigLayer, SiteConfigLayer,
};

/// Sweep configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SweepConfigLayer {
	#[serde(default)]
	pub schedule: Option<ScheduleConfigLayer>,
	#[serde(default)]
	pub log: Option<LogConfigLayer>,
	#[serde(default)]
	pub site: Option<SiteConfigLayer>,
	#[serde(default)]
	pub cli: Option<CliConfigLayer>,
	#[serde(default)]
	pub overdue: Option<OverdueConfigLayer>,
	#[serde(default)]
	pub notice: Option<NoticeConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl SweepConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: SweepConfigLayer) {
		merge_option(
			&mut self.schedule,
			other.schedule,
			ScheduleConfigLayer::merge,
		);
		merge_option(&mut self.log, other.log, LogConfigLayer::merge);
		merge_option(&mut self.site, other.site, SiteConfigLayer::merge);
		merge_option(&mut self.cli, other.cli, CliConfigLayer::merge);
		merge_option(&mut self.overdue, other.overdue, OverdueConfigLayer::merge);
		merge_option(&mut self.notice, other.notice, NoticeConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}
