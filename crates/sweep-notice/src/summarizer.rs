// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sweep_core::{determine_health, HealthState};
use sweep_log::LogStore;
use tracing::{instrument, warn};

use crate::dismiss::DismissStore;
use crate::error::Result;
use crate::summary::{schedule_text, LastRunSummary, Summary};

pub struct NoticeSummarizer {
	log: Arc<LogStore>,
	dismiss: Arc<dyn DismissStore>,
	hours: Vec<i64>,
	threshold: Duration,
}

impl NoticeSummarizer {
	pub fn new(log: Arc<LogStore>, dismiss: Arc<dyn DismissStore>, hours: Vec<i64>, threshold: Duration) -> Self {
		Self {
			log,
			dismiss,
			hours,
			threshold,
		}
	}

	pub async fn render(&self) -> Option<Summary> {
		self.render_at(Utc::now()).await
	}

	/// `None` once the notice has been dismissed.
	#[instrument(skip(self))]
	pub async fn render_at(&self, now: DateTime<Utc>) -> Option<Summary> {
		match self.dismiss.is_dismissed().await {
			Ok(true) => return None,
			Ok(false) => {}
			Err(e) => warn!(error = %e, "cannot read notice state, showing notice"),
		}

		let schedule = schedule_text(&self.hours);
		let Some(entry) = self.log.last_entry().await else {
			return Some(Summary {
				schedule,
				last_run: None,
				health: HealthState::Unknown,
			});
		};

		let last_success = self.log.last_success_timestamp().await;
		let health = determine_health(Some(entry.status), last_success, now, self.threshold);

		Some(Summary {
			schedule,
			last_run: Some(LastRunSummary::from(entry)),
			health,
		})
	}

	pub async fn dismiss(&self) -> Result<()> {
		self.dismiss.dismiss().await
	}
}
