// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Daily purge triggers, one per configured UTC hour.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use sweep_core::TriggerTag;
use tracing::{debug, info, instrument, warn};

use crate::host::{TriggerHandler, TriggerHost};
use crate::recorder::ExecutionRecorder;

/// Hook id for the daily trigger at `hour` UTC.
pub fn hook_id(hour: u8) -> String {
	format!("sweep_purge_{hour:02}h_utc")
}

/// First instant strictly after `now` at `hour`:00:00 UTC.
pub fn next_occurrence(hour: u8, now: DateTime<Utc>) -> DateTime<Utc> {
	let time = NaiveTime::from_hms_opt(u32::from(hour.min(23)), 0, 0).unwrap_or(NaiveTime::MIN);
	let today = now.date_naive().and_time(time).and_utc();
	if today > now {
		today
	} else {
		today + Duration::days(1)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
	pub registered: Vec<u8>,
	pub already_scheduled: Vec<u8>,
	/// Out-of-range hours and hours the host refused.
	pub skipped: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledRun {
	pub hour: u8,
	pub hook_id: String,
	pub next_fire: Option<DateTime<Utc>>,
}

/// Runs a purge tagged with the hook's hour.
pub struct HourlyPurgeHandler {
	recorder: Arc<ExecutionRecorder>,
	tag: TriggerTag,
}

#[async_trait]
impl TriggerHandler for HourlyPurgeHandler {
	async fn fire(&self, hook_id: &str) {
		debug!(hook_id, tag = %self.tag, "scheduled purge fired");
		self.recorder.run(&self.tag).await;
	}
}

pub struct Scheduler {
	host: Arc<dyn TriggerHost>,
	recorder: Arc<ExecutionRecorder>,
}

impl Scheduler {
	pub fn new(host: Arc<dyn TriggerHost>, recorder: Arc<ExecutionRecorder>) -> Self {
		Self { host, recorder }
	}

	pub async fn register(&self, hours: &[i64]) -> RegistrationReport {
		self.register_at(hours, Utc::now()).await
	}

	/// Register one daily hook per distinct valid hour. Hooks that already
	/// have a next fire time are left alone.
	#[instrument(skip(self))]
	pub async fn register_at(&self, hours: &[i64], now: DateTime<Utc>) -> RegistrationReport {
		let mut report = RegistrationReport::default();
		let distinct: BTreeSet<i64> = hours.iter().copied().collect();

		for raw in distinct {
			let tag = match TriggerTag::scheduled(raw) {
				Ok(tag) => tag,
				Err(e) => {
					warn!(hour = raw, error = %e, "skipping invalid schedule hour");
					report.skipped.push(raw);
					continue;
				}
			};
			let TriggerTag::ScheduledHour(hour) = tag else {
				continue;
			};
			let hook_id = hook_id(hour);

			self.host
				.bind(
					&hook_id,
					Arc::new(HourlyPurgeHandler {
						recorder: Arc::clone(&self.recorder),
						tag,
					}),
				)
				.await;

			if let Some(next_fire) = self.host.query(&hook_id).await {
				debug!(hook_id = %hook_id, %next_fire, "hook already scheduled");
				report.already_scheduled.push(hour);
				continue;
			}

			let first_fire = next_occurrence(hour, now);
			match self.host.register(&hook_id, first_fire, Duration::days(1)).await {
				Ok(()) => {
					info!(hook_id = %hook_id, hour, %first_fire, "registered daily purge");
					report.registered.push(hour);
				}
				Err(e) => {
					warn!(hook_id = %hook_id, hour, error = %e, "failed to register daily purge");
					report.skipped.push(raw);
				}
			}
		}

		report
	}

	/// Remove the hooks for `hours`, returning the hours that had one.
	#[instrument(skip(self))]
	pub async fn unregister(&self, hours: &[i64]) -> Vec<u8> {
		let mut removed = Vec::new();
		let distinct: BTreeSet<i64> = hours.iter().copied().collect();
		for raw in distinct {
			let Ok(TriggerTag::ScheduledHour(hour)) = TriggerTag::scheduled(raw) else {
				continue;
			};
			match self.host.unregister(&hook_id(hour)).await {
				Ok(true) => {
					info!(hour, "unregistered daily purge");
					removed.push(hour);
				}
				Ok(false) => {}
				Err(e) => warn!(hour, error = %e, "failed to unregister daily purge"),
			}
		}
		removed
	}

	/// Next fire time for each valid configured hour, in hour order.
	pub async fn next_runs(&self, hours: &[i64]) -> Vec<ScheduledRun> {
		let mut runs = Vec::new();
		let distinct: BTreeSet<i64> = hours.iter().copied().collect();
		for raw in distinct {
			let Ok(TriggerTag::ScheduledHour(hour)) = TriggerTag::scheduled(raw) else {
				continue;
			};
			let hook_id = hook_id(hour);
			let next_fire = self.host.query(&hook_id).await;
			runs.push(ScheduledRun {
				hour,
				hook_id,
				next_fire,
			});
		}
		runs
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::host::InProcessTriggerHost;
	use chrono::{TimeZone, Timelike};
	use proptest::prelude::*;
	use sweep_log::LogStore;
	use sweep_strategy::{ExecutionContext, PurgeStrategyChain};

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2026, 1, 19, 10, 30, 0).unwrap()
	}

	fn scheduler(dir: &tempfile::TempDir) -> (Scheduler, Arc<InProcessTriggerHost>) {
		let host = Arc::new(InProcessTriggerHost::default());
		let chain = PurgeStrategyChain::new(ExecutionContext::Standalone);
		let log = LogStore::new(dir.path().join("purge.log").to_string_lossy().into_owned());
		let recorder = ExecutionRecorder::new(Arc::new(chain), Arc::new(log), chrono_tz::UTC);
		(Scheduler::new(host.clone(), Arc::new(recorder)), host)
	}

	#[test]
	fn hook_ids_are_zero_padded() {
		assert_eq!(hook_id(3), "sweep_purge_03h_utc");
		assert_eq!(hook_id(23), "sweep_purge_23h_utc");
	}

	#[test]
	fn next_occurrence_today_or_tomorrow() {
		assert_eq!(
			next_occurrence(11, now()),
			Utc.with_ymd_and_hms(2026, 1, 19, 11, 0, 0).unwrap()
		);
		assert_eq!(
			next_occurrence(10, now()),
			Utc.with_ymd_and_hms(2026, 1, 20, 10, 0, 0).unwrap()
		);
		let exactly = Utc.with_ymd_and_hms(2026, 1, 19, 3, 0, 0).unwrap();
		assert_eq!(next_occurrence(3, exactly), exactly + Duration::days(1));
	}

	proptest! {
		#[test]
		fn next_occurrence_is_within_a_day(hour in 0u8..24, secs in 0i64..86_400 * 365) {
			let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs);
			let next = next_occurrence(hour, now);
			prop_assert!(next > now);
			prop_assert!(next - now <= Duration::days(1));
			prop_assert_eq!(next.hour(), u32::from(hour));
			prop_assert_eq!(next.minute(), 0);
			prop_assert_eq!(next.second(), 0);
		}
	}

	#[tokio::test]
	async fn every_valid_hour_registers_once() {
		let dir = tempfile::tempdir().unwrap();
		let (scheduler, host) = scheduler(&dir);
		let hours: Vec<i64> = (0..24).collect();

		let first = scheduler.register_at(&hours, now()).await;
		assert_eq!(first.registered.len(), 24);
		assert!(first.skipped.is_empty());

		for hour in 0..24u8 {
			let next = host.query(&hook_id(hour)).await.unwrap();
			assert!(next > now());
			assert_eq!(next, next_occurrence(hour, now()));
		}

		let second = scheduler.register_at(&hours, now()).await;
		assert!(second.registered.is_empty());
		assert_eq!(second.already_scheduled.len(), 24);
	}

	#[tokio::test]
	async fn out_of_range_hours_are_skipped() {
		let dir = tempfile::tempdir().unwrap();
		let (scheduler, host) = scheduler(&dir);

		let report = scheduler.register_at(&[-1, 3, 24, 3, 17], now()).await;

		assert_eq!(report.registered, vec![3, 17]);
		assert_eq!(report.skipped, vec![-1, 24]);
		assert!(host.query(&hook_id(3)).await.is_some());
		assert!(host.query(&hook_id(17)).await.is_some());
	}

	#[tokio::test]
	async fn existing_next_fire_is_left_untouched() {
		let dir = tempfile::tempdir().unwrap();
		let (scheduler, host) = scheduler(&dir);
		let custom = now() + Duration::minutes(5);
		host.register(&hook_id(10), custom, Duration::days(1)).await.unwrap();

		let report = scheduler.register_at(&[10], now()).await;

		assert_eq!(report.already_scheduled, vec![10]);
		assert_eq!(host.query(&hook_id(10)).await, Some(custom));
	}

	#[tokio::test]
	async fn unregister_and_next_runs() {
		let dir = tempfile::tempdir().unwrap();
		let (scheduler, _host) = scheduler(&dir);
		scheduler.register_at(&[3, 10], now()).await;

		assert_eq!(scheduler.unregister(&[3, 99]).await, vec![3]);

		let runs = scheduler.next_runs(&[10, 3]).await;
		assert_eq!(runs.len(), 2);
		assert_eq!(runs[0].hook_id, "sweep_purge_03h_utc");
		assert!(runs[0].next_fire.is_none());
		assert_eq!(runs[1].next_fire, Some(next_occurrence(10, now())));
	}

	#[tokio::test]
	async fn fired_hook_records_a_tagged_attempt() {
		let dir = tempfile::tempdir().unwrap();
		let (scheduler, host) = scheduler(&dir);
		scheduler.register_at(&[11], now()).await;

		let fired = host.fire_due(next_occurrence(11, now())).await;
		assert_eq!(fired, vec![hook_id(11)]);

		let entry = scheduler.recorder.log().last_entry().await.unwrap();
		assert_eq!(entry.triggered_by, "wp-cron-11h-utc");
	}
}
