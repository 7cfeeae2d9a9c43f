// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Periodic trigger host: the collaborator that actually fires daily hooks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, instrument};

use crate::error::{Result, SchedulerError};

pub const DEFAULT_POLL_INTERVAL: StdDuration = StdDuration::from_secs(60);

/// Called when a hook comes due.
#[async_trait]
pub trait TriggerHandler: Send + Sync {
	async fn fire(&self, hook_id: &str);
}

#[async_trait]
pub trait TriggerHost: Send + Sync {
	async fn register(&self, hook_id: &str, first_fire: DateTime<Utc>, interval: Duration) -> Result<()>;
	/// Returns whether a hook was removed.
	async fn unregister(&self, hook_id: &str) -> Result<bool>;
	async fn query(&self, hook_id: &str) -> Option<DateTime<Utc>>;
	async fn bind(&self, hook_id: &str, handler: Arc<dyn TriggerHandler>);
}

#[derive(Debug, Clone, Copy)]
struct Hook {
	next_fire: DateTime<Utc>,
	interval: Duration,
}

impl Hook {
	/// Move `next_fire` past `now` by whole intervals.
	fn advance(&mut self, now: DateTime<Utc>) {
		let behind = (now - self.next_fire).num_milliseconds();
		let step = self.interval.num_milliseconds().max(1);
		let steps = behind / step + 1;
		self.next_fire += Duration::milliseconds(step.saturating_mul(steps));
	}
}

/// Tokio-driven host polling its hooks on a fixed cadence.
pub struct InProcessTriggerHost {
	hooks: Mutex<HashMap<String, Hook>>,
	handlers: Mutex<HashMap<String, Arc<dyn TriggerHandler>>>,
	poll_interval: StdDuration,
	shutdown_tx: broadcast::Sender<()>,
}

impl InProcessTriggerHost {
	pub fn new(poll_interval: StdDuration) -> Self {
		let (shutdown_tx, _) = broadcast::channel(1);
		Self {
			hooks: Mutex::new(HashMap::new()),
			handlers: Mutex::new(HashMap::new()),
			poll_interval,
			shutdown_tx,
		}
	}

	/// Fire every hook due at `now` and return the ids that fired.
	///
	/// A hook that missed several intervals fires once.
	pub async fn fire_due(&self, now: DateTime<Utc>) -> Vec<String> {
		let mut due = Vec::new();
		{
			let mut hooks = self.hooks.lock().await;
			for (hook_id, hook) in hooks.iter_mut() {
				if hook.next_fire <= now {
					hook.advance(now);
					due.push(hook_id.clone());
				}
			}
		}
		due.sort();

		for hook_id in &due {
			let handler = self.handlers.lock().await.get(hook_id).cloned();
			match handler {
				Some(handler) => {
					debug!(hook_id = %hook_id, "firing hook");
					handler.fire(hook_id).await;
				}
				None => debug!(hook_id = %hook_id, "hook due but no handler bound"),
			}
		}
		due
	}

	/// Poll until [`shutdown`](Self::shutdown) is called.
	#[instrument(skip(self))]
	pub async fn run(&self) {
		let mut shutdown_rx = self.shutdown_tx.subscribe();
		info!(poll_secs = self.poll_interval.as_secs(), "trigger host started");
		loop {
			tokio::select! {
				_ = tokio::time::sleep(self.poll_interval) => {
					self.fire_due(Utc::now()).await;
				}
				_ = shutdown_rx.recv() => {
					info!("trigger host shutting down");
					break;
				}
			}
		}
	}

	pub fn shutdown(&self) {
		let _ = self.shutdown_tx.send(());
	}
}

impl Default for InProcessTriggerHost {
	fn default() -> Self {
		Self::new(DEFAULT_POLL_INTERVAL)
	}
}

#[async_trait]
impl TriggerHost for InProcessTriggerHost {
	async fn register(&self, hook_id: &str, first_fire: DateTime<Utc>, interval: Duration) -> Result<()> {
		// Hooks advance in whole milliseconds.
		if interval.num_milliseconds() < 1 {
			return Err(SchedulerError::InvalidInterval {
				hook_id: hook_id.to_string(),
			});
		}
		self.hooks.lock().await.insert(
			hook_id.to_string(),
			Hook {
				next_fire: first_fire,
				interval,
			},
		);
		Ok(())
	}

	async fn unregister(&self, hook_id: &str) -> Result<bool> {
		self.handlers.lock().await.remove(hook_id);
		Ok(self.hooks.lock().await.remove(hook_id).is_some())
	}

	async fn query(&self, hook_id: &str) -> Option<DateTime<Utc>> {
		self.hooks.lock().await.get(hook_id).map(|h| h.next_fire)
	}

	async fn bind(&self, hook_id: &str, handler: Arc<dyn TriggerHandler>) {
		self.handlers.lock().await.insert(hook_id.to_string(), handler);
	}
}
