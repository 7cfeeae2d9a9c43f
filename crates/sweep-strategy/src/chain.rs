// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ordered fallback across the available purge strategies.
//!
//! Order: page cache, edge cache, then either the local object cache (when
//! running inside the CLI) or the CLI subprocess. The first success wins.
//! The page cache and edge cache are optional; failures there are logged and
//! the chain moves on. Whatever happens, the chain returns a [`ChainOutcome`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use sweep_core::{PurgeStatus, StrategyKind};
use tracing::{debug, info, instrument, warn};

use crate::context::ExecutionContext;
use crate::error::StrategyError;
use crate::guard::ReentrancyGuard;
use crate::strategy::PurgeStrategy;

/// Result of one pass through the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
	pub strategy_used: StrategyKind,
	pub status: PurgeStatus,
	pub output: String,
	pub error: String,
}

impl ChainOutcome {
	fn success(strategy_used: StrategyKind, output: String) -> Self {
		Self {
			strategy_used,
			status: PurgeStatus::Success,
			output,
			error: String::new(),
		}
	}

	fn failure(strategy_used: StrategyKind, error: &StrategyError) -> Self {
		Self {
			strategy_used,
			status: PurgeStatus::Failure,
			output: String::new(),
			error: error.to_string(),
		}
	}

	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}
}

pub struct PurgeStrategyChain {
	page_cache: Option<Arc<dyn PurgeStrategy>>,
	edge_cache: Option<Arc<dyn PurgeStrategy>>,
	object_cache: Option<Arc<dyn PurgeStrategy>>,
	cli: Option<Arc<dyn PurgeStrategy>>,
	context: ExecutionContext,
	guard: ReentrancyGuard,
}

impl PurgeStrategyChain {
	pub fn new(context: ExecutionContext) -> Self {
		Self {
			page_cache: None,
			edge_cache: None,
			object_cache: None,
			cli: None,
			context,
			guard: ReentrancyGuard::new(),
		}
	}

	pub fn with_page_cache(mut self, strategy: Arc<dyn PurgeStrategy>) -> Self {
		self.page_cache = Some(strategy);
		self
	}

	pub fn with_edge_cache(mut self, strategy: Arc<dyn PurgeStrategy>) -> Self {
		self.edge_cache = Some(strategy);
		self
	}

	pub fn with_object_cache(mut self, strategy: Arc<dyn PurgeStrategy>) -> Self {
		self.object_cache = Some(strategy);
		self
	}

	pub fn with_cli(mut self, strategy: Arc<dyn PurgeStrategy>) -> Self {
		self.cli = Some(strategy);
		self
	}

	pub fn context(&self) -> ExecutionContext {
		self.context
	}

	pub fn is_running(&self) -> bool {
		self.guard.is_held()
	}

	/// Run the chain once. A call made while another is running in this
	/// process returns "already in progress" without touching any strategy.
	#[instrument(skip(self), fields(context = ?self.context))]
	pub async fn attempt_purge(&self) -> ChainOutcome {
		let Some(_hold) = self.guard.try_acquire() else {
			warn!("purge already in progress, skipping");
			return ChainOutcome::failure(StrategyKind::None, &StrategyError::AlreadyInProgress);
		};

		for strategy in [&self.page_cache, &self.edge_cache].into_iter().flatten() {
			match run_strategy(strategy.as_ref()).await {
				Ok(output) => {
					info!(strategy = %strategy.kind(), "purge succeeded");
					return ChainOutcome::success(strategy.kind(), output);
				}
				Err(e) => {
					warn!(strategy = %strategy.kind(), error = %e, "purge strategy failed, falling through");
				}
			}
		}

		if self.context.is_inside_cli() {
			let Some(object_cache) = &self.object_cache else {
				warn!("running inside the CLI without an object cache, refusing to recurse");
				return ChainOutcome::failure(StrategyKind::None, &StrategyError::CannotRecurse);
			};
			debug!("running inside the CLI, flushing object cache instead");
			return finish(object_cache.as_ref()).await;
		}

		match &self.cli {
			Some(cli) => finish(cli.as_ref()).await,
			None => ChainOutcome::failure(
				StrategyKind::None,
				&StrategyError::Unavailable("no purge strategy configured".to_string()),
			),
		}
	}
}

/// Run the last strategy in the chain; its result is final.
async fn finish(strategy: &dyn PurgeStrategy) -> ChainOutcome {
	let kind = strategy.kind();
	match run_strategy(strategy).await {
		Ok(output) => {
			info!(strategy = %kind, "purge succeeded");
			ChainOutcome::success(kind, output)
		}
		Err(e) => {
			warn!(strategy = %kind, error = %e, "purge failed");
			ChainOutcome::failure(kind, &e)
		}
	}
}

async fn run_strategy(strategy: &dyn PurgeStrategy) -> Result<String, StrategyError> {
	match AssertUnwindSafe(strategy.purge()).catch_unwind().await {
		Ok(result) => result,
		Err(panic) => Err(StrategyError::Panicked(panic_message(panic.as_ref()))),
	}
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
	if let Some(msg) = panic.downcast_ref::<&str>() {
		msg.to_string()
	} else if let Some(msg) = panic.downcast_ref::<String>() {
		msg.clone()
	} else {
		"unknown panic".to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;

	enum Behavior {
		Succeed(&'static str),
		Fail(&'static str),
		Panic,
		SlowSucceed(Duration),
	}

	struct FakeStrategy {
		kind: StrategyKind,
		behavior: Behavior,
		calls: AtomicUsize,
	}

	impl FakeStrategy {
		fn new(kind: StrategyKind, behavior: Behavior) -> Arc<Self> {
			Arc::new(Self {
				kind,
				behavior,
				calls: AtomicUsize::new(0),
			})
		}

		fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}

	#[async_trait]
	impl PurgeStrategy for FakeStrategy {
		fn kind(&self) -> StrategyKind {
			self.kind
		}

		async fn purge(&self) -> Result<String, StrategyError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			match &self.behavior {
				Behavior::Succeed(out) => Ok(out.to_string()),
				Behavior::Fail(msg) => Err(StrategyError::Failed(msg.to_string())),
				Behavior::Panic => panic!("strategy blew up"),
				Behavior::SlowSucceed(delay) => {
					tokio::time::sleep(*delay).await;
					Ok("slow success".to_string())
				}
			}
		}
	}

	#[tokio::test]
	async fn page_cache_success_is_authoritative() {
		let page = FakeStrategy::new(StrategyKind::CacheObjectFlush, Behavior::Succeed("flushed"));
		let cli = FakeStrategy::new(StrategyKind::CliSubprocess, Behavior::Succeed("Success"));
		let chain = PurgeStrategyChain::new(ExecutionContext::Standalone)
			.with_page_cache(page.clone())
			.with_cli(cli.clone());

		let outcome = chain.attempt_purge().await;

		assert_eq!(outcome, ChainOutcome::success(StrategyKind::CacheObjectFlush, "flushed".into()));
		assert_eq!(cli.calls(), 0);
	}

	#[tokio::test]
	async fn failures_fall_through_to_the_cli() {
		let page = FakeStrategy::new(StrategyKind::CacheObjectFlush, Behavior::Fail("no page cache"));
		let edge = FakeStrategy::new(StrategyKind::EdgeFunctionFlush, Behavior::Fail("edge down"));
		let cli = FakeStrategy::new(StrategyKind::CliSubprocess, Behavior::Succeed("Success: purged"));
		let chain = PurgeStrategyChain::new(ExecutionContext::Standalone)
			.with_page_cache(page.clone())
			.with_edge_cache(edge.clone())
			.with_cli(cli.clone());

		let outcome = chain.attempt_purge().await;

		assert!(outcome.is_success());
		assert_eq!(outcome.strategy_used, StrategyKind::CliSubprocess);
		assert_eq!((page.calls(), edge.calls(), cli.calls()), (1, 1, 1));
	}

	#[tokio::test]
	async fn terminal_failure_carries_the_error() {
		let cli = FakeStrategy::new(StrategyKind::CliSubprocess, Behavior::Fail("not logged in"));
		let chain = PurgeStrategyChain::new(ExecutionContext::Standalone).with_cli(cli);

		let outcome = chain.attempt_purge().await;

		assert_eq!(outcome.status, PurgeStatus::Failure);
		assert_eq!(outcome.strategy_used, StrategyKind::CliSubprocess);
		assert!(outcome.error.contains("not logged in"));
	}

	#[tokio::test]
	async fn empty_chain_fails_with_no_strategy() {
		let outcome = PurgeStrategyChain::new(ExecutionContext::Standalone)
			.attempt_purge()
			.await;
		assert_eq!(outcome.strategy_used, StrategyKind::None);
		assert!(!outcome.error.is_empty());
	}

	#[tokio::test]
	async fn inside_cli_uses_object_cache_and_never_spawns() {
		let object = FakeStrategy::new(StrategyKind::ObjectCacheFlush, Behavior::Succeed("flushed"));
		let cli = FakeStrategy::new(StrategyKind::CliSubprocess, Behavior::Succeed("Success"));
		let chain = PurgeStrategyChain::new(ExecutionContext::InsideCli)
			.with_object_cache(object.clone())
			.with_cli(cli.clone());

		let outcome = chain.attempt_purge().await;

		assert_eq!(outcome.strategy_used, StrategyKind::ObjectCacheFlush);
		assert!(outcome.is_success());
		assert_eq!(cli.calls(), 0);
	}

	#[tokio::test]
	async fn inside_cli_without_object_cache_refuses_to_recurse() {
		let cli = FakeStrategy::new(StrategyKind::CliSubprocess, Behavior::Succeed("Success"));
		let chain = PurgeStrategyChain::new(ExecutionContext::InsideCli).with_cli(cli.clone());

		let outcome = chain.attempt_purge().await;

		assert_eq!(outcome.status, PurgeStatus::Failure);
		assert_eq!(outcome.strategy_used, StrategyKind::None);
		assert!(outcome.error.contains("cannot recurse"));
		assert_eq!(cli.calls(), 0);
	}

	#[tokio::test]
	async fn overlapping_attempts_run_once() {
		let cli = FakeStrategy::new(
			StrategyKind::CliSubprocess,
			Behavior::SlowSucceed(Duration::from_millis(100)),
		);
		let chain = PurgeStrategyChain::new(ExecutionContext::Standalone).with_cli(cli.clone());

		let (first, second) = tokio::join!(chain.attempt_purge(), chain.attempt_purge());

		assert!(first.is_success());
		assert_eq!(second.strategy_used, StrategyKind::None);
		assert_eq!(second.error, "purge already in progress");
		assert_eq!(cli.calls(), 1);
		assert!(!chain.is_running());
	}

	#[tokio::test]
	async fn panicking_strategy_is_a_failure_and_releases_the_guard() {
		let cli = FakeStrategy::new(StrategyKind::CliSubprocess, Behavior::Panic);
		let chain = PurgeStrategyChain::new(ExecutionContext::Standalone).with_cli(cli.clone());

		let outcome = chain.attempt_purge().await;
		assert_eq!(outcome.status, PurgeStatus::Failure);
		assert!(outcome.error.contains("strategy blew up"));
		assert!(!chain.is_running());

		chain.attempt_purge().await;
		assert_eq!(cli.calls(), 2);
	}

	#[tokio::test]
	async fn panicking_page_cache_falls_through() {
		let page = FakeStrategy::new(StrategyKind::CacheObjectFlush, Behavior::Panic);
		let cli = FakeStrategy::new(StrategyKind::CliSubprocess, Behavior::Succeed("purged"));
		let chain = PurgeStrategyChain::new(ExecutionContext::Standalone)
			.with_page_cache(page)
			.with_cli(cli);

		let outcome = chain.attempt_purge().await;
		assert_eq!(outcome.strategy_used, StrategyKind::CliSubprocess);
		assert!(outcome.is_success());
	}
}
