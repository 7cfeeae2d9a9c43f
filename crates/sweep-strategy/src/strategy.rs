// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use sweep_core::StrategyKind;

use crate::error::StrategyError;

/// One way of invalidating the cache.
///
/// Returns the captured output on success. Implementations may fail or even
/// panic; the chain converts both into a failed outcome.
#[async_trait]
pub trait PurgeStrategy: Send + Sync {
	fn kind(&self) -> StrategyKind;
	async fn purge(&self) -> Result<String, StrategyError>;
}
