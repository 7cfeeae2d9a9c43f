// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cache purge strategies and the chain that orders them.

pub mod chain;
pub mod cli;
pub mod context;
pub mod error;
pub mod guard;
pub mod locator;
pub mod strategy;

pub use chain::{ChainOutcome, PurgeStrategyChain};
pub use cli::{output_indicates_success, CliPurgeStrategy};
pub use context::ExecutionContext;
pub use error::{Result, StrategyError};
pub use guard::{GuardHold, ReentrancyGuard};
pub use locator::CliLocator;
pub use strategy::PurgeStrategy;
