// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the scheduled cache purge system.
//!
//! This crate provides the data model shared by the log store, the strategy
//! chain, the scheduler and the notice summarizer:
//! - [`PurgeAttempt`] - one in-flight purge, owned by the recorder
//! - [`LogEntry`] - one persisted record in the append-only purge log
//! - [`TriggerTag`] - where an attempt came from (scheduled hour, overdue fallback, ...)
//! - [`HealthState`] - the operator-facing health indicator derived from the log

pub mod attempt;
pub mod entry;
pub mod error;
pub mod health;
pub mod trigger;

pub use attempt::{PurgeAttempt, PurgeStatus, StrategyKind};
pub use entry::{parse_utc_timestamp, LogEntry, LOG_SEPARATOR, TIMESTAMP_FORMAT};
pub use error::{CoreError, Result};
pub use health::{determine_health, is_overdue, HealthState};
pub use trigger::TriggerTag;
