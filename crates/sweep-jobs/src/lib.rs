// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Purge jobs: recording attempts, scheduling daily runs, and catching up
//! when runs were missed.
//!
//! - [`ExecutionRecorder`] runs the strategy chain and writes one log entry
//! - [`Scheduler`] registers one daily hook per configured UTC hour on a [`TriggerHost`]
//! - [`OverdueMonitor`] fires a fallback purge when the last success is too old

pub mod error;
pub mod host;
pub mod overdue;
pub mod recorder;
pub mod scheduler;

pub use error::{Result, SchedulerError};
pub use host::{InProcessTriggerHost, TriggerHandler, TriggerHost, DEFAULT_POLL_INTERVAL};
pub use overdue::{OverdueCheck, OverdueMonitor, SkipReason};
pub use recorder::ExecutionRecorder;
pub use scheduler::{hook_id, next_occurrence, HourlyPurgeHandler, RegistrationReport, ScheduledRun, Scheduler};
