// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator notice describing the schedule, the last purge and overall health.

pub mod dismiss;
pub mod error;
pub mod summarizer;
pub mod summary;

pub use dismiss::{DismissStore, FileDismissStore, MemoryDismissStore};
pub use error::{NoticeError, Result};
pub use summarizer::NoticeSummarizer;
pub use summary::{schedule_text, LastRunSummary, Summary};
