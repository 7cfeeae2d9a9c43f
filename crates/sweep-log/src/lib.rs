// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Append-only purge log.
//!
//! [`LogStore`] writes one [`sweep_core::LogEntry`] per purge attempt and reads
//! back the most recent entry and the most recent success. Reads only look at
//! the tail of the file.

pub mod error;
pub mod format;
pub mod store;
mod tail;

pub use error::{LogStoreError, Result};
pub use format::{format_entry, parse_entry};
pub use store::LogStore;
