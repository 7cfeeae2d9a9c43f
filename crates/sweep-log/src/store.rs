// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Append-only purge log backed by a plain text file.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use fs4::tokio::AsyncFileExt;
use sweep_core::LogEntry;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};

use crate::error::{LogStoreError, Result};
use crate::format::{format_entry, is_separator, parse_entry, success_timestamp};
use crate::tail::search_tail;

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

const LOCK_RETRY: Duration = Duration::from_millis(10);
const LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Repository over the purge log file.
///
/// The file is the source of truth. The most recent success is cached in
/// memory after the first lookup and refreshed on every successful append.
pub struct LogStore {
	path: String,
	last_success: Mutex<Option<Option<DateTime<Utc>>>>,
}

impl LogStore {
	/// `path` may start with `~`, which is expanded on every access.
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			last_success: Mutex::new(None),
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn resolved_path(&self) -> Result<PathBuf> {
		Ok(sweep_config::expand_home(&self.path)?)
	}

	/// Append one entry as a single write under an exclusive file lock.
	///
	/// Failures are reported through `tracing` and returned; they never panic.
	#[instrument(skip(self, entry), fields(status = %entry.status, triggered_by = %entry.triggered_by))]
	pub async fn append(&self, entry: &LogEntry) -> Result<()> {
		let result = self.append_inner(entry).await;
		match &result {
			Ok(path) => {
				debug!(path = %path.display(), "appended purge log entry");
				if entry.is_success() {
					self.remember_success(entry).await;
				}
			}
			Err(e) => {
				error!(path = %self.path, error = %e, "failed to append purge log entry");
			}
		}
		result.map(|_| ())
	}

	async fn append_inner(&self, entry: &LogEntry) -> Result<PathBuf> {
		let path = self.resolved_path()?;

		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			ensure_directory(parent).await?;
		}
		if let Ok(meta) = fs::metadata(&path).await {
			if meta.permissions().readonly() {
				return Err(LogStoreError::NotWritable(path));
			}
		}

		let mut options = OpenOptions::new();
		options.create(true).append(true);
		#[cfg(unix)]
		options.mode(FILE_MODE);

		let mut file = options
			.open(&path)
			.await
			.map_err(|e| LogStoreError::io("open", &path, e))?;

		lock_exclusive(&file, &path).await?;

		let mut text = format_entry(entry);
		if !ends_with_newline(&path).await? {
			// Terminate a partial line left by an interrupted write.
			text.insert(0, '\n');
		}
		file.write_all(text.as_bytes())
			.await
			.map_err(|e| LogStoreError::io("write_all", &path, e))?;
		file.flush()
			.await
			.map_err(|e| LogStoreError::io("flush", &path, e))?;

		// Lock is released when the file is dropped.
		drop(file);
		Ok(path)
	}

	async fn remember_success(&self, entry: &LogEntry) {
		match entry.utc_datetime() {
			Ok(at) => *self.last_success.lock().await = Some(Some(at)),
			Err(e) => warn!(error = %e, "appended success entry has an unparsable timestamp"),
		}
	}

	/// The most recently written entry, or `None` for an absent, empty or
	/// unparsable log.
	#[instrument(skip(self))]
	pub async fn last_entry(&self) -> Option<LogEntry> {
		let path = self.existing_path().await?;
		let found = search_tail(&path, |lines, at_start| last_entry_in(lines, at_start)).await;
		match found {
			Ok(entry) => entry.flatten(),
			Err(e) => {
				warn!(error = %e, "failed to read purge log");
				None
			}
		}
	}

	/// When the most recent SUCCESS entry was written. Cached after the first read.
	pub async fn last_success_timestamp(&self) -> Option<DateTime<Utc>> {
		let mut cached = self.last_success.lock().await;
		if let Some(value) = *cached {
			return value;
		}
		let value = self.read_last_success().await;
		*cached = Some(value);
		value
	}

	/// Scan the file for the most recent SUCCESS entry, bypassing the cache.
	#[instrument(skip(self))]
	pub async fn read_last_success(&self) -> Option<DateTime<Utc>> {
		let path = self.existing_path().await?;
		let found = search_tail(&path, |lines, _| {
			lines.iter().rev().find_map(|line| success_timestamp(line))
		})
		.await;
		match found {
			Ok(at) => at,
			Err(e) => {
				warn!(error = %e, "failed to read purge log");
				None
			}
		}
	}

	/// Drop the cached last success so the next lookup rereads the file.
	pub async fn invalidate_cache(&self) {
		*self.last_success.lock().await = None;
	}

	async fn existing_path(&self) -> Option<PathBuf> {
		let path = match self.resolved_path() {
			Ok(path) => path,
			Err(e) => {
				warn!(error = %e, "cannot resolve purge log path");
				return None;
			}
		};
		match fs::metadata(&path).await {
			Ok(meta) if meta.is_file() => Some(path),
			_ => None,
		}
	}
}

/// Poll for the advisory lock so waiting never blocks a runtime worker.
async fn lock_exclusive(file: &fs::File, path: &Path) -> Result<()> {
	let wait = async {
		loop {
			match file.try_lock_exclusive() {
				Ok(true) => return Ok(()),
				Ok(false) => tokio::time::sleep(LOCK_RETRY).await,
				Err(e) => return Err(LogStoreError::io("lock_exclusive", path, e)),
			}
		}
	};
	tokio::time::timeout(LOCK_TIMEOUT, wait)
		.await
		.map_err(|_| LogStoreError::LockTimeout(path.to_path_buf()))?
}

/// True for an empty file or one whose last byte is a newline.
async fn ends_with_newline(path: &Path) -> Result<bool> {
	let mut file = fs::File::open(path)
		.await
		.map_err(|e| LogStoreError::io("open", path, e))?;
	let len = file
		.metadata()
		.await
		.map_err(|e| LogStoreError::io("metadata", path, e))?
		.len();
	if len == 0 {
		return Ok(true);
	}

	let mut last = [0u8; 1];
	file.seek(SeekFrom::End(-1))
		.await
		.map_err(|e| LogStoreError::io("seek", path, e))?;
	file.read_exact(&mut last)
		.await
		.map_err(|e| LogStoreError::io("read", path, e))?;
	Ok(last[0] == b'\n')
}

async fn ensure_directory(dir: &Path) -> Result<()> {
	match fs::metadata(dir).await {
		Ok(meta) if !meta.is_dir() => return Err(LogStoreError::NotADirectory(dir.to_path_buf())),
		Ok(meta) => {
			if meta.permissions().readonly() {
				return Err(LogStoreError::NotWritable(dir.to_path_buf()));
			}
			return Ok(());
		}
		Err(_) => {}
	}

	let mut builder = fs::DirBuilder::new();
	builder.recursive(true);
	#[cfg(unix)]
	builder.mode(DIR_MODE);
	builder
		.create(dir)
		.await
		.map_err(|e| LogStoreError::io("create_dir", dir, e))
}

/// Find the entry that ends the visible lines.
///
/// `None` asks for a larger window. `Some(None)` means the log has no
/// parsable last entry.
fn last_entry_in(lines: &[String], at_start: bool) -> Option<Option<LogEntry>> {
	let mut end = lines.len();
	while end > 0 && lines[end - 1].trim().is_empty() {
		end -= 1;
	}
	if end > 0 && is_separator(&lines[end - 1]) {
		end -= 1;
	}
	if end == 0 {
		return at_start.then_some(None);
	}

	let mut block: Vec<&str> = Vec::new();
	let mut bounded = at_start;
	for line in lines[..end].iter().rev() {
		if is_separator(line) {
			bounded = true;
			break;
		}
		block.push(line);
	}
	if !bounded {
		return None;
	}

	block.reverse();
	Some(parse_entry(&block))
}
