// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded reads from the end of the log file.

use std::io::SeekFrom;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::{LogStoreError, Result};

pub const INITIAL_WINDOW: u64 = 64 * 1024;
const GROWTH_FACTOR: u64 = 4;

/// The last bytes of a file, split into complete lines.
pub struct Tail {
	pub lines: Vec<String>,
	/// True when the window reaches the first byte of the file.
	pub at_start: bool,
}

/// Read the last `window` bytes of `path`. The first line is dropped when it
/// may have been cut by the window boundary.
pub async fn read_tail(path: &Path, window: u64) -> Result<Tail> {
	let mut file = File::open(path)
		.await
		.map_err(|e| LogStoreError::io("open", path, e))?;
	let len = file
		.metadata()
		.await
		.map_err(|e| LogStoreError::io("metadata", path, e))?
		.len();

	let start = len.saturating_sub(window);
	file.seek(SeekFrom::Start(start))
		.await
		.map_err(|e| LogStoreError::io("seek", path, e))?;

	let mut bytes = Vec::with_capacity((len - start) as usize);
	file.read_to_end(&mut bytes)
		.await
		.map_err(|e| LogStoreError::io("read", path, e))?;

	let text = String::from_utf8_lossy(&bytes);
	let at_start = start == 0;
	let body = if at_start {
		&text[..]
	} else {
		match text.find('\n') {
			Some(idx) => &text[idx + 1..],
			None => "",
		}
	};

	Ok(Tail {
		lines: body.lines().map(str::to_string).collect(),
		at_start,
	})
}

/// Run `search` over successively larger tails until it finds something or
/// the whole file has been read.
pub async fn search_tail<T, F>(path: &Path, mut search: F) -> Result<Option<T>>
where
	F: FnMut(&[String], bool) -> Option<T>,
{
	let mut window = INITIAL_WINDOW;
	loop {
		let tail = read_tail(path, window).await?;
		if let Some(found) = search(&tail.lines, tail.at_start) {
			return Ok(Some(found));
		}
		if tail.at_start {
			return Ok(None);
		}
		window = window.saturating_mul(GROWTH_FACTOR);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[tokio::test]
	async fn test_small_file_is_read_whole() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "one\ntwo\nthree\n").unwrap();

		let tail = read_tail(file.path(), INITIAL_WINDOW).await.unwrap();
		assert!(tail.at_start);
		assert_eq!(tail.lines, vec!["one", "two", "three"]);
	}

	#[tokio::test]
	async fn test_partial_first_line_is_dropped() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "abcdef\nghi\njkl\n").unwrap();

		// window starts inside "abcdef"
		let tail = read_tail(file.path(), 10).await.unwrap();
		assert!(!tail.at_start);
		assert_eq!(tail.lines, vec!["ghi", "jkl"]);
	}

	#[tokio::test]
	async fn test_search_grows_window_until_found() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "needle").unwrap();
		let filler = "x".repeat(1023);
		for _ in 0..200 {
			writeln!(file, "{filler}").unwrap();
		}

		let found = search_tail(file.path(), |lines, _| {
			lines.iter().rev().find(|l| l.as_str() == "needle").cloned()
		})
		.await
		.unwrap();
		assert_eq!(found.as_deref(), Some("needle"));
	}

	#[tokio::test]
	async fn test_search_returns_none_at_start_of_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "hay").unwrap();

		let found: Option<String> = search_tail(file.path(), |_, _| None).await.unwrap();
		assert!(found.is_none());
	}
}
