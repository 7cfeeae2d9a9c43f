// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Text format of the purge log.
//!
//! ```text
//! [UTC: 2026-01-19 10:00:05 | WP: 2026-01-19 11:00:05 (Europe/Berlin)] STATUS: SUCCESS | TRIGGERED_BY: wp-cron-10h-utc | EXECUTION_TIME: 1.23s
//! OUTPUT: Success: Purged all caches.
//! --------------------------------------------------------------------------------
//! ```
//!
//! `OUTPUT:` and `ERROR:` lines are present only when non-empty. Multi-line
//! values continue on the following lines, each indented by
//! [`CONTINUATION_INDENT`], so captured subprocess output can never read as a
//! header, a field or a separator. Parsing is tolerant of extra whitespace
//! and of stray lines before the header.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use sweep_core::{parse_utc_timestamp, LogEntry, PurgeStatus, LOG_SEPARATOR};

const OUTPUT_PREFIX: &str = "OUTPUT:";
const ERROR_PREFIX: &str = "ERROR:";

/// Prefix of every continuation line of a multi-line `OUTPUT:` or `ERROR:` value.
pub const CONTINUATION_INDENT: &str = "  ";

static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^\[UTC:\s*(?P<utc>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\s*\|\s*WP:\s*(?P<local>.*?)\s*\((?P<tz>[^)]*)\)\]\s*STATUS:\s*(?P<status>SUCCESS|FAILURE)\s*\|\s*TRIGGERED_BY:\s*(?P<tag>.*?)\s*\|\s*EXECUTION_TIME:\s*(?P<secs>\d+(?:\.\d+)?)s\s*$",
	)
	.unwrap()
});

/// Render an entry, including its trailing separator line.
pub fn format_entry(entry: &LogEntry) -> String {
	let mut text = format!(
		"[UTC: {} | WP: {} ({})] STATUS: {} | TRIGGERED_BY: {} | EXECUTION_TIME: {:.2}s\n",
		entry.utc_timestamp,
		single_line(&entry.local_timestamp),
		single_line(&entry.local_timezone_label),
		entry.status,
		single_line(&entry.triggered_by),
		entry.execution_time_seconds,
	);

	if let Some(output) = entry.output.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
		push_field(&mut text, OUTPUT_PREFIX, output);
	}
	if let Some(error) = entry.error.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
		push_field(&mut text, ERROR_PREFIX, error);
	}

	text.push_str(LOG_SEPARATOR);
	text.push('\n');
	text
}

fn push_field(text: &mut String, prefix: &str, value: &str) {
	let mut lines = value.lines();
	if let Some(first) = lines.next() {
		text.push_str(&format!("{prefix} {}\n", first.trim_end_matches('\r')));
	}
	for line in lines {
		text.push_str(CONTINUATION_INDENT);
		text.push_str(line.trim_end_matches('\r'));
		text.push('\n');
	}
}

fn single_line(value: &str) -> String {
	value.replace(['\r', '\n'], " ")
}

pub fn is_separator(line: &str) -> bool {
	line.trim_end() == LOG_SEPARATOR
}

enum Field {
	None,
	Output,
	Error,
}

/// Parse the lines of a single entry (without its separator).
///
/// Lines before the first recognisable header are ignored. Returns `None`
/// when no header is found.
pub fn parse_entry<S: AsRef<str>>(lines: &[S]) -> Option<LogEntry> {
	let header_index = lines
		.iter()
		.position(|line| HEADER_REGEX.is_match(line.as_ref().trim_end()))?;
	let caps = HEADER_REGEX.captures(lines[header_index].as_ref().trim_end())?;

	let status: PurgeStatus = caps["status"].parse().ok()?;
	let execution_time_seconds: f64 = caps["secs"].parse().ok()?;

	let mut output: Vec<&str> = Vec::new();
	let mut error: Vec<&str> = Vec::new();
	let mut field = Field::None;

	for line in &lines[header_index + 1..] {
		let line = line.as_ref();
		if is_separator(line) {
			break;
		}
		if let Some(rest) = line.strip_prefix(OUTPUT_PREFIX) {
			field = Field::Output;
			output.push(rest.strip_prefix(' ').unwrap_or(rest));
		} else if let Some(rest) = line.strip_prefix(ERROR_PREFIX) {
			field = Field::Error;
			error.push(rest.strip_prefix(' ').unwrap_or(rest));
		} else {
			let line = line.strip_prefix(CONTINUATION_INDENT).unwrap_or(line);
			match field {
				Field::Output => output.push(line),
				Field::Error => error.push(line),
				Field::None => {}
			}
		}
	}

	Some(LogEntry {
		utc_timestamp: caps["utc"].to_string(),
		local_timestamp: caps["local"].to_string(),
		local_timezone_label: caps["tz"].to_string(),
		status,
		triggered_by: caps["tag"].to_string(),
		execution_time_seconds,
		output: join_field(&output),
		error: join_field(&error),
	})
}

/// UTC timestamp of a header line whose status is SUCCESS.
pub fn success_timestamp(line: &str) -> Option<DateTime<Utc>> {
	let caps = HEADER_REGEX.captures(line.trim_end())?;
	if caps["status"].parse::<PurgeStatus>().ok()? != PurgeStatus::Success {
		return None;
	}
	parse_utc_timestamp(&caps["utc"]).ok()
}

fn join_field(lines: &[&str]) -> Option<String> {
	let joined = lines.join("\n");
	let trimmed = joined.trim();
	if trimmed.is_empty() {
		None
	} else {
		Some(trimmed.to_string())
	}
}
