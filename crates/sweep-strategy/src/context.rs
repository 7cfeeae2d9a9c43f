// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Whether this process was started by the external purge CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
	#[default]
	Standalone,
	InsideCli,
}

impl ExecutionContext {
	/// Read the marker variable the CLI exports to its children.
	pub fn detect(env_var: &str) -> Self {
		Self::from_value(std::env::var(env_var).ok().as_deref())
	}

	/// Empty, `0` and `false` count as unset.
	pub fn from_value(value: Option<&str>) -> Self {
		match value.map(str::trim) {
			None | Some("") | Some("0") => Self::Standalone,
			Some(v) if v.eq_ignore_ascii_case("false") => Self::Standalone,
			Some(_) => Self::InsideCli,
		}
	}

	pub fn is_inside_cli(&self) -> bool {
		matches!(self, Self::InsideCli)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unset_and_falsy_values_are_standalone() {
		for value in [None, Some(""), Some("0"), Some("false"), Some("FALSE"), Some("  ")] {
			assert_eq!(ExecutionContext::from_value(value), ExecutionContext::Standalone);
		}
	}

	#[test]
	fn any_other_value_is_inside_cli() {
		for value in ["1", "true", "yes", "/usr/local/bin/wp"] {
			assert!(ExecutionContext::from_value(Some(value)).is_inside_cli());
		}
	}

	#[test]
	fn detect_missing_variable() {
		assert_eq!(
			ExecutionContext::detect("SWEEP_TEST_CONTEXT_VAR_THAT_IS_NEVER_SET"),
			ExecutionContext::Standalone
		);
	}
}
