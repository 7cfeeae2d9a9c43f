// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::atomic::{AtomicBool, Ordering};

/// In-process flag that is held while a purge runs.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
	busy: AtomicBool,
}

impl ReentrancyGuard {
	pub fn new() -> Self {
		Self::default()
	}

	/// Take the flag, or `None` if it is already held.
	pub fn try_acquire(&self) -> Option<GuardHold<'_>> {
		self.busy
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.ok()
			.map(|_| GuardHold { guard: self })
	}

	pub fn is_held(&self) -> bool {
		self.busy.load(Ordering::Acquire)
	}
}

/// Releases the flag on drop, including during unwinding.
#[must_use]
pub struct GuardHold<'a> {
	guard: &'a ReentrancyGuard,
}

impl Drop for GuardHold<'_> {
	fn drop(&mut self) {
		self.guard.busy.store(false, Ordering::Release);
	}
}
