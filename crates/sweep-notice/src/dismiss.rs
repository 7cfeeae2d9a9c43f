// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persistence for the one-way "notice dismissed" flag.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::{NoticeError, Result};

#[async_trait]
pub trait DismissStore: Send + Sync {
	async fn is_dismissed(&self) -> Result<bool>;
	async fn dismiss(&self) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct NoticeState {
	dismissed: bool,
}

/// JSON file holding `{"dismissed": true}` once dismissed.
pub struct FileDismissStore {
	path: String,
}

impl FileDismissStore {
	/// `path` may start with `~`.
	pub fn new(path: impl Into<String>) -> Self {
		Self { path: path.into() }
	}

	fn resolved_path(&self) -> Result<PathBuf> {
		Ok(sweep_config::expand_home(&self.path)?)
	}
}

#[async_trait]
impl DismissStore for FileDismissStore {
	async fn is_dismissed(&self) -> Result<bool> {
		let path = self.resolved_path()?;
		let contents = match fs::read_to_string(&path).await {
			Ok(contents) => contents,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
			Err(source) => {
				return Err(NoticeError::Io {
					operation: "read",
					path,
					source,
				})
			}
		};

		let state: NoticeState =
			serde_json::from_str(&contents).map_err(|source| NoticeError::Json { path, source })?;
		Ok(state.dismissed)
	}

	async fn dismiss(&self) -> Result<()> {
		let path = self.resolved_path()?;
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).await.map_err(|source| NoticeError::Io {
				operation: "create_dir_all",
				path: parent.to_path_buf(),
				source,
			})?;
		}

		let contents = serde_json::to_string_pretty(&NoticeState { dismissed: true }).map_err(|source| {
			NoticeError::Json {
				path: path.clone(),
				source,
			}
		})?;
		fs::write(&path, contents).await.map_err(|source| NoticeError::Io {
			operation: "write",
			path: path.clone(),
			source,
		})?;

		debug!(path = %path.display(), "notice dismissed");
		Ok(())
	}
}

#[derive(Debug, Default)]
pub struct MemoryDismissStore {
	dismissed: AtomicBool,
}

impl MemoryDismissStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl DismissStore for MemoryDismissStore {
	async fn is_dismissed(&self) -> Result<bool> {
		Ok(self.dismissed.load(Ordering::Acquire))
	}

	async fn dismiss(&self) -> Result<()> {
		self.dismissed.store(true, Ordering::Release);
		Ok(())
	}
}
