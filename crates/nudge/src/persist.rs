//! Saving the document after a session ends.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Result of a save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
	/// Content after a save-time formatter ran, if one did.
	pub formatted_content: Option<String>,
}

#[derive(Debug, Error)]
pub enum PersistError {
	#[error("failed to write {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	/// The store refused the write for a reason of its own.
	#[error("save of {path} rejected: {reason}")]
	Rejected { path: PathBuf, reason: String },
}

/// Writes document content to its backing file.
#[async_trait]
pub trait FileStore: Send + Sync {
	async fn save(&self, path: &Path, content: &str) -> Result<SaveOutcome, PersistError>;
}

#[async_trait]
impl<S: FileStore + ?Sized> FileStore for Arc<S> {
	async fn save(&self, path: &Path, content: &str) -> Result<SaveOutcome, PersistError> {
		(**self).save(path, content).await
	}
}

/// Plain filesystem store; never reformats.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileStore;

#[async_trait]
impl FileStore for FsFileStore {
	async fn save(&self, path: &Path, content: &str) -> Result<SaveOutcome, PersistError> {
		let io_err = |source| PersistError::Io {
			path: path.to_path_buf(),
			source,
		};
		if let Some(parent) = path.parent()
			&& !parent.as_os_str().is_empty()
		{
			tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
		}
		tokio::fs::write(path, content).await.map_err(io_err)?;
		tracing::debug!(path = %path.display(), bytes = content.len(), "Saved document");
		Ok(SaveOutcome::default())
	}
}
