//! File-backed JSON storage
//!
//! Persists small pieces of client state (currently only the session
//! credential) as one JSON file per key inside the data directory.

use crate::types::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Key-value store where each key maps to `<root>/<key>.json`
#[derive(Debug, Clone)]
pub struct Storage {
	root: Arc<PathBuf>,
}

impl Storage {
	/// Opens storage rooted at `root`, creating the directory if needed
	///
	/// # Errors
	/// Returns `DirectoryCreationFailed` if the directory cannot be created
	pub fn new(root: &Path) -> Result<Self> {
		if !root.exists() {
			std::fs::create_dir_all(root)
				.map_err(|_| Error::DirectoryCreationFailed(root.to_path_buf()))?;
		}

		Ok(Self {
			root: Arc::new(root.to_path_buf()),
		})
	}

	/// Writes `value` under `key`, replacing any previous value
	///
	/// The file is written to a temporary sibling and renamed into place so a
	/// crash never leaves a truncated credential behind.
	pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
		let path = self.path_for(key);
		let tmp = self.root.join(format!(".{key}.json.tmp"));

		let bytes = serde_json::to_vec_pretty(value)
			.map_err(|e| Error::StorageError(format!("Failed to encode {key}: {e}")))?;
		std::fs::write(&tmp, bytes)
			.map_err(|e| Error::StorageError(format!("Failed to write {key}: {e}")))?;
		std::fs::rename(&tmp, &path)
			.map_err(|e| Error::StorageError(format!("Failed to store {key}: {e}")))?;

		Ok(())
	}

	/// Reads the value stored under `key`
	///
	/// # Errors
	/// Returns `StorageError` if the key is missing or its content does not decode
	pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
		let path = self.path_for(key);

		if !path.exists() {
			return Err(Error::StorageError(format!("File not found: {key}")));
		}

		let file = std::fs::File::open(&path)
			.map_err(|e| Error::StorageError(format!("Failed to open {key}: {e}")))?;

		serde_json::from_reader(file)
			.map_err(|e| Error::StorageError(format!("Failed to read {key}: {e}")))
	}

	pub fn exists(&self, key: &str) -> bool {
		self.path_for(key).exists()
	}

	/// Removes `key`; deleting a missing key is not an error
	pub fn delete(&self, key: &str) -> Result<()> {
		let path = self.path_for(key);

		if path.exists() {
			std::fs::remove_file(&path)
				.map_err(|e| Error::StorageError(format!("Failed to delete {key}: {e}")))?;
		}

		Ok(())
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn path_for(&self, key: &str) -> PathBuf {
		self.root.join(format!("{key}.json"))
	}
}
