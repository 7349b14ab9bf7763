//! Session credential context
//!
//! Holds the bearer credential issued by the backend after a successful
//! signature login. The context is cloned into every component that needs the
//! credential; all of them may read or clear it, but only the login path in
//! [`crate::services::auth_service`] stores a new one.

use crate::constants::{SESSION_TTL_SECS, TOKEN_STORAGE_KEY};
use crate::core::storage::Storage;
use crate::types::error::{Error, Result};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Bearer token bound to the address that signed the login challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
	pub token: String,
	pub address: String,
	pub issued_at: i64,
	pub expires_at: i64,
}

impl SessionCredential {
	/// Issues a credential valid for the session lifetime from now
	pub fn issue(token: String, address: String) -> Self {
		let now = chrono::Utc::now().timestamp();
		Self {
			token,
			address,
			issued_at: now,
			expires_at: now + SESSION_TTL_SECS,
		}
	}

	pub fn is_expired(&self) -> bool {
		self.is_expired_at(chrono::Utc::now().timestamp())
	}

	pub fn is_expired_at(&self, now: i64) -> bool {
		now >= self.expires_at
	}

	/// Case-insensitive comparison with a wallet address
	pub fn belongs_to(&self, address: &Address) -> bool {
		self.address
			.eq_ignore_ascii_case(&address.to_checksum(None))
	}
}

/// Shared handle to the current session credential
#[derive(Debug, Clone)]
pub struct SessionContext {
	credential: Arc<RwLock<Option<SessionCredential>>>,
	storage: Option<Storage>,
}

impl SessionContext {
	/// Creates a context backed by `storage`, restoring a persisted credential
	///
	/// Expired or unreadable credentials are discarded.
	///
	/// # Errors
	/// Returns error only if an invalid persisted credential cannot be removed
	pub fn new(storage: Storage) -> Result<Self> {
		let mut restored = None;

		if storage.exists(TOKEN_STORAGE_KEY) {
			match storage.load::<SessionCredential>(TOKEN_STORAGE_KEY) {
				Ok(credential) if !credential.is_expired() => {
					tracing::debug!(address = %credential.address, "Restored session credential");
					restored = Some(credential);
				},
				Ok(_) => {
					tracing::info!("Persisted session credential expired");
					storage.delete(TOKEN_STORAGE_KEY)?;
				},
				Err(e) => {
					tracing::warn!("Discarding unreadable session credential: {}", e);
					storage.delete(TOKEN_STORAGE_KEY)?;
				},
			}
		}

		Ok(Self {
			credential: Arc::new(RwLock::new(restored)),
			storage: Some(storage),
		})
	}

	/// Context that keeps the credential in memory only
	pub fn in_memory() -> Self {
		Self {
			credential: Arc::new(RwLock::new(None)),
			storage: None,
		}
	}

	/// Current credential if one exists and has not expired
	pub fn credential(&self) -> Option<SessionCredential> {
		self.credential
			.read()
			.ok()
			.and_then(|c| c.clone())
			.filter(|c| !c.is_expired())
	}

	/// Bearer token of the current credential
	pub fn token(&self) -> Option<String> {
		self.credential().map(|c| c.token)
	}

	pub fn has_valid_credential(&self) -> bool {
		self.credential().is_some()
	}

	/// True when a live credential exists for `address`
	pub fn is_valid_for(&self, address: &Address) -> bool {
		self.credential()
			.map(|c| c.belongs_to(address))
			.unwrap_or(false)
	}

	/// Stores a freshly issued credential. Reserved for the login path.
	pub(crate) fn store(&self, credential: SessionCredential) -> Result<()> {
		if let Some(storage) = &self.storage {
			storage.save(TOKEN_STORAGE_KEY, &credential)?;
		}
		let mut current = self
			.credential
			.write()
			.map_err(|e| Error::StorageError(format!("Failed to acquire write lock: {}", e)))?;
		*current = Some(credential);
		Ok(())
	}

	/// Drops the credential from memory and disk
	pub fn clear(&self) {
		if let Ok(mut current) = self.credential.write() {
			*current = None;
		}
		if let Some(storage) = &self.storage {
			if let Err(e) = storage.delete(TOKEN_STORAGE_KEY) {
				tracing::warn!("Failed to remove persisted session credential: {}", e);
			}
		}
	}
}
