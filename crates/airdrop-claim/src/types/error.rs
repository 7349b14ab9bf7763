//! Error types and result handling for the claim client
//!
//! Domain-specific variants for configuration, storage, backend, wallet and
//! chain failures, plus conversions from the external error types the client
//! touches.

use airdrop_wallet::WalletError;
use alloy_primitives::B256;
use std::path::PathBuf;

/// Convenience Result type alias using the local Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all claim client operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
	// Config errors
	#[error("Configuration file not found: {0}")]
	ConfigNotFound(PathBuf),

	#[error("Invalid configuration format: {0}")]
	InvalidConfig(String),

	// Storage errors
	#[error("Storage error: {0}")]
	StorageError(String),

	#[error("Failed to create directory: {0}")]
	DirectoryCreationFailed(PathBuf),

	// API errors
	#[error("API request failed: {0}")]
	ApiRequestFailed(String),

	#[error("Invalid API response: {0}")]
	InvalidApiResponse(String),

	#[error("Not authenticated")]
	NotAuthenticated,

	// Wallet errors
	#[error(transparent)]
	Wallet(#[from] WalletError),

	// Chain errors
	#[error("RPC connection failed: {0}")]
	RpcError(String),

	#[error("Contract call failed: {0}")]
	ContractCallFailed(String),

	#[error("Timed out waiting for transaction {0}")]
	TxTimeout(B256),

	// Claim flow errors
	#[error("A claim is already in progress")]
	ClaimInProgress,

	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition { from: String, to: String },

	// Validation errors
	#[error("Invalid address: {0}")]
	InvalidAddress(String),

	#[error("Invalid amount: {0}")]
	InvalidAmount(String),

	// IO errors
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	// JSON errors
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	// TOML errors
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	// HTTP errors
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	// Generic error for unexpected cases
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl From<String> for Error {
	fn from(msg: String) -> Self {
		Error::Other(anyhow::anyhow!("{msg}"))
	}
}

impl From<&'static str> for Error {
	fn from(msg: &'static str) -> Self {
		Error::Other(anyhow::anyhow!("{msg}"))
	}
}
