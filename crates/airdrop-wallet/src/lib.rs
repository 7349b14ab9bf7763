//! Wallet access for the airdrop claim client.
//!
//! This crate abstracts the wallet the user signs with. A [`WalletConnector`]
//! hides whether signatures come from a locally held key or from an external
//! EIP-1193 wallet reached over JSON-RPC. Discovery classifies which known
//! wallets are actually installed, and the controller exposes the reactive
//! connection state (address, chain id, pending flag) to the rest of the app.

use alloy_primitives::{Address, Bytes, B256};
use alloy_transport::TransportError;
use async_trait::async_trait;
use thiserror::Error;

pub mod controller;
pub mod discovery;

/// Concrete connector implementations.
pub mod implementations {
	pub mod injected;
	pub mod local;
}

pub use controller::{Dismissal, WalletConnection, WalletController, WalletPicker};
pub use discovery::{discover_wallets, ProviderFlags, ProviderProbe, WalletId, WalletOption};

/// EIP-1193 error code returned when the user declines a wallet prompt.
pub const USER_REJECTED_CODE: i64 = 4001;

/// EIP-1193 error code for a chain the wallet does not know about.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Errors that can occur while talking to a wallet.
#[derive(Debug, Error)]
pub enum WalletError {
	/// The user cancelled the signature or transaction prompt.
	#[error("User rejected the request")]
	UserRejected,
	/// The requested wallet is not available in this environment.
	#[error("Wallet not installed: {0}")]
	NotInstalled(String),
	/// An operation needed a connected account but none is active.
	#[error("Wallet not connected")]
	NotConnected,
	/// No connector is registered under the given identifier.
	#[error("No connector registered for {0}")]
	UnknownConnector(String),
	/// The configured private key could not be parsed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Local signing failed.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// The wallet answered with a JSON-RPC error.
	#[error("{message}")]
	Rpc { code: i64, message: String },
	/// The request never reached the wallet or the answer was unreadable.
	#[error("Transport error: {0}")]
	Transport(String),
}

impl WalletError {
	/// Returns true when the user explicitly declined the request.
	pub fn is_user_rejection(&self) -> bool {
		match self {
			Self::UserRejected => true,
			Self::Rpc { code, .. } => *code == USER_REJECTED_CODE,
			_ => false,
		}
	}

	/// The wallet-reported error code, if any.
	pub fn code(&self) -> Option<i64> {
		match self {
			Self::UserRejected => Some(USER_REJECTED_CODE),
			Self::Rpc { code, .. } => Some(*code),
			_ => None,
		}
	}
}

impl From<TransportError> for WalletError {
	fn from(err: TransportError) -> Self {
		match err.as_error_resp() {
			Some(payload) if payload.code == USER_REJECTED_CODE => Self::UserRejected,
			Some(payload) => Self::Rpc {
				code: payload.code,
				message: payload.message.to_string(),
			},
			None => Self::Transport(err.to_string()),
		}
	}
}

/// Interface every wallet integration implements.
///
/// Mirrors the subset of EIP-1193 the claim flow needs: account access, chain
/// selection, personal-message signing and transaction submission.
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait WalletConnector: Send + Sync {
	/// Stable identifier used to route wallet options to this connector.
	fn id(&self) -> &'static str;

	/// Asks the wallet for its accounts, prompting the user if needed.
	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

	/// Chain the wallet is currently pointed at.
	async fn chain_id(&self) -> Result<u64, WalletError>;

	/// Asks the wallet to move to another chain.
	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

	/// Signs a UTF-8 message with EIP-191 personal-sign semantics.
	///
	/// Returns the 65-byte signature as a 0x-prefixed hex string.
	async fn sign_message(&self, address: Address, message: &str) -> Result<String, WalletError>;

	/// Submits a contract call from `from` and returns the transaction hash.
	async fn send_transaction(
		&self,
		from: Address,
		to: Address,
		data: Bytes,
	) -> Result<B256, WalletError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_wallet_error_display() {
		assert_eq!(
			WalletError::UserRejected.to_string(),
			"User rejected the request"
		);
		assert_eq!(
			WalletError::NotInstalled("Rabby".into()).to_string(),
			"Wallet not installed: Rabby"
		);
		let rpc = WalletError::Rpc {
			code: -32000,
			message: "insufficient funds for gas * price + value".into(),
		};
		assert_eq!(rpc.to_string(), "insufficient funds for gas * price + value");
	}

	#[test]
	fn test_user_rejection_detection() {
		assert!(WalletError::UserRejected.is_user_rejection());
		assert!(WalletError::Rpc {
			code: USER_REJECTED_CODE,
			message: "denied".into()
		}
		.is_user_rejection());
		assert!(!WalletError::NotConnected.is_user_rejection());
		assert_eq!(WalletError::UserRejected.code(), Some(4001));
		assert_eq!(WalletError::Transport("down".into()).code(), None);
	}
}
