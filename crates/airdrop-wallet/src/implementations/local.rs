//! Local private-key connector.
//!
//! Signs challenge messages with a key held in process memory and submits
//! transactions through an Alloy provider whose wallet filler signs them. The
//! connector is pinned to a single chain; requests to switch elsewhere are
//! answered the way a browser wallet answers an unknown chain.

use crate::{WalletConnector, WalletError, UNRECOGNIZED_CHAIN_CODE};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

/// Connector backed by a locally held private key.
pub struct LocalConnector {
	signer: PrivateKeySigner,
	provider: DynProvider,
	chain_id: u64,
}

impl LocalConnector {
	/// Connector identifier used by wallet discovery.
	pub const ID: &'static str = "local";

	/// Creates a connector from a hex private key (with or without 0x prefix).
	///
	/// # Arguments
	///
	/// * `private_key_hex` - Signing key
	/// * `rpc_url` - HTTP endpoint of the node transactions are sent to
	/// * `chain_id` - Chain the key signs for
	///
	/// # Errors
	///
	/// Returns [`WalletError::InvalidKey`] if the key does not parse and
	/// [`WalletError::Transport`] if the RPC URL is malformed.
	pub fn new(private_key_hex: &str, rpc_url: &str, chain_id: u64) -> Result<Self, WalletError> {
		let signer = private_key_hex
			.parse::<PrivateKeySigner>()
			.map_err(|e| WalletError::InvalidKey(format!("Invalid private key: {}", e)))?
			.with_chain_id(Some(chain_id));

		let url = rpc_url
			.parse()
			.map_err(|e| WalletError::Transport(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

		let provider = ProviderBuilder::new()
			.wallet(EthereumWallet::from(signer.clone()))
			.connect_http(url)
			.erased();

		Ok(Self {
			signer,
			provider,
			chain_id,
		})
	}

	/// Address controlled by the key.
	pub fn address(&self) -> Address {
		self.signer.address()
	}

	fn ensure_owner(&self, address: Address) -> Result<(), WalletError> {
		if address != self.signer.address() {
			return Err(WalletError::SigningFailed(format!(
				"Account {} is not managed by this wallet",
				address
			)));
		}
		Ok(())
	}
}

#[async_trait]
impl WalletConnector for LocalConnector {
	fn id(&self) -> &'static str {
		Self::ID
	}

	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
		Ok(vec![self.signer.address()])
	}

	async fn chain_id(&self) -> Result<u64, WalletError> {
		Ok(self.chain_id)
	}

	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
		if chain_id == self.chain_id {
			return Ok(());
		}
		Err(WalletError::Rpc {
			code: UNRECOGNIZED_CHAIN_CODE,
			message: format!("Unrecognized chain ID {}", chain_id),
		})
	}

	async fn sign_message(&self, address: Address, message: &str) -> Result<String, WalletError> {
		self.ensure_owner(address)?;

		let signature = self
			.signer
			.sign_message(message.as_bytes())
			.await
			.map_err(|e| WalletError::SigningFailed(format!("Failed to sign message: {}", e)))?;

		Ok(format!("0x{}", hex::encode(signature.as_bytes())))
	}

	async fn send_transaction(
		&self,
		from: Address,
		to: Address,
		data: Bytes,
	) -> Result<B256, WalletError> {
		self.ensure_owner(from)?;

		let request = TransactionRequest::default()
			.from(from)
			.to(to)
			.input(data.into());

		tracing::debug!(%from, %to, chain_id = self.chain_id, "Sending transaction");

		let pending = self.provider.send_transaction(request).await.map_err(|e| {
			tracing::error!(chain_id = self.chain_id, "Transaction submission failed: {}", e);
			WalletError::from(e)
		})?;

		Ok(*pending.tx_hash())
	}
}
