//! Connector for an external EIP-1193 wallet reached over JSON-RPC.
//!
//! The wallet (a browser extension bridge, a signing proxy, a dev node with
//! unlocked accounts) owns the keys; this connector only forwards requests and
//! translates error payloads. It also answers the capability probe used by
//! wallet discovery, based on the endpoint's `web3_clientVersion`.

use crate::discovery::{ProviderFlags, ProviderProbe};
use crate::{WalletConnector, WalletError};
use alloy_primitives::{Address, Bytes, B256, U64};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Connector forwarding wallet requests to an EIP-1193 JSON-RPC endpoint.
pub struct InjectedConnector {
	provider: DynProvider,
	endpoint: String,
}

impl InjectedConnector {
	/// Connector identifier used by wallet discovery.
	pub const ID: &'static str = "injected";

	/// Creates a connector for the given endpoint URL.
	pub fn new(endpoint: &str) -> Result<Self, WalletError> {
		let url = endpoint
			.parse()
			.map_err(|e| WalletError::Transport(format!("Invalid wallet URL {}: {}", endpoint, e)))?;

		let provider = ProviderBuilder::new()
			.disable_recommended_fillers()
			.connect_http(url)
			.erased();

		Ok(Self {
			provider,
			endpoint: endpoint.to_string(),
		})
	}

	/// Endpoint this connector talks to.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	async fn call<R: DeserializeOwned>(
		&self,
		method: &'static str,
		params: Value,
	) -> Result<R, WalletError> {
		tracing::trace!(method, "Wallet request");
		let raw: Value = self.provider.raw_request(method.into(), params).await?;
		serde_json::from_value(raw).map_err(|e| {
			WalletError::Transport(format!("Unexpected {} response: {}", method, e))
		})
	}
}

#[async_trait]
impl WalletConnector for InjectedConnector {
	fn id(&self) -> &'static str {
		Self::ID
	}

	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
		self.call("eth_requestAccounts", json!([])).await
	}

	async fn chain_id(&self) -> Result<u64, WalletError> {
		let id: U64 = self.call("eth_chainId", json!([])).await?;
		Ok(id.to::<u64>())
	}

	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
		let _: Value = self
			.call(
				"wallet_switchEthereumChain",
				json!([{ "chainId": format!("0x{:x}", chain_id) }]),
			)
			.await?;
		Ok(())
	}

	async fn sign_message(&self, address: Address, message: &str) -> Result<String, WalletError> {
		let payload = format!("0x{}", hex::encode(message.as_bytes()));
		self.call("personal_sign", json!([payload, address])).await
	}

	async fn send_transaction(
		&self,
		from: Address,
		to: Address,
		data: Bytes,
	) -> Result<B256, WalletError> {
		self.call(
			"eth_sendTransaction",
			json!([{ "from": from, "to": to, "data": data }]),
		)
		.await
	}
}

#[async_trait]
impl ProviderProbe for InjectedConnector {
	async fn probe(&self) -> ProviderFlags {
		match self.call::<String>("web3_clientVersion", json!([])).await {
			Ok(version) => flags_from_client_version(&version),
			Err(e) => {
				tracing::debug!(endpoint = %self.endpoint, "No injected provider: {}", e);
				ProviderFlags::default()
			},
		}
	}
}

/// Derives provider flags from a `web3_clientVersion` string.
pub fn flags_from_client_version(version: &str) -> ProviderFlags {
	let version = version.to_ascii_lowercase();
	let is_trust = version.contains("trust");
	ProviderFlags {
		present: true,
		is_meta_mask: version.contains("metamask"),
		is_phantom: version.contains("phantom"),
		is_trust,
		is_trust_wallet: is_trust && version.contains("trustwallet"),
		is_rabby: version.contains("rabby"),
	}
}
