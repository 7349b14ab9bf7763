//! Chain access for the claim flow
//!
//! Reads the native balance and the airdrop contract's `startTime()`, encodes
//! the `claim` call and follows a submitted transaction until its receipt
//! shows up. Transactions themselves are sent by the wallet, not from here.

use crate::constants::{RECEIPT_POLL_INTERVAL_MS, RECEIPT_TIMEOUT_SECS};
use crate::types::airdrop::ClaimProof;
use crate::types::error::{Error, Result};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::{BlockId, TransactionRequest};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use std::time::Duration;

sol! {
	interface IAirdrop {
		function startTime() external view returns (uint256);
		function claim(uint256 amount, bytes32[] calldata merkleProof) external returns (bool);
	}
}

/// ABI-encoded `claim(amount, merkleProof)` calldata
pub fn encode_claim(proof: &ClaimProof) -> Bytes {
	IAirdrop::claimCall {
		amount: proof.amount,
		merkleProof: proof.proof.clone(),
	}
	.abi_encode()
	.into()
}

/// A contract call as it was submitted, kept to replay it for a revert reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
	pub from: Address,
	pub to: Address,
	pub data: Bytes,
}

/// How a mined transaction ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptOutcome {
	Confirmed { block_number: Option<u64> },
	Reverted { reason: String },
}

/// Read access to the chain
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ChainClient: Send + Sync {
	/// Native currency balance of `address` in wei.
	async fn native_balance(&self, address: Address) -> Result<U256>;

	/// Value of `startTime()` on the airdrop contract, in unix seconds.
	async fn start_time(&self, contract: Address) -> Result<u64>;

	/// Waits until `hash` is mined and reports whether it succeeded.
	///
	/// For reverted transactions the call is replayed against the receipt's
	/// block to recover the node-reported reason.
	async fn wait_for_receipt(&self, hash: B256, call: ContractCall) -> Result<ReceiptOutcome>;
}

/// [`ChainClient`] backed by an Alloy HTTP provider
pub struct AlloyChain {
	provider: DynProvider,
	poll_interval: Duration,
	timeout: Duration,
}

impl AlloyChain {
	/// Creates a chain client for `rpc_url`
	///
	/// # Errors
	/// Returns `RpcError` if the URL is malformed
	pub fn new(rpc_url: &str) -> Result<Self> {
		let url = rpc_url
			.parse()
			.map_err(|e| Error::RpcError(format!("Invalid RPC URL: {}", e)))?;

		Ok(Self {
			provider: ProviderBuilder::new()
				.disable_recommended_fillers()
				.connect_http(url)
				.erased(),
			poll_interval: Duration::from_millis(RECEIPT_POLL_INTERVAL_MS),
			timeout: Duration::from_secs(RECEIPT_TIMEOUT_SECS),
		})
	}

	pub fn with_timing(mut self, poll_interval: Duration, timeout: Duration) -> Self {
		self.poll_interval = poll_interval;
		self.timeout = timeout;
		self
	}

	async fn revert_reason(&self, call: &ContractCall, block_number: Option<u64>) -> String {
		let request = TransactionRequest::default()
			.from(call.from)
			.to(call.to)
			.input(call.data.clone().into());

		let mut replay = self.provider.call(request);
		if let Some(number) = block_number {
			replay = replay.block(BlockId::number(number));
		}

		match replay.await {
			Ok(_) => "Transaction reverted".to_string(),
			Err(e) => e
				.as_error_resp()
				.map(|payload| payload.message.to_string())
				.unwrap_or_else(|| e.to_string()),
		}
	}
}

#[async_trait]
impl ChainClient for AlloyChain {
	async fn native_balance(&self, address: Address) -> Result<U256> {
		self.provider
			.get_balance(address)
			.await
			.map_err(|e| Error::RpcError(format!("Failed to get balance: {}", e)))
	}

	async fn start_time(&self, contract: Address) -> Result<u64> {
		let request = TransactionRequest::default()
			.to(contract)
			.input(Bytes::from(IAirdrop::startTimeCall {}.abi_encode()).into());

		let output = self
			.provider
			.call(request)
			.await
			.map_err(|e| Error::ContractCallFailed(format!("startTime() failed: {}", e)))?;

		if output.len() < 32 {
			return Err(Error::ContractCallFailed(format!(
				"startTime() returned {} bytes",
				output.len()
			)));
		}
		let value = U256::from_be_slice(&output[..32]);
		if value > U256::from(u64::MAX) {
			return Err(Error::ContractCallFailed(format!(
				"startTime() out of range: {}",
				value
			)));
		}
		Ok(value.to::<u64>())
	}

	async fn wait_for_receipt(&self, hash: B256, call: ContractCall) -> Result<ReceiptOutcome> {
		let poll = async {
			loop {
				let receipt = self
					.provider
					.get_transaction_receipt(hash)
					.await
					.map_err(|e| Error::RpcError(format!("Failed to get receipt: {}", e)))?;

				if let Some(receipt) = receipt {
					return Ok::<_, Error>(receipt);
				}
				tokio::time::sleep(self.poll_interval).await;
			}
		};

		let receipt = tokio::time::timeout(self.timeout, poll)
			.await
			.map_err(|_| Error::TxTimeout(hash))??;

		if receipt.status() {
			tracing::info!(tx_hash = %hash, block = ?receipt.block_number, "Transaction confirmed");
			return Ok(ReceiptOutcome::Confirmed {
				block_number: receipt.block_number,
			});
		}

		let reason = self.revert_reason(&call, receipt.block_number).await;
		tracing::warn!(tx_hash = %hash, reason = %reason, "Transaction reverted");
		Ok(ReceiptOutcome::Reverted { reason })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::{json, Value};
	use wiremock::matchers::{body_partial_json, method};
	use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

	struct RpcReply(Value);

	impl Respond for RpcReply {
		fn respond(&self, request: &Request) -> ResponseTemplate {
			let body: Value = serde_json::from_slice(&request.body).unwrap();
			ResponseTemplate::new(200).set_body_json(json!({
				"jsonrpc": "2.0",
				"id": body["id"],
				"result": self.0
			}))
		}
	}

	async fn mount(server: &MockServer, rpc_method: &str, result: Value) {
		Mock::given(method("POST"))
			.and(body_partial_json(json!({ "method": rpc_method })))
			.respond_with(RpcReply(result))
			.mount(server)
			.await;
	}

	#[test]
	fn test_encode_claim_layout() {
		let proof = ClaimProof {
			amount: U256::from(500u64),
			proof: vec![B256::repeat_byte(0x11), B256::repeat_byte(0x22)],
			merkle_root: None,
		};
		let data = encode_claim(&proof);

		assert_eq!(&data[..4], IAirdrop::claimCall::SELECTOR.as_slice());
		// selector + amount + offset + length + two nodes
		assert_eq!(data.len(), 4 + 32 * 5);
		assert_eq!(U256::from_be_slice(&data[4..36]), U256::from(500u64));
		assert_eq!(&data[132..164], B256::repeat_byte(0x22).as_slice());
	}

	#[tokio::test]
	async fn test_start_time_decodes_word() {
		let server = MockServer::start().await;
		mount(
			&server,
			"eth_call",
			json!(format!("0x{:064x}", 1_700_000_000u64)),
		)
		.await;

		let chain = AlloyChain::new(&server.uri()).unwrap();
		let start = chain.start_time(Address::ZERO).await.unwrap();
		assert_eq!(start, 1_700_000_000);
	}

	#[tokio::test]
	async fn test_start_time_rejects_short_output() {
		let server = MockServer::start().await;
		mount(&server, "eth_call", json!("0x")).await;

		let chain = AlloyChain::new(&server.uri()).unwrap();
		assert!(matches!(
			chain.start_time(Address::ZERO).await,
			Err(Error::ContractCallFailed(_))
		));
	}

	#[tokio::test]
	async fn test_native_balance() {
		let server = MockServer::start().await;
		mount(&server, "eth_getBalance", json!("0x5af3107a4000")).await;

		let chain = AlloyChain::new(&server.uri()).unwrap();
		let balance = chain.native_balance(Address::ZERO).await.unwrap();
		assert_eq!(balance, U256::from(100_000_000_000_000u64));
	}

	#[tokio::test]
	async fn test_wait_for_receipt_times_out() {
		let server = MockServer::start().await;
		mount(&server, "eth_getTransactionReceipt", Value::Null).await;

		let chain = AlloyChain::new(&server.uri())
			.unwrap()
			.with_timing(Duration::from_millis(10), Duration::from_millis(100));
		let call = ContractCall {
			from: Address::ZERO,
			to: Address::ZERO,
			data: Bytes::new(),
		};
		let result = chain.wait_for_receipt(B256::ZERO, call).await;
		assert!(matches!(result, Err(Error::TxTimeout(_))));
	}
}
