//! Claim flow orchestration
//!
//! Drives the whole user journey: silent sign-in when a wallet connects,
//! loading eligibility and vesting status, gating the claim button and
//! following a claim transaction until it settles. User-facing feedback goes
//! out as notifications on the [`EventBus`]; nothing here is fatal to the
//! session.

use crate::claim::gating::{self, ClaimButton, ClaimView};
use crate::claim::state::{ClaimState, ClaimStateMachine};
use crate::constants::LOGIN_PATH;
use crate::core::chain::{encode_claim, ChainClient, ContractCall, ReceiptOutcome};
use crate::core::config::Config;
use crate::core::events::{ClaimEvent, EventBus, Notification, NotificationLevel};
use crate::core::navigation::{is_login_path, redirect_destination, Navigator};
use crate::presentation::phase::PhaseDates;
use crate::services::{AirdropService, AuthService};
use crate::types::airdrop::{
	AirdropSnapshot, ClaimProof, ClaimStatus, Eligibility, TxLifecycle,
};
use crate::types::error::{Error, Result};
use crate::utils::amount::format_fixed;
use crate::utils::format::tx_link;
use airdrop_wallet::{WalletController, WalletError};
use alloy_primitives::{Address, B256, U256};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::instrument;

/// Chain and display settings of the claim flow
#[derive(Debug, Clone)]
pub struct ClaimSettings {
	pub contract: Address,
	pub chain_id: u64,
	pub native_name: String,
	pub native_symbol: String,
	pub token_symbol: String,
	pub explorer_url: String,
	pub min_gas_reserve: U256,
	pub phase2_offset_secs: u64,
}

impl ClaimSettings {
	pub fn from_config(config: &Config) -> Result<Self> {
		Ok(Self {
			contract: config.contract_address()?,
			chain_id: config.chain.chain_id,
			native_name: config.chain.native_name.clone(),
			native_symbol: config.chain.native_symbol.clone(),
			token_symbol: config.contract.token_symbol.clone(),
			explorer_url: config.chain.explorer_url.clone(),
			min_gas_reserve: config.min_gas_reserve(),
			phase2_offset_secs: config.claim.phase2_offset_secs,
		})
	}
}

#[derive(Default)]
struct FlowMemory {
	/// Addresses that already had their automatic sign-in attempt.
	attempted: HashSet<Address>,
	/// Transactions whose submission was already announced.
	notified: HashSet<B256>,
	last_address: Option<Address>,
	auth_error: Option<String>,
	snapshot: AirdropSnapshot,
	tx: TxLifecycle,
}

/// Coordinates wallet, backend and chain for one user session
pub struct ClaimOrchestrator {
	auth: AuthService,
	airdrop: AirdropService,
	wallet: Arc<WalletController>,
	chain: Arc<dyn ChainClient>,
	navigator: Arc<dyn Navigator>,
	events: EventBus,
	settings: ClaimSettings,
	state: ClaimStateMachine,
	memory: Mutex<FlowMemory>,
}

impl ClaimOrchestrator {
	pub fn new(
		auth: AuthService,
		airdrop: AirdropService,
		wallet: Arc<WalletController>,
		chain: Arc<dyn ChainClient>,
		navigator: Arc<dyn Navigator>,
		events: EventBus,
		settings: ClaimSettings,
	) -> Self {
		Self {
			auth,
			airdrop,
			wallet,
			chain,
			navigator,
			state: ClaimStateMachine::new(events.clone()),
			events,
			settings,
			memory: Mutex::new(FlowMemory::default()),
		}
	}

	pub fn state(&self) -> ClaimState {
		self.state.current()
	}

	pub fn subscribe_state(&self) -> watch::Receiver<ClaimState> {
		self.state.subscribe()
	}

	pub fn events(&self) -> &EventBus {
		&self.events
	}

	pub fn settings(&self) -> &ClaimSettings {
		&self.settings
	}

	pub fn wallet(&self) -> &Arc<WalletController> {
		&self.wallet
	}

	/// Last loaded airdrop data
	pub fn snapshot(&self) -> AirdropSnapshot {
		self.memory().snapshot.clone()
	}

	pub fn tx(&self) -> TxLifecycle {
		self.memory().tx.clone()
	}

	/// Message of the last failed sign-in, if any
	pub fn auth_error(&self) -> Option<String> {
		self.memory().auth_error.clone()
	}

	fn memory(&self) -> MutexGuard<'_, FlowMemory> {
		self.memory.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	fn address(&self) -> Option<Address> {
		self.wallet.connection().address
	}

	/// Reacts to the current wallet connection
	///
	/// A new address forgets everything tied to the previous one. Without an
	/// address the flow falls back to signed out; with one it makes the single
	/// automatic sign-in attempt for that address.
	pub async fn on_wallet_change(&self) -> Result<ClaimState> {
		let address = self.address();
		let changed = {
			let mut memory = self.memory();
			if memory.last_address != address {
				memory.attempted.clear();
				memory.notified.clear();
				memory.snapshot = AirdropSnapshot::default();
				memory.tx = TxLifecycle::Idle;
				memory.auth_error = None;
				memory.last_address = address;
				true
			} else {
				false
			}
		};

		let Some(address) = address else {
			self.state.reset();
			return Ok(self.state());
		};

		if changed {
			tracing::info!(%address, "Wallet address changed");
			self.state.reset();
		}

		if self.state().is_authenticated() {
			return Ok(self.state());
		}
		self.auto_login(address).await
	}

	/// One silent sign-in attempt per address
	async fn auto_login(&self, address: Address) -> Result<ClaimState> {
		if !self.memory().attempted.insert(address) {
			tracing::debug!(%address, "Automatic sign-in already attempted");
			return Ok(self.state());
		}
		self.authenticate(address).await
	}

	/// Explicit sign-in, independent of the automatic attempt ledger
	pub async fn login(&self) -> Result<ClaimState> {
		let address = self.address().ok_or(Error::Wallet(WalletError::NotConnected))?;
		self.memory().attempted.insert(address);
		self.authenticate(address).await
	}

	#[instrument(skip(self), fields(address = %address))]
	async fn authenticate(&self, address: Address) -> Result<ClaimState> {
		self.state.transition(ClaimState::Authenticating)?;
		self.memory().auth_error = None;

		if let Err(e) = self.wallet.ensure_chain(self.settings.chain_id).await {
			tracing::warn!("Chain switch failed: {}", e);
			return self.fail_auth(format!(
				"Please switch to chain {} in your wallet",
				self.settings.chain_id
			));
		}

		if self.auth.session().is_valid_for(&address) && self.auth.verify_for(&address).await {
			tracing::info!("Existing session is valid, skipping signature");
			return self.signed_in().await;
		}

		let challenge = self.auth.get_message(&address).await;
		let message = match challenge.data.as_ref().filter(|_| challenge.success) {
			Some(data) if !data.message.is_empty() => data.message.clone(),
			_ => return self.fail_auth(challenge.error_or("Failed to get message")),
		};

		let signature = match self.wallet.sign_message(&message).await {
			Ok(signature) => signature,
			Err(e) if e.is_user_rejection() => {
				return self.fail_auth("User rejected the request".to_string());
			},
			Err(e) => {
				self.auth.session().clear();
				let text = e.to_string();
				return self.fail_auth(if text.is_empty() {
					"An error occurred during login".to_string()
				} else {
					text
				});
			},
		};

		let response = self.auth.login(&address, &signature, &message).await;
		let has_token = response
			.data
			.as_ref()
			.is_some_and(|d| !d.token.is_empty());
		if !response.success || !has_token {
			return self.fail_auth(response.error_or("Login failed"));
		}

		self.signed_in().await
	}

	fn fail_auth(&self, message: String) -> Result<ClaimState> {
		tracing::warn!(error = %message, "Sign-in failed");
		self.memory().auth_error = Some(message);
		self.state.reset();
		Ok(self.state())
	}

	async fn signed_in(&self) -> Result<ClaimState> {
		let current = self.navigator.current_path();
		if is_login_path(&current) {
			self.navigator.replace(&redirect_destination(&current));
		}
		self.load().await?;
		Ok(self.state())
	}

	/// Route guard for the claim view
	///
	/// Requires a credential and a connected address, then confirms both with
	/// the backend. Denied access ends up on the login view.
	pub async fn check_access(&self) -> bool {
		let allowed = match self.address() {
			Some(address) if self.auth.session().has_valid_credential() => {
				self.auth.verify_for(&address).await
			},
			_ => false,
		};

		if !allowed {
			self.state.reset();
			if !is_login_path(&self.navigator.current_path()) {
				self.navigator.redirect_to_login();
			}
		}
		allowed
	}

	/// Loads eligibility, claim status, start time and balance
	///
	/// Failing lookups are logged and replaced by defaults. A 401 on either
	/// backend lookup ends the session instead.
	#[instrument(skip(self))]
	pub async fn load(&self) -> Result<AirdropSnapshot> {
		let Some(address) = self.address() else {
			self.state.reset();
			return Err(Error::Wallet(WalletError::NotConnected));
		};
		self.state.transition(ClaimState::Loading)?;

		let (eligible, status, start_time, balance) = tokio::join!(
			self.airdrop.eligibility(),
			self.airdrop.claim_status(),
			self.chain.start_time(self.settings.contract),
			self.chain.native_balance(address),
		);

		if eligible.is_unauthorized() || status.is_unauthorized() {
			self.state.reset();
			return Err(Error::NotAuthenticated);
		}

		if !eligible.success {
			tracing::warn!(error = ?eligible.error, "Failed to load eligibility");
		}
		if !status.success {
			tracing::warn!(error = ?status.error, "Failed to load claim status");
		}

		let eligibility = eligible
			.into_data()
			.map(|d| Eligibility {
				eligible: d.eligible,
				amount: d.amount,
			})
			.unwrap_or_default();
		let claim_status = status
			.into_data()
			.and_then(|d| d.claim_status)
			.unwrap_or_default();
		let start_time = start_time
			.inspect_err(|e| tracing::warn!("Failed to read start time: {}", e))
			.ok();
		let balance = balance
			.inspect_err(|e| tracing::warn!("Failed to read balance: {}", e))
			.ok();

		let snapshot = AirdropSnapshot {
			eligibility,
			claim_status,
			start_time,
			balance,
		};
		self.memory().snapshot = snapshot.clone();
		self.state.transition(ClaimState::Ready {
			eligible: eligibility.eligible,
		})?;
		Ok(snapshot)
	}

	/// Round dates derived from the contract start time (display only)
	pub fn phase_dates(&self) -> Option<PhaseDates> {
		self.memory()
			.snapshot
			.start_time
			.map(|start| PhaseDates::from_start(start, self.settings.phase2_offset_secs))
	}

	/// Claim button for the loaded data at unix time `now`
	pub fn claim_button(&self, now: u64) -> ClaimButton {
		let memory = self.memory();
		let pending = self.state() == ClaimState::Claiming || memory.tx.is_pending();
		let phase2_at = memory
			.snapshot
			.start_time
			.map(|start| PhaseDates::from_start(start, self.settings.phase2_offset_secs).phase2);

		gating::claim_button(&ClaimView {
			claim_status: &memory.snapshot.claim_status,
			pending,
			balance: memory.snapshot.balance,
			min_gas_reserve: self.settings.min_gas_reserve,
			phase2_at,
			now,
			native_symbol: &self.settings.native_symbol,
		})
	}

	/// Claims the currently available tokens
	///
	/// Fetches a fresh proof, re-checks the gas balance, submits
	/// `claim(amount, proof)` through the wallet and waits for the receipt.
	/// Failures before submission return to the ready state; a reverted or
	/// lost transaction moves to `ClaimFailed`. Either outcome reloads the
	/// airdrop data after the notification went out.
	///
	/// # Errors
	/// Returns `ClaimInProgress` while another claim runs and
	/// `InvalidTransition` when no data is loaded
	#[instrument(skip(self))]
	pub async fn claim(&self) -> Result<TxLifecycle> {
		let status: ClaimStatus = self.memory().snapshot.claim_status.clone();
		if !status.any_claimable() {
			tracing::debug!("Nothing claimable");
			return Ok(self.tx());
		}

		let Some(address) = self.address() else {
			self.notify(NotificationLevel::Error, "Please connect your wallet");
			return Ok(self.tx());
		};

		self.state.begin_claim()?;

		let response = self.airdrop.proof().await;
		let proof = match response.into_data().map(ClaimProof::try_from) {
			Some(Ok(proof)) => proof,
			Some(Err(e)) => {
				tracing::warn!("Unusable proof: {}", e);
				return self.abort_claim("Failed to get airdrop proof".to_string());
			},
			None => return self.abort_claim("Failed to get airdrop proof".to_string()),
		};

		let fresh = self
			.chain
			.native_balance(address)
			.await
			.inspect_err(|e| tracing::warn!("Balance re-check failed: {}", e))
			.ok();
		let balance = fresh.or(self.memory().snapshot.balance);
		if !gating::has_enough_balance(balance, self.settings.min_gas_reserve) {
			return self.abort_claim(format!(
				"Insufficient {}. You have {} {}. Please get more from the faucet.",
				self.settings.native_name,
				format_fixed(balance.unwrap_or_default(), 18, 6),
				self.settings.native_symbol
			));
		}

		let call = ContractCall {
			from: address,
			to: self.settings.contract,
			data: encode_claim(&proof),
		};
		let hash = match self
			.wallet
			.send_transaction(call.to, call.data.clone())
			.await
		{
			Ok(hash) => hash,
			Err(e) => {
				let message = classify_claim_error(&Error::Wallet(e), &self.settings.native_name);
				return self.abort_claim(message);
			},
		};

		tracing::info!(tx_hash = %hash, amount = %proof.amount, "Claim submitted");
		self.set_tx(TxLifecycle::Submitted(hash));
		self.announce_submitted(hash);

		let link = tx_link(&self.settings.explorer_url, &hash);
		let outcome = self.chain.wait_for_receipt(hash, call).await;
		let lifecycle = match outcome {
			Ok(ReceiptOutcome::Confirmed { .. }) => {
				self.set_tx(TxLifecycle::Confirmed(hash));
				self.state.transition(ClaimState::Claimed)?;
				self.events.notify(
					Notification::new(NotificationLevel::Success, "Claimed successfully!")
						.with_link(link),
				);
				TxLifecycle::Confirmed(hash)
			},
			Ok(ReceiptOutcome::Reverted { reason }) => {
				self.settle_failure(hash, format!("Transaction failed: {}", reason), link)?
			},
			Err(e) => self.settle_failure(hash, e.to_string(), link)?,
		};

		if let Err(e) = self.load().await {
			tracing::warn!("Refresh after claim failed: {}", e);
		}
		Ok(lifecycle)
	}

	fn abort_claim(&self, reason: String) -> Result<TxLifecycle> {
		self.notify(NotificationLevel::Error, &reason);
		let lifecycle = TxLifecycle::Failed { hash: None, reason };
		self.set_tx(lifecycle.clone());
		let eligible = self.memory().snapshot.eligibility.eligible;
		self.state.transition(ClaimState::Ready { eligible })?;
		Ok(lifecycle)
	}

	fn settle_failure(&self, hash: B256, reason: String, link: String) -> Result<TxLifecycle> {
		let lifecycle = TxLifecycle::Failed {
			hash: Some(hash),
			reason: reason.clone(),
		};
		self.set_tx(lifecycle.clone());
		self.state.transition(ClaimState::ClaimFailed)?;
		self.events
			.notify(Notification::new(NotificationLevel::Error, reason).with_link(link));
		Ok(lifecycle)
	}

	fn set_tx(&self, lifecycle: TxLifecycle) {
		self.memory().tx = lifecycle.clone();
		let _ = self.events.publish(ClaimEvent::Tx(lifecycle));
	}

	fn notify(&self, level: NotificationLevel, message: &str) {
		self.events.notify(Notification::new(level, message));
	}

	/// Announces a submitted transaction once per hash
	///
	/// Returns true if the notification went out.
	pub fn announce_submitted(&self, hash: B256) -> bool {
		if !self.memory().notified.insert(hash) {
			return false;
		}
		self.events.notify(
			Notification::new(NotificationLevel::Info, "Transaction submitted")
				.with_link(tx_link(&self.settings.explorer_url, &hash)),
		);
		true
	}

	/// Signs out, disconnects the wallet and returns to the login view
	pub fn logout(&self) {
		self.auth.logout();
		self.wallet.disconnect();
		*self.memory() = FlowMemory::default();
		self.state.reset();
		self.navigator.replace(LOGIN_PATH);
	}
}

/// User-facing message for a failed claim submission
pub fn classify_claim_error(error: &Error, native_name: &str) -> String {
	if let Error::Wallet(e) = error {
		if e.is_user_rejection() {
			return "Transaction rejected by user".to_string();
		}
	}
	let message = error.to_string();
	if message.contains("insufficient funds") {
		format!("Insufficient {} for gas fees", native_name)
	} else if message.trim().is_empty() {
		"Failed to claim airdrop. Please try again.".to_string()
	} else {
		message
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::api::ApiClient;
	use crate::core::chain::MockChainClient;
	use crate::core::navigation::Router;
	use crate::core::session::{SessionContext, SessionCredential};
	use airdrop_wallet::{MockWalletConnector, ProviderFlags, WalletId};
	use alloy_primitives::{address, Bytes};
	use serde_json::json;
	use wiremock::matchers::{method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	const USER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
	const START: u64 = 1_700_000_000;

	fn settings() -> ClaimSettings {
		ClaimSettings::from_config(&Config::default()).unwrap()
	}

	fn claim_status_body(p1: (bool, bool), p2: (bool, bool)) -> serde_json::Value {
		let phase = |(claimed, can_claim): (bool, bool)| {
			json!({
				"claimed": claimed,
				"status": if claimed { "claimed" } else { "not_claimed" },
				"claimableAmount": "250000000000000000000",
				"canClaim": can_claim
			})
		};
		json!({ "success": true, "claimStatus": { "phase1": phase(p1), "phase2": phase(p2) } })
	}

	async fn mount_json(server: &MockServer, verb: &str, route: &str, body: serde_json::Value) {
		Mock::given(method(verb))
			.and(path(route))
			.respond_with(ResponseTemplate::new(200).set_body_json(body))
			.mount(server)
			.await;
	}

	async fn mount_airdrop(server: &MockServer, p1: (bool, bool), p2: (bool, bool)) {
		mount_json(
			server,
			"GET",
			"/api/airdrop/eligible",
			json!({ "success": true, "eligible": true, "amount": "500000000000000000000" }),
		)
		.await;
		mount_json(server, "GET", "/api/airdrop/claim-status", claim_status_body(p1, p2)).await;
		mount_json(
			server,
			"POST",
			"/api/auth/verify",
			json!({ "success": true, "address": USER.to_checksum(None) }),
		)
		.await;
	}

	fn connector(configure: impl FnOnce(&mut MockWalletConnector)) -> MockWalletConnector {
		let mut mock = MockWalletConnector::new();
		mock.expect_id().return_const("local");
		mock.expect_request_accounts()
			.returning(|| Box::pin(async { Ok(vec![USER]) }));
		mock.expect_chain_id()
			.returning(|| Box::pin(async { Ok(97) }));
		configure(&mut mock);
		mock
	}

	fn chain(balance: u64, configure: impl FnOnce(&mut MockChainClient)) -> MockChainClient {
		let mut mock = MockChainClient::new();
		mock.expect_start_time()
			.returning(|_| Box::pin(async { Ok(START) }));
		mock.expect_native_balance()
			.returning(move |_| Box::pin(async move { Ok(U256::from(balance)) }));
		configure(&mut mock);
		mock
	}

	struct Harness {
		orchestrator: ClaimOrchestrator,
		session: SessionContext,
		router: Arc<Router>,
	}

	async fn harness(
		server: &MockServer,
		wallet: MockWalletConnector,
		chain: MockChainClient,
		signed_in: bool,
	) -> Harness {
		let session = SessionContext::in_memory();
		if signed_in {
			session
				.store(SessionCredential::issue("jwt".into(), USER.to_checksum(None)))
				.unwrap();
		}
		let router = Arc::new(Router::new(LOGIN_PATH));
		let api = ApiClient::new(&server.uri(), session.clone(), router.clone()).unwrap();
		let controller = Arc::new(WalletController::new(
			vec![Arc::new(wallet)],
			ProviderFlags::default(),
		));
		controller.connect(WalletId::LocalKey).await.unwrap();

		let orchestrator = ClaimOrchestrator::new(
			AuthService::new(api.clone(), session.clone()),
			AirdropService::new(api),
			controller,
			Arc::new(chain),
			router.clone(),
			EventBus::default(),
			settings(),
		);
		Harness {
			orchestrator,
			session,
			router,
		}
	}

	fn next_notification(
		rx: &mut tokio::sync::broadcast::Receiver<ClaimEvent>,
	) -> Option<Notification> {
		while let Ok(event) = rx.try_recv() {
			if let ClaimEvent::Notification(n) = event {
				return Some(n);
			}
		}
		None
	}

	#[tokio::test]
	async fn round_one_claimable_after_restored_session() {
		let server = MockServer::start().await;
		mount_airdrop(&server, (false, true), (false, false)).await;

		let h = harness(
			&server,
			connector(|m| {
				m.expect_sign_message().never();
			}),
			chain(1_000_000_000_000_000, |_| {}),
			true,
		)
		.await;

		let state = h.orchestrator.on_wallet_change().await.unwrap();
		assert_eq!(state, ClaimState::Ready { eligible: true });
		assert_eq!(h.router.current_path(), "/");

		let button = h.orchestrator.claim_button(START + 10);
		assert!(button.enabled);
		assert_eq!(button.label, "Claim Round 1 Tokens");

		let dates = h.orchestrator.phase_dates().unwrap();
		assert_eq!(dates.phase2 - dates.phase1, 2_592_000);
		assert_eq!(
			h.orchestrator.snapshot().eligibility.amount,
			U256::from(500u64) * U256::from(10u64).pow(U256::from(18u64))
		);
	}

	#[tokio::test]
	async fn all_claimed_disables_button() {
		let server = MockServer::start().await;
		mount_airdrop(&server, (true, false), (true, false)).await;

		let h = harness(&server, connector(|_| {}), chain(1_000_000_000_000_000, |_| {}), true).await;
		h.orchestrator.on_wallet_change().await.unwrap();

		let button = h.orchestrator.claim_button(START);
		assert!(!button.enabled);
		assert_eq!(button.label, "Claimed");
	}

	#[tokio::test]
	async fn rejected_auto_login_is_not_retried() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path(format!("/api/auth/message/{}", USER.to_checksum(None))))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"success": true,
				"message": "Sign in to claim",
				"timestamp": START
			})))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("POST"))
			.and(path("/api/auth/login"))
			.respond_with(ResponseTemplate::new(200))
			.expect(0)
			.mount(&server)
			.await;

		let h = harness(
			&server,
			connector(|m| {
				m.expect_sign_message()
					.times(1)
					.returning(|_, _| Box::pin(async { Err(WalletError::UserRejected) }));
			}),
			chain(0, |_| {}),
			false,
		)
		.await;

		let state = h.orchestrator.on_wallet_change().await.unwrap();
		assert_eq!(state, ClaimState::Unauthenticated);
		assert_eq!(
			h.orchestrator.auth_error().as_deref(),
			Some("User rejected the request")
		);
		assert!(!h.session.has_valid_credential());

		// Same address again: no second challenge, no second signature.
		let state = h.orchestrator.on_wallet_change().await.unwrap();
		assert_eq!(state, ClaimState::Unauthenticated);
	}

	#[tokio::test]
	async fn successful_login_stores_credential_and_loads() {
		let server = MockServer::start().await;
		mount_airdrop(&server, (false, true), (false, false)).await;
		mount_json(
			&server,
			"GET",
			&format!("/api/auth/message/{}", USER.to_checksum(None)),
			json!({ "success": true, "message": "Sign in to claim", "timestamp": START }),
		)
		.await;
		mount_json(
			&server,
			"POST",
			"/api/auth/login",
			json!({ "success": true, "token": "jwt-new", "address": USER.to_checksum(None) }),
		)
		.await;

		let h = harness(
			&server,
			connector(|m| {
				m.expect_sign_message()
					.withf(|_, message| message == "Sign in to claim")
					.times(1)
					.returning(|_, _| Box::pin(async { Ok("0xsig".to_string()) }));
			}),
			chain(1_000_000_000_000_000, |_| {}),
			false,
		)
		.await;

		let state = h.orchestrator.on_wallet_change().await.unwrap();
		assert_eq!(state, ClaimState::Ready { eligible: true });
		assert_eq!(h.session.token().as_deref(), Some("jwt-new"));
		assert_eq!(h.router.current_path(), "/");
		assert!(h.orchestrator.auth_error().is_none());
	}

	#[tokio::test]
	async fn claim_confirmed_notifies_and_refreshes() {
		let server = MockServer::start().await;
		mount_airdrop(&server, (false, true), (false, false)).await;
		mount_json(
			&server,
			"GET",
			"/api/airdrop/proof",
			json!({
				"success": true,
				"amount": "250000000000000000000",
				"proof": ["0x1111111111111111111111111111111111111111111111111111111111111111"]
			}),
		)
		.await;

		let hash = B256::repeat_byte(0xab);
		let h = harness(
			&server,
			connector(|m| {
				m.expect_send_transaction()
					.withf(|_, to, data: &Bytes| {
						*to == settings().contract && data.len() == 4 + 32 * 4
					})
					.times(1)
					.returning(move |_, _, _| Box::pin(async move { Ok(hash) }));
			}),
			chain(1_000_000_000_000_000, |m| {
				m.expect_wait_for_receipt()
					.times(1)
					.returning(|_, _| {
						Box::pin(async { Ok(ReceiptOutcome::Confirmed { block_number: Some(7) }) })
					});
			}),
			true,
		)
		.await;
		h.orchestrator.on_wallet_change().await.unwrap();
		let mut rx = h.orchestrator.events().subscribe();

		let lifecycle = h.orchestrator.claim().await.unwrap();
		assert_eq!(lifecycle, TxLifecycle::Confirmed(hash));

		let submitted = next_notification(&mut rx).unwrap();
		assert_eq!(submitted.message, "Transaction submitted");
		assert_eq!(
			submitted.link.as_deref(),
			Some(format!("https://testnet.bscscan.com/tx/{}", hash).as_str())
		);
		let confirmed = next_notification(&mut rx).unwrap();
		assert_eq!(confirmed.level, NotificationLevel::Success);
		assert_eq!(confirmed.message, "Claimed successfully!");

		// refreshed after the outcome
		assert_eq!(h.orchestrator.state(), ClaimState::Ready { eligible: true });
		// the same hash is never announced twice
		assert!(!h.orchestrator.announce_submitted(hash));
	}

	#[tokio::test]
	async fn low_balance_aborts_before_sending() {
		let server = MockServer::start().await;
		mount_airdrop(&server, (false, true), (false, false)).await;
		mount_json(
			&server,
			"GET",
			"/api/airdrop/proof",
			json!({ "success": true, "amount": "1", "proof": [] }),
		)
		.await;

		let h = harness(
			&server,
			connector(|m| {
				m.expect_send_transaction().never();
			}),
			chain(50_000_000_000_000, |_| {}),
			true,
		)
		.await;
		h.orchestrator.on_wallet_change().await.unwrap();
		assert!(!h.orchestrator.claim_button(START).enabled);

		let lifecycle = h.orchestrator.claim().await.unwrap();
		match lifecycle {
			TxLifecycle::Failed { hash: None, reason } => assert_eq!(
				reason,
				"Insufficient BNB Testnet. You have 0.000050 BNB. Please get more from the faucet."
			),
			other => panic!("unexpected {:?}", other),
		}
		assert_eq!(h.orchestrator.state(), ClaimState::Ready { eligible: true });
	}

	#[tokio::test]
	async fn claim_rejected_while_claiming() {
		let server = MockServer::start().await;
		mount_airdrop(&server, (false, true), (false, false)).await;
		let h = harness(&server, connector(|_| {}), chain(1_000_000_000_000_000, |_| {}), true).await;
		h.orchestrator.on_wallet_change().await.unwrap();

		h.orchestrator.state.transition(ClaimState::Claiming).unwrap();
		assert!(matches!(h.orchestrator.claim().await, Err(Error::ClaimInProgress)));
		assert!(!h.orchestrator.claim_button(START).enabled);
		assert_eq!(h.orchestrator.claim_button(START).label, "Processing...");
	}

	#[tokio::test]
	async fn submitted_notification_deduplicated() {
		let server = MockServer::start().await;
		let h = harness(&server, connector(|_| {}), chain(0, |_| {}), false).await;
		let mut rx = h.orchestrator.events().subscribe();

		let hash = B256::repeat_byte(0x01);
		assert!(h.orchestrator.announce_submitted(hash));
		assert!(!h.orchestrator.announce_submitted(hash));
		assert!(h.orchestrator.announce_submitted(B256::repeat_byte(0x02)));

		assert!(next_notification(&mut rx).is_some());
		assert!(next_notification(&mut rx).is_some());
		assert!(next_notification(&mut rx).is_none());
	}

	#[tokio::test]
	async fn logout_clears_everything() {
		let server = MockServer::start().await;
		mount_airdrop(&server, (false, true), (false, false)).await;
		let h = harness(&server, connector(|_| {}), chain(1_000_000_000_000_000, |_| {}), true).await;
		h.orchestrator.on_wallet_change().await.unwrap();

		h.orchestrator.logout();
		assert_eq!(h.orchestrator.state(), ClaimState::Unauthenticated);
		assert!(!h.session.has_valid_credential());
		assert!(!h.orchestrator.wallet().connection().is_connected());
		assert_eq!(h.router.current_path(), "/login");
	}

	#[tokio::test]
	async fn check_access_without_credential_redirects() {
		let server = MockServer::start().await;
		let h = harness(&server, connector(|_| {}), chain(0, |_| {}), false).await;
		h.router.replace("/");

		assert!(!h.orchestrator.check_access().await);
		assert_eq!(h.router.current_path(), "/login?redirect=%2F");
	}

	async fn mount_proof(server: &MockServer, proof: serde_json::Value) {
		mount_json(
			server,
			"GET",
			"/api/airdrop/proof",
			json!({ "success": true, "amount": "250000000000000000000", "proof": proof }),
		)
		.await;
	}

	fn drain(rx: &mut tokio::sync::broadcast::Receiver<ClaimEvent>) -> Vec<ClaimEvent> {
		let mut events = Vec::new();
		while let Ok(event) = rx.try_recv() {
			events.push(event);
		}
		events
	}

	fn notifications(events: &[ClaimEvent]) -> Vec<&Notification> {
		events
			.iter()
			.filter_map(|e| match e {
				ClaimEvent::Notification(n) => Some(n),
				_ => None,
			})
			.collect()
	}

	fn entered(events: &[ClaimEvent], state: ClaimState) -> bool {
		events
			.iter()
			.any(|e| matches!(e, ClaimEvent::StateChanged { to, .. } if *to == state))
	}

	const NODE: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";

	#[tokio::test]
	async fn claim_reverted_notifies_failure_and_refreshes() {
		let server = MockServer::start().await;
		mount_airdrop(&server, (false, true), (false, false)).await;
		mount_proof(&server, json!([NODE])).await;

		let hash = B256::repeat_byte(0xcd);
		let h = harness(
			&server,
			connector(|m| {
				m.expect_send_transaction()
					.times(1)
					.returning(move |_, _, _| Box::pin(async move { Ok(hash) }));
			}),
			chain(1_000_000_000_000_000, |m| {
				m.expect_wait_for_receipt().times(1).returning(|_, _| {
					Box::pin(async {
						Ok(ReceiptOutcome::Reverted {
							reason: "execution reverted: already claimed".into(),
						})
					})
				});
			}),
			true,
		)
		.await;
		h.orchestrator.on_wallet_change().await.unwrap();
		let mut rx = h.orchestrator.events().subscribe();

		let lifecycle = h.orchestrator.claim().await.unwrap();
		let reason = "Transaction failed: execution reverted: already claimed";
		assert_eq!(
			lifecycle,
			TxLifecycle::Failed {
				hash: Some(hash),
				reason: reason.to_string()
			}
		);

		let events = drain(&mut rx);
		assert!(entered(&events, ClaimState::ClaimFailed));
		let shown = notifications(&events);
		assert_eq!(shown.len(), 2);
		assert_eq!(shown[0].message, "Transaction submitted");
		assert_eq!(shown[1].level, NotificationLevel::Error);
		assert_eq!(shown[1].message, reason);
		assert_eq!(
			shown[1].link.as_deref(),
			Some(format!("https://testnet.bscscan.com/tx/{}", hash).as_str())
		);

		// the failure is published before the refresh starts
		let failed_at = events
			.iter()
			.position(|e| matches!(e, ClaimEvent::Notification(n) if n.message == reason))
			.unwrap();
		let reloaded_at = events
			.iter()
			.rposition(|e| matches!(e, ClaimEvent::StateChanged { to: ClaimState::Loading, .. }))
			.unwrap();
		assert!(failed_at < reloaded_at);
		assert_eq!(h.orchestrator.state(), ClaimState::Ready { eligible: true });
	}

	#[tokio::test]
	async fn receipt_timeout_settles_as_failure() {
		let server = MockServer::start().await;
		mount_airdrop(&server, (false, true), (false, false)).await;
		mount_proof(&server, json!([NODE])).await;

		let hash = B256::repeat_byte(0xee);
		let h = harness(
			&server,
			connector(|m| {
				m.expect_send_transaction()
					.times(1)
					.returning(move |_, _, _| Box::pin(async move { Ok(hash) }));
			}),
			chain(1_000_000_000_000_000, |m| {
				m.expect_wait_for_receipt()
					.times(1)
					.returning(|hash, _| Box::pin(async move { Err(Error::TxTimeout(hash)) }));
			}),
			true,
		)
		.await;
		h.orchestrator.on_wallet_change().await.unwrap();
		let mut rx = h.orchestrator.events().subscribe();

		let lifecycle = h.orchestrator.claim().await.unwrap();
		let reason = format!("Timed out waiting for transaction {}", hash);
		assert_eq!(
			lifecycle,
			TxLifecycle::Failed {
				hash: Some(hash),
				reason: reason.clone()
			}
		);

		let events = drain(&mut rx);
		assert!(entered(&events, ClaimState::ClaimFailed));
		let last = notifications(&events).pop().unwrap().clone();
		assert_eq!(last.level, NotificationLevel::Error);
		assert_eq!(last.message, reason);
		assert_eq!(h.orchestrator.tx(), lifecycle);
		assert_eq!(h.orchestrator.state(), ClaimState::Ready { eligible: true });
	}

	#[tokio::test]
	async fn backend_errors_fall_back_to_defaults() {
		let server = MockServer::start().await;
		for route in ["/api/airdrop/eligible", "/api/airdrop/claim-status"] {
			Mock::given(method("GET"))
				.and(path(route))
				.respond_with(ResponseTemplate::new(500))
				.mount(&server)
				.await;
		}
		mount_json(
			&server,
			"POST",
			"/api/auth/verify",
			json!({ "success": true, "address": USER.to_checksum(None) }),
		)
		.await;

		let h = harness(&server, connector(|_| {}), chain(1_000_000_000_000_000, |_| {}), true).await;

		let state = h.orchestrator.on_wallet_change().await.unwrap();
		assert_eq!(state, ClaimState::Ready { eligible: false });

		let snapshot = h.orchestrator.snapshot();
		assert!(!snapshot.eligibility.eligible);
		assert_eq!(snapshot.eligibility.amount, U256::ZERO);
		assert!(!snapshot.claim_status.phase1.can_claim);
		assert!(!snapshot.claim_status.phase2.can_claim);
		assert!(!h.orchestrator.claim_button(START).enabled);
		// a server error is not a rejected session
		assert!(h.session.has_valid_credential());
	}

	#[tokio::test]
	async fn unusable_proof_aborts_without_sending() {
		for body in [None, Some(json!(["0x12"]))] {
			let server = MockServer::start().await;
			mount_airdrop(&server, (false, true), (false, false)).await;
			match body {
				Some(proof) => mount_proof(&server, proof).await,
				None => {
					Mock::given(method("GET"))
						.and(path("/api/airdrop/proof"))
						.respond_with(ResponseTemplate::new(404))
						.mount(&server)
						.await;
				},
			}

			let h = harness(
				&server,
				connector(|m| {
					m.expect_send_transaction().never();
				}),
				chain(1_000_000_000_000_000, |m| {
					m.expect_wait_for_receipt().never();
				}),
				true,
			)
			.await;
			h.orchestrator.on_wallet_change().await.unwrap();
			let mut rx = h.orchestrator.events().subscribe();

			let lifecycle = h.orchestrator.claim().await.unwrap();
			assert_eq!(
				lifecycle,
				TxLifecycle::Failed {
					hash: None,
					reason: "Failed to get airdrop proof".into()
				}
			);
			let shown = next_notification(&mut rx).unwrap();
			assert_eq!(shown.level, NotificationLevel::Error);
			assert_eq!(shown.message, "Failed to get airdrop proof");
			assert_eq!(h.orchestrator.state(), ClaimState::Ready { eligible: true });
		}
	}

	#[tokio::test]
	async fn wallet_rejection_returns_to_ready() {
		let server = MockServer::start().await;
		mount_airdrop(&server, (false, true), (false, false)).await;
		mount_proof(&server, json!([NODE])).await;

		let h = harness(
			&server,
			connector(|m| {
				m.expect_send_transaction()
					.times(1)
					.returning(|_, _, _| Box::pin(async { Err(WalletError::UserRejected) }));
			}),
			chain(1_000_000_000_000_000, |m| {
				m.expect_wait_for_receipt().never();
			}),
			true,
		)
		.await;
		h.orchestrator.on_wallet_change().await.unwrap();
		let mut rx = h.orchestrator.events().subscribe();

		let lifecycle = h.orchestrator.claim().await.unwrap();
		assert_eq!(
			lifecycle,
			TxLifecycle::Failed {
				hash: None,
				reason: "Transaction rejected by user".into()
			}
		);
		let shown = next_notification(&mut rx).unwrap();
		assert_eq!(shown.message, "Transaction rejected by user");
		assert_eq!(h.orchestrator.state(), ClaimState::Ready { eligible: true });
		assert!(h.orchestrator.claim_button(START).enabled);
	}

	#[tokio::test]
	async fn expired_session_on_both_lookups_keeps_redirect_target() {
		let server = MockServer::start().await;
		for route in ["/api/airdrop/eligible", "/api/airdrop/claim-status"] {
			Mock::given(method("GET"))
				.and(path(route))
				.respond_with(ResponseTemplate::new(401))
				.expect(1)
				.mount(&server)
				.await;
		}

		let h = harness(&server, connector(|_| {}), chain(1_000_000_000_000_000, |_| {}), true).await;
		h.router.replace("/");

		assert!(matches!(h.orchestrator.load().await, Err(Error::NotAuthenticated)));
		assert_eq!(h.orchestrator.state(), ClaimState::Unauthenticated);
		assert!(!h.session.has_valid_credential());
		assert_eq!(h.router.current_path(), "/login?redirect=%2F");
	}

	#[test]
	fn test_classify_claim_error() {
		let rejected = Error::Wallet(WalletError::UserRejected);
		assert_eq!(
			classify_claim_error(&rejected, "BNB Testnet"),
			"Transaction rejected by user"
		);

		let funds = Error::Wallet(WalletError::Rpc {
			code: -32000,
			message: "insufficient funds for gas * price + value".into(),
		});
		assert_eq!(
			classify_claim_error(&funds, "BNB Testnet"),
			"Insufficient BNB Testnet for gas fees"
		);

		let other = Error::Wallet(WalletError::Rpc {
			code: -32000,
			message: "nonce too low".into(),
		});
		assert_eq!(classify_claim_error(&other, "BNB Testnet"), "nonce too low");

		let empty = Error::Wallet(WalletError::Rpc {
			code: -32000,
			message: String::new(),
		});
		assert_eq!(
			classify_claim_error(&empty, "BNB Testnet"),
			"Failed to claim airdrop. Please try again."
		);
	}
}
