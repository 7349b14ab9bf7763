//! Application context
//!
//! Builds every component from a [`Config`] once and shares them. The
//! session context, router and event bus are cloned into the components that
//! need them, so all of them observe the same credential and navigation state.

use crate::claim::{ClaimOrchestrator, ClaimSettings};
use crate::core::{
	AlloyChain, ApiClient, ChainClient, Config, EventBus, Router, SessionContext, Storage,
};
use crate::services::{AirdropService, AuthService};
use crate::types::error::Result;
use airdrop_wallet::implementations::{injected::InjectedConnector, local::LocalConnector};
use airdrop_wallet::{ProviderFlags, ProviderProbe, WalletConnector, WalletController};
use std::sync::Arc;

/// Fully wired claim client
pub struct Context {
	pub config: Config,
	pub session: SessionContext,
	pub router: Arc<Router>,
	pub auth: AuthService,
	pub airdrop: AirdropService,
	pub wallet: Arc<WalletController>,
	pub events: EventBus,
	pub orchestrator: ClaimOrchestrator,
}

impl Context {
	/// Wires all components
	///
	/// Registers the local-key connector when a private key is configured and
	/// the injected connector when a wallet endpoint is configured; the latter
	/// is probed to find out which wallet answers there.
	///
	/// # Errors
	/// Returns error if the data directory, a connector or a client cannot be
	/// created
	pub async fn build(config: Config) -> Result<Self> {
		let storage = Storage::new(&config.data_dir)?;
		let session = SessionContext::new(storage)?;
		let router = Arc::new(Router::default());
		let api = ApiClient::new(&config.api.base_url, session.clone(), router.clone())?;

		let mut connectors: Vec<Arc<dyn WalletConnector>> = Vec::new();
		let mut flags = ProviderFlags::default();

		if let Some(key) = &config.wallet.private_key {
			let local =
				LocalConnector::new(key.expose(), &config.chain.rpc_url, config.chain.chain_id)?;
			tracing::debug!(address = %local.address(), "Local key wallet available");
			connectors.push(Arc::new(local));
		}
		if let Some(endpoint) = &config.wallet.injected_rpc {
			let injected = InjectedConnector::new(endpoint)?;
			flags = injected.probe().await;
			tracing::debug!(?flags, endpoint = %endpoint, "Probed injected wallet");
			connectors.push(Arc::new(injected));
		}

		let wallet = Arc::new(WalletController::new(connectors, flags));
		let chain: Arc<dyn ChainClient> = Arc::new(AlloyChain::new(&config.chain.rpc_url)?);
		let events = EventBus::default();

		let auth = AuthService::new(api.clone(), session.clone());
		let airdrop = AirdropService::new(api);
		let orchestrator = ClaimOrchestrator::new(
			auth.clone(),
			airdrop.clone(),
			wallet.clone(),
			chain,
			router.clone(),
			events.clone(),
			ClaimSettings::from_config(&config)?,
		);

		Ok(Self {
			config,
			session,
			router,
			auth,
			airdrop,
			wallet,
			events,
			orchestrator,
		})
	}
}
