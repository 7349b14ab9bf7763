//! Wallet connection controller.
//!
//! Owns the registered connectors, the discovered wallet options and the
//! reactive [`WalletConnection`] state. Consumers subscribe to a watch channel
//! and see every connect, disconnect and externally triggered account or chain
//! change (observed via [`WalletController::refresh`]).

use crate::discovery::{discover_wallets, ProviderFlags, WalletId, WalletOption};
use crate::{WalletConnector, WalletError};
use alloy_primitives::{Address, Bytes, B256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Snapshot of the wallet connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletConnection {
	pub address: Option<Address>,
	pub chain_id: Option<u64>,
	/// A connection request is awaiting the wallet.
	pub pending: bool,
	pub wallet: Option<WalletId>,
}

impl WalletConnection {
	pub fn is_connected(&self) -> bool {
		self.address.is_some()
	}
}

/// Controller for connecting, disconnecting and observing the wallet.
pub struct WalletController {
	connectors: HashMap<&'static str, Arc<dyn WalletConnector>>,
	options: Vec<WalletOption>,
	state: watch::Sender<WalletConnection>,
	active: RwLock<Option<Arc<dyn WalletConnector>>>,
}

impl WalletController {
	/// Creates a controller from the registered connectors and probe result.
	pub fn new(connectors: Vec<Arc<dyn WalletConnector>>, flags: ProviderFlags) -> Self {
		let connectors: HashMap<&'static str, Arc<dyn WalletConnector>> =
			connectors.into_iter().map(|c| (c.id(), c)).collect();
		let ids: Vec<&str> = connectors.keys().copied().collect();
		let options = discover_wallets(&flags, &ids);
		let (state, _) = watch::channel(WalletConnection::default());

		Self {
			connectors,
			options,
			state,
			active: RwLock::new(None),
		}
	}

	/// Wallet picker entries, installed or not.
	pub fn options(&self) -> &[WalletOption] {
		&self.options
	}

	/// Current connection snapshot.
	pub fn connection(&self) -> WalletConnection {
		self.state.borrow().clone()
	}

	/// Receiver notified on every connection change.
	pub fn subscribe(&self) -> watch::Receiver<WalletConnection> {
		self.state.subscribe()
	}

	/// Connects the given wallet.
	///
	/// Wallets that are not installed are ignored and `Ok(None)` is returned.
	/// The pending flag is raised while the wallet is being asked for accounts.
	///
	/// # Errors
	///
	/// Propagates connector failures (including user rejection); the pending
	/// flag is cleared and the previous connection is kept in that case.
	pub async fn connect(&self, id: WalletId) -> Result<Option<WalletConnection>, WalletError> {
		let Some(option) = self.options.iter().find(|o| o.id == id) else {
			return Ok(None);
		};
		if !option.installed {
			tracing::debug!(wallet = %id, "Ignoring connect request for wallet that is not installed");
			return Ok(None);
		}
		let connector = self
			.connectors
			.get(option.connector_id)
			.cloned()
			.ok_or_else(|| WalletError::UnknownConnector(option.connector_id.to_string()))?;

		self.state.send_modify(|s| s.pending = true);

		let result = async {
			let accounts = connector.request_accounts().await?;
			let address = accounts.first().copied().ok_or(WalletError::NotConnected)?;
			let chain_id = connector.chain_id().await?;
			Ok::<_, WalletError>((address, chain_id))
		}
		.await;

		match result {
			Ok((address, chain_id)) => {
				self.set_active(Some(connector));
				let connection = WalletConnection {
					address: Some(address),
					chain_id: Some(chain_id),
					pending: false,
					wallet: Some(id),
				};
				self.state.send_replace(connection.clone());
				tracing::info!(wallet = %id, %address, chain_id, "Wallet connected");
				Ok(Some(connection))
			},
			Err(e) => {
				self.state.send_modify(|s| s.pending = false);
				tracing::warn!(wallet = %id, "Wallet connection failed: {}", e);
				Err(e)
			},
		}
	}

	/// Drops the active connector and clears the connection.
	pub fn disconnect(&self) {
		self.set_active(None);
		self.state.send_replace(WalletConnection::default());
		tracing::info!("Wallet disconnected");
	}

	/// Re-reads accounts and chain from the active connector.
	///
	/// Returns true if the address or chain changed. An empty account list is
	/// treated as a disconnect.
	pub async fn refresh(&self) -> Result<bool, WalletError> {
		let Some(connector) = self.active_connector() else {
			return Ok(false);
		};
		let accounts = connector.request_accounts().await?;
		let Some(address) = accounts.first().copied() else {
			self.disconnect();
			return Ok(true);
		};
		let chain_id = connector.chain_id().await?;

		let changed = self.state.send_if_modified(|s| {
			if s.address == Some(address) && s.chain_id == Some(chain_id) {
				return false;
			}
			s.address = Some(address);
			s.chain_id = Some(chain_id);
			true
		});
		if changed {
			tracing::info!(%address, chain_id, "Wallet account or chain changed");
		}
		Ok(changed)
	}

	/// Makes sure the wallet is on `chain_id`, asking it to switch if not.
	pub async fn ensure_chain(&self, chain_id: u64) -> Result<(), WalletError> {
		let connector = self.active_connector().ok_or(WalletError::NotConnected)?;
		if self.connection().chain_id == Some(chain_id) {
			return Ok(());
		}
		tracing::info!(chain_id, "Requesting chain switch");
		connector.switch_chain(chain_id).await?;
		let current = connector.chain_id().await?;
		self.state.send_modify(|s| s.chain_id = Some(current));
		if current != chain_id {
			return Err(WalletError::Rpc {
				code: crate::UNRECOGNIZED_CHAIN_CODE,
				message: format!("Wallet stayed on chain {}", current),
			});
		}
		Ok(())
	}

	/// Signs `message` with the connected account.
	pub async fn sign_message(&self, message: &str) -> Result<String, WalletError> {
		let (connector, address) = self.connected()?;
		connector.sign_message(address, message).await
	}

	/// Sends a contract call from the connected account.
	pub async fn send_transaction(&self, to: Address, data: Bytes) -> Result<B256, WalletError> {
		let (connector, address) = self.connected()?;
		connector.send_transaction(address, to, data).await
	}

	fn connected(&self) -> Result<(Arc<dyn WalletConnector>, Address), WalletError> {
		let connector = self.active_connector().ok_or(WalletError::NotConnected)?;
		let address = self.connection().address.ok_or(WalletError::NotConnected)?;
		Ok((connector, address))
	}

	fn active_connector(&self) -> Option<Arc<dyn WalletConnector>> {
		self.active.read().ok().and_then(|a| a.clone())
	}

	fn set_active(&self, connector: Option<Arc<dyn WalletConnector>>) {
		if let Ok(mut active) = self.active.write() {
			*active = connector;
		}
	}
}

/// How the wallet picker was closed without a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
	ClickOutside,
	Escape,
}

/// Open/closed state of the wallet picker overlay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalletPicker {
	open: bool,
}

impl WalletPicker {
	pub fn open(&mut self) {
		self.open = true;
	}

	pub fn is_open(&self) -> bool {
		self.open
	}

	/// Picks a wallet. Only installed entries of an open picker can be chosen;
	/// a successful pick closes the picker.
	pub fn select(&mut self, option: &WalletOption) -> Option<WalletId> {
		if !self.open || !option.installed {
			return None;
		}
		self.open = false;
		Some(option.id)
	}

	pub fn dismiss(&mut self, reason: Dismissal) {
		if self.open {
			tracing::trace!(?reason, "Wallet picker dismissed");
		}
		self.open = false;
	}
}
