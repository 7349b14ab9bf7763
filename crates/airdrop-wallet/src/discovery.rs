//! Wallet discovery.
//!
//! Classifies the wallets the client knows about into installed and merely
//! supported entries. Detection is split in two: a [`ProviderProbe`] reports
//! what the environment exposes as typed flags, and [`discover_wallets`] is a
//! pure function mapping those flags plus the registered connectors to the
//! option list shown in the wallet picker.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Feature-detection flags exposed by an injected provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFlags {
	/// An injected provider answered at all.
	pub present: bool,
	pub is_meta_mask: bool,
	pub is_phantom: bool,
	pub is_trust: bool,
	pub is_trust_wallet: bool,
	pub is_rabby: bool,
}

/// Capability probe for the injected provider.
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ProviderProbe: Send + Sync {
	/// Inspects the environment and reports which provider flags are set.
	async fn probe(&self) -> ProviderFlags;
}

/// Known wallet identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalletId {
	MetaMask,
	Phantom,
	Trust,
	Rabby,
	LocalKey,
}

impl WalletId {
	/// All identities in picker order.
	pub const ALL: [WalletId; 5] = [
		WalletId::MetaMask,
		WalletId::Phantom,
		WalletId::Trust,
		WalletId::Rabby,
		WalletId::LocalKey,
	];

	/// Human readable wallet name.
	pub fn display_name(&self) -> &'static str {
		match self {
			WalletId::MetaMask => "MetaMask",
			WalletId::Phantom => "Phantom",
			WalletId::Trust => "Trust Wallet",
			WalletId::Rabby => "Rabby",
			WalletId::LocalKey => "Local Key",
		}
	}

	/// Identifier of the connector that serves this wallet.
	pub fn connector_id(&self) -> &'static str {
		match self {
			WalletId::LocalKey => "local",
			_ => "injected",
		}
	}

	fn detected(&self, flags: &ProviderFlags) -> bool {
		match self {
			WalletId::MetaMask => flags.present && flags.is_meta_mask,
			WalletId::Phantom => flags.present && flags.is_phantom,
			WalletId::Trust => flags.present && (flags.is_trust || flags.is_trust_wallet),
			WalletId::Rabby => flags.present && flags.is_rabby,
			WalletId::LocalKey => true,
		}
	}
}

impl fmt::Display for WalletId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			WalletId::MetaMask => "metamask",
			WalletId::Phantom => "phantom",
			WalletId::Trust => "trust",
			WalletId::Rabby => "rabby",
			WalletId::LocalKey => "local",
		};
		write!(f, "{}", s)
	}
}

impl std::str::FromStr for WalletId {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"metamask" | "meta-mask" => Ok(WalletId::MetaMask),
			"phantom" => Ok(WalletId::Phantom),
			"trust" | "trust-wallet" => Ok(WalletId::Trust),
			"rabby" => Ok(WalletId::Rabby),
			"local" | "local-key" => Ok(WalletId::LocalKey),
			other => Err(format!("Unknown wallet: {}", other)),
		}
	}
}

/// One entry of the wallet picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletOption {
	pub id: WalletId,
	pub name: &'static str,
	pub connector_id: &'static str,
	pub installed: bool,
}

/// Builds the picker entries for every known wallet.
///
/// A wallet counts as installed only when its provider flag is detected and a
/// connector with the matching identifier is registered.
///
/// # Arguments
///
/// * `flags` - Result of the capability probe
/// * `connector_ids` - Identifiers of the registered connectors
pub fn discover_wallets(flags: &ProviderFlags, connector_ids: &[&str]) -> Vec<WalletOption> {
	WalletId::ALL
		.iter()
		.map(|id| {
			let connector_id = id.connector_id();
			WalletOption {
				id: *id,
				name: id.display_name(),
				connector_id,
				installed: id.detected(flags) && connector_ids.contains(&connector_id),
			}
		})
		.collect()
}
