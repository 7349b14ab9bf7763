//! Configuration loading and environment overrides
//!
//! Configuration comes from an optional TOML file, then `AIRDROP_*`
//! environment variables (a `.env` file is honored) override individual
//! fields. Every field has a default that targets the public deployment, so
//! the client runs without any file at all.

use crate::constants::*;
use crate::types::error::{Error, Result};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Private key that never shows up in logs or debug output
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for SecretKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SecretKey(<redacted>)")
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	pub base_url: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_API_URL.to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
	pub chain_id: u64,
	pub rpc_url: String,
	pub explorer_url: String,
	/// Ticker of the gas currency, e.g. `BNB`.
	pub native_symbol: String,
	/// Long name of the gas currency used in error messages.
	pub native_name: String,
}

impl Default for ChainConfig {
	fn default() -> Self {
		Self {
			chain_id: DEFAULT_CHAIN_ID,
			rpc_url: DEFAULT_RPC_URL.to_string(),
			explorer_url: DEFAULT_EXPLORER_URL.to_string(),
			native_symbol: DEFAULT_NATIVE_SYMBOL.to_string(),
			native_name: DEFAULT_NATIVE_NAME.to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
	pub address: String,
	pub token_symbol: String,
}

impl Default for ContractConfig {
	fn default() -> Self {
		Self {
			address: DEFAULT_CONTRACT.to_string(),
			token_symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
	pub walletconnect_project_id: Option<String>,
	/// Key for the local connector.
	pub private_key: Option<SecretKey>,
	/// EIP-1193 JSON-RPC endpoint of an external wallet.
	pub injected_rpc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimConfig {
	/// Minimum native balance, in wei, required before claiming.
	pub min_gas_reserve_wei: u64,
	/// Offset of phase 2 from the contract start time (display only).
	pub phase2_offset_secs: u64,
}

impl Default for ClaimConfig {
	fn default() -> Self {
		Self {
			min_gas_reserve_wei: DEFAULT_MIN_GAS_RESERVE_WEI,
			phase2_offset_secs: PHASE2_OFFSET_SECS,
		}
	}
}

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	pub api: ApiConfig,
	pub chain: ChainConfig,
	pub contract: ContractConfig,
	pub wallet: WalletConfig,
	pub claim: ClaimConfig,
	pub data_dir: PathBuf,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			api: ApiConfig::default(),
			chain: ChainConfig::default(),
			contract: ContractConfig::default(),
			wallet: WalletConfig::default(),
			claim: ClaimConfig::default(),
			data_dir: PathBuf::from(DEFAULT_DATA_DIR),
		}
	}
}

impl Config {
	/// Loads configuration from `path` (or `./airdrop.toml` when present),
	/// applies environment overrides and validates the result
	///
	/// # Arguments
	/// * `path` - Explicit configuration file; must exist when given
	///
	/// # Errors
	/// Returns `ConfigNotFound` for a missing explicit file, `Toml` for a
	/// malformed file and `InvalidConfig` when validation fails
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let _ = dotenvy::dotenv();

		let mut config = match path {
			Some(path) => {
				if !path.exists() {
					return Err(Error::ConfigNotFound(path.to_path_buf()));
				}
				Self::from_toml_str(&std::fs::read_to_string(path)?)?
			},
			None => {
				let default_path = Path::new(DEFAULT_CONFIG_FILE);
				if default_path.exists() {
					Self::from_toml_str(&std::fs::read_to_string(default_path)?)?
				} else {
					Self::default()
				}
			},
		};

		config.apply_env_overrides(|key| std::env::var(key).ok());
		config.validate()?;

		tracing::debug!(
			api = %config.api.base_url,
			chain_id = config.chain.chain_id,
			contract = %config.contract.address,
			"Configuration loaded"
		);
		Ok(config)
	}

	/// Parses TOML text; absent sections and fields take their defaults
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Overrides fields from `AIRDROP_*` variables resolved through `lookup`
	pub fn apply_env_overrides<F>(&mut self, lookup: F)
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

		if let Some(v) = get(ENV_API_URL) {
			self.api.base_url = v;
		}
		if let Some(v) = get(ENV_RPC_URL) {
			self.chain.rpc_url = v;
		}
		if let Some(v) = get(ENV_CONTRACT) {
			self.contract.address = v;
		}
		if let Some(v) = get(ENV_CHAIN_ID) {
			match v.trim().parse() {
				Ok(id) => self.chain.chain_id = id,
				Err(_) => tracing::warn!(value = %v, "Ignoring non-numeric {}", ENV_CHAIN_ID),
			}
		}
		if let Some(v) = get(ENV_WALLETCONNECT_PROJECT_ID) {
			self.wallet.walletconnect_project_id = Some(v);
		}
		if let Some(v) = get(ENV_PRIVATE_KEY) {
			self.wallet.private_key = Some(SecretKey::new(v));
		}
		if let Some(v) = get(ENV_INJECTED_RPC) {
			self.wallet.injected_rpc = Some(v);
		}
		if let Some(v) = get(ENV_DATA_DIR) {
			self.data_dir = PathBuf::from(v);
		}
	}

	/// Checks URLs, the contract address and the chain id
	pub fn validate(&self) -> Result<()> {
		url::Url::parse(&self.api.base_url)
			.map_err(|e| Error::InvalidConfig(format!("api.base_url: {}", e)))?;
		url::Url::parse(&self.chain.rpc_url)
			.map_err(|e| Error::InvalidConfig(format!("chain.rpc_url: {}", e)))?;
		if let Some(injected) = &self.wallet.injected_rpc {
			url::Url::parse(injected)
				.map_err(|e| Error::InvalidConfig(format!("wallet.injected_rpc: {}", e)))?;
		}
		if self.chain.chain_id == 0 {
			return Err(Error::InvalidConfig("chain.chain_id must be non-zero".into()));
		}
		self.contract_address()?;
		Ok(())
	}

	/// Parsed airdrop contract address
	pub fn contract_address(&self) -> Result<Address> {
		Address::from_str(&self.contract.address)
			.map_err(|e| Error::InvalidConfig(format!("contract.address: {}", e)))
	}

	pub fn min_gas_reserve(&self) -> U256 {
		U256::from(self.claim.min_gas_reserve_wei)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn test_defaults_are_valid() {
		let config = Config::default();
		config.validate().unwrap();
		assert_eq!(config.chain.chain_id, 97);
		assert_eq!(config.min_gas_reserve(), U256::from(100_000_000_000_000u64));
		assert_eq!(config.claim.phase2_offset_secs, 2_592_000);
	}

	#[test]
	fn test_partial_toml_keeps_defaults() {
		let config = Config::from_toml_str(
			r#"
			data_dir = "/tmp/airdrop"

			[api]
			base_url = "http://localhost:3000"

			[claim]
			min_gas_reserve_wei = 5
			"#,
		)
		.unwrap();

		assert_eq!(config.api.base_url, "http://localhost:3000");
		assert_eq!(config.claim.min_gas_reserve_wei, 5);
		assert_eq!(config.chain.rpc_url, DEFAULT_RPC_URL);
		assert_eq!(config.data_dir, PathBuf::from("/tmp/airdrop"));
	}

	#[test]
	fn test_env_overrides() {
		let env: HashMap<&str, &str> = HashMap::from([
			(ENV_API_URL, "http://api.local"),
			(ENV_CHAIN_ID, "56"),
			(ENV_PRIVATE_KEY, "0xkey"),
			(ENV_RPC_URL, "  "),
		]);
		let mut config = Config::default();
		config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

		assert_eq!(config.api.base_url, "http://api.local");
		assert_eq!(config.chain.chain_id, 56);
		assert_eq!(config.wallet.private_key.as_ref().unwrap().expose(), "0xkey");
		assert_eq!(config.chain.rpc_url, DEFAULT_RPC_URL);
	}

	#[test]
	fn test_invalid_values_rejected() {
		let mut config = Config::default();
		config.contract.address = "0x1234".into();
		assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

		let mut config = Config::default();
		config.api.base_url = "not a url".into();
		assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
	}

	#[test]
	fn test_missing_explicit_file() {
		let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
		assert!(matches!(result, Err(Error::ConfigNotFound(_))));
	}

	#[test]
	fn test_secret_key_debug_is_redacted() {
		let key = SecretKey::new("0xdeadbeef");
		assert!(!format!("{:?}", key).contains("deadbeef"));
	}
}
