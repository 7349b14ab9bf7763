//! Application-wide constants.

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "https://goat-airdrop-be-production.up.railway.app";

/// Default claim contract address.
pub const DEFAULT_CONTRACT: &str = "0x98a3b17ebea809a035dc15678fef6ae96f302637";

/// BNB Smart Chain testnet.
pub const DEFAULT_CHAIN_ID: u64 = 97;
pub const DEFAULT_RPC_URL: &str = "https://data-seed-prebsc-1-s1.bnbchain.org:8545";
pub const DEFAULT_EXPLORER_URL: &str = "https://testnet.bscscan.com";
pub const DEFAULT_NATIVE_SYMBOL: &str = "BNB";
pub const DEFAULT_NATIVE_NAME: &str = "BNB Testnet";
pub const DEFAULT_TOKEN_SYMBOL: &str = "GOATED";

/// Session credential lifetime: 3 hours.
pub const SESSION_TTL_SECS: i64 = 3 * 60 * 60;

/// Storage key of the persisted credential.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Phase 2 opens 30 days after the contract start time.
pub const PHASE2_OFFSET_SECS: u64 = 2_592_000;

/// Minimum native balance (0.0001 in 18-decimal units) kept for gas.
pub const DEFAULT_MIN_GAS_RESERVE_WEI: u64 = 100_000_000_000_000;

/// Decimals of both the airdropped token and the native currency.
pub const TOKEN_DECIMALS: u8 = 18;

/// Upper bound on waiting for a claim receipt.
pub const RECEIPT_TIMEOUT_SECS: u64 = 300;
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 2_000;

pub const HTTP_TIMEOUT_SECS: u64 = 30;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

pub const DEFAULT_DATA_DIR: &str = ".airdrop-claim";
pub const DEFAULT_CONFIG_FILE: &str = "airdrop.toml";

// Environment overrides
pub const ENV_API_URL: &str = "AIRDROP_API_URL";
pub const ENV_RPC_URL: &str = "AIRDROP_RPC_URL";
pub const ENV_CONTRACT: &str = "AIRDROP_CONTRACT";
pub const ENV_CHAIN_ID: &str = "AIRDROP_CHAIN_ID";
pub const ENV_WALLETCONNECT_PROJECT_ID: &str = "AIRDROP_WALLETCONNECT_PROJECT_ID";
pub const ENV_PRIVATE_KEY: &str = "AIRDROP_PRIVATE_KEY";
pub const ENV_INJECTED_RPC: &str = "AIRDROP_INJECTED_RPC";
pub const ENV_DATA_DIR: &str = "AIRDROP_DATA_DIR";
pub const ENV_CONFIG: &str = "AIRDROP_CONFIG";
