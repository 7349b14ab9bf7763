//! Command-line interface definitions
//!
//! The binary mirrors the two views of the claim client: `login` plays the
//! login page, `status` and `claim` play the claim page.

pub mod output;

use airdrop_wallet::WalletId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Airdrop claim client
#[derive(Parser, Debug)]
#[command(name = "airdrop-claim")]
#[command(about = "Connect a wallet, sign in and claim airdropped tokens")]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	/// Configuration file (TOML)
	#[arg(global = true, long, env = "AIRDROP_CONFIG")]
	pub config: Option<PathBuf>,

	/// Enable debug logging
	#[arg(global = true, long, env = "AIRDROP_DEBUG")]
	pub debug: bool,

	/// Wallet to connect (metamask, phantom, trust, rabby, local)
	#[arg(global = true, long, default_value = "local")]
	pub wallet: WalletId,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// List wallets and whether they are available
	Wallets,

	/// Connect the wallet and sign in
	Login,

	/// Show eligibility, vesting rounds and claim availability
	Status {
		/// Also show the merkle root
		#[arg(long)]
		verbose: bool,
	},

	/// Claim the currently available tokens
	Claim,

	/// End the session and disconnect the wallet
	Logout,

	/// Live countdown to the second vesting round
	Countdown,
}
