//! Airdrop claim client
//!
//! Signature login against the airdrop backend, eligibility and vesting
//! status queries, and the on-chain `claim` flow, exposed as a library and
//! driven from the `airdrop-claim` binary.

pub mod claim;
pub mod cli;
pub mod constants;
pub mod context;
pub mod core;
pub mod presentation;
pub mod services;
pub mod types;
pub mod utils;

pub use claim::{ClaimOrchestrator, ClaimState};
pub use context::Context;
pub use core::{init_logging, Config};
pub use types::{Error, Result};
