//! Shared data types
//!
//! Backend wire bodies, airdrop domain types and the crate error type.

pub mod airdrop;
pub mod api;
pub mod error;

pub use airdrop::{
	AirdropSnapshot, ClaimProof, ClaimStatus, Eligibility, PhaseClaimStatus, PhaseStatus,
	TxLifecycle,
};
pub use api::ApiResponse;
pub use error::{Error, Result};
