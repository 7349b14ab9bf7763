//! Airdrop domain types.

use crate::types::api::AirdropProofResponse;
use crate::types::error::{Error, Result};
use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Backend-reported claim state of a single phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
	Claimed,
	NotClaimed,
	#[default]
	#[serde(other)]
	Unknown,
}

/// Claim status of one vesting phase. `can_claim` is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhaseClaimStatus {
	pub claimed: bool,
	pub status: PhaseStatus,
	/// Base-unit decimal string.
	pub claimable_amount: String,
	pub can_claim: bool,
}

/// Claim status of both vesting phases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimStatus {
	pub phase1: PhaseClaimStatus,
	pub phase2: PhaseClaimStatus,
}

impl ClaimStatus {
	pub fn any_claimable(&self) -> bool {
		self.phase1.can_claim || self.phase2.can_claim
	}

	pub fn all_claimed(&self) -> bool {
		self.phase1.claimed && self.phase2.claimed
	}
}

/// Airdrop eligibility of the connected address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
	pub eligible: bool,
	/// Allocation in base units.
	pub amount: U256,
}

/// Merkle inclusion proof for a claim, passed verbatim to the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimProof {
	pub amount: U256,
	pub proof: Vec<B256>,
	pub merkle_root: Option<B256>,
}

impl TryFrom<AirdropProofResponse> for ClaimProof {
	type Error = Error;

	fn try_from(response: AirdropProofResponse) -> Result<Self> {
		let amount = response
			.amount
			.filter(|a| !a.trim().is_empty())
			.ok_or_else(|| Error::InvalidApiResponse("proof response has no amount".into()))?;
		let amount = crate::utils::amount::parse_base_units(&amount)?;

		let proof = response
			.proof
			.ok_or_else(|| Error::InvalidApiResponse("proof response has no proof".into()))?
			.iter()
			.map(|node| {
				B256::from_str(node)
					.map_err(|e| Error::InvalidApiResponse(format!("bad proof node {}: {}", node, e)))
			})
			.collect::<Result<Vec<_>>>()?;

		let merkle_root = response
			.merkle_root
			.as_deref()
			.and_then(|r| B256::from_str(r).ok());

		Ok(Self {
			amount,
			proof,
			merkle_root,
		})
	}
}

/// Progress of the claim transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TxLifecycle {
	#[default]
	Idle,
	Submitted(B256),
	Confirmed(B256),
	Failed { hash: Option<B256>, reason: String },
}

impl TxLifecycle {
	/// Waiting for the chain to settle a submitted transaction.
	pub fn is_pending(&self) -> bool {
		matches!(self, TxLifecycle::Submitted(_))
	}

	pub fn hash(&self) -> Option<B256> {
		match self {
			TxLifecycle::Idle => None,
			TxLifecycle::Submitted(h) | TxLifecycle::Confirmed(h) => Some(*h),
			TxLifecycle::Failed { hash, .. } => *hash,
		}
	}
}

/// Everything loaded for the connected address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirdropSnapshot {
	pub eligibility: Eligibility,
	pub claim_status: ClaimStatus,
	/// Contract `startTime()` in unix seconds.
	pub start_time: Option<u64>,
	/// Native balance of the connected address.
	pub balance: Option<U256>,
}
