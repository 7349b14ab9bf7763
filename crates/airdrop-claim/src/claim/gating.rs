//! Claim button gating and labeling
//!
//! Pure functions over the loaded airdrop data. The backend's `can_claim`
//! flags decide availability; the locally derived phase-2 date only feeds the
//! countdown shown next to the round 2 label.

use crate::types::airdrop::ClaimStatus;
use alloy_primitives::U256;

/// Inputs of the claim button
#[derive(Debug, Clone)]
pub struct ClaimView<'a> {
	pub claim_status: &'a ClaimStatus,
	/// A claim is being submitted or waits for its receipt.
	pub pending: bool,
	/// Native balance; unknown counts as insufficient.
	pub balance: Option<U256>,
	pub min_gas_reserve: U256,
	/// Unix seconds of phase 2, when the contract start time is known.
	pub phase2_at: Option<u64>,
	pub now: u64,
	pub native_symbol: &'a str,
}

/// Resolved claim button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimButton {
	pub enabled: bool,
	pub label: String,
	/// Countdown target displayed next to the label.
	pub countdown_target: Option<u64>,
}

/// Whether the balance covers the gas reserve
pub fn has_enough_balance(balance: Option<U256>, min_gas_reserve: U256) -> bool {
	balance.is_some_and(|b| !b.is_zero() && b >= min_gas_reserve)
}

/// Enable formula: some phase claimable, nothing pending, enough gas
pub fn claim_enabled(status: &ClaimStatus, pending: bool, enough_balance: bool) -> bool {
	status.any_claimable() && !pending && enough_balance
}

/// Resolves the claim button from the current view
pub fn claim_button(view: &ClaimView<'_>) -> ClaimButton {
	let status = view.claim_status;
	let enough = has_enough_balance(view.balance, view.min_gas_reserve);
	let enabled = claim_enabled(status, view.pending, enough);

	let mut countdown_target = None;
	let label = if view.pending {
		"Processing...".to_string()
	} else if !enough {
		format!("Insufficient {} for Gas", view.native_symbol)
	} else if status.all_claimed() {
		"Claimed".to_string()
	} else if status.phase1.can_claim && status.phase2.can_claim {
		"Claim full allocation".to_string()
	} else if status.phase1.can_claim {
		"Claim Round 1 Tokens".to_string()
	} else {
		countdown_target = view.phase2_at.filter(|at| *at > view.now);
		"Claim Round 2 Tokens".to_string()
	};

	ClaimButton {
		enabled,
		label,
		countdown_target,
	}
}
