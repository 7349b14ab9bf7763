//! Vesting round cards and the claim page texts around them

use crate::types::airdrop::{Eligibility, PhaseClaimStatus, PhaseStatus};
use crate::utils::amount::{display_whole, display_whole_str, format_fixed};
use alloy_primitives::U256;
use chrono::{DateTime, Utc};

/// Color family of a phase status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTone {
	Success,
	Ready,
	Locked,
	Unknown,
}

/// Display model of one vesting round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseCard {
	pub title: String,
	pub amount: String,
	pub claim_date: String,
	pub status_text: &'static str,
	pub tone: PhaseTone,
}

/// Unix seconds of both rounds derived from the contract start time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDates {
	pub phase1: u64,
	pub phase2: u64,
}

impl PhaseDates {
	/// Round 1 opens at `start`, round 2 `phase2_offset` seconds later.
	pub fn from_start(start: u64, phase2_offset: u64) -> Self {
		Self {
			phase1: start,
			phase2: start.saturating_add(phase2_offset),
		}
	}
}

pub fn status_text(phase: &PhaseClaimStatus) -> &'static str {
	match (phase.status, phase.claimed, phase.can_claim) {
		(PhaseStatus::Claimed, true, _) => "Claimed Successfully",
		(PhaseStatus::NotClaimed, _, true) => "Ready to claim",
		_ => "Not available to claim",
	}
}

pub fn tone(phase: &PhaseClaimStatus) -> PhaseTone {
	match (phase.status, phase.claimed, phase.can_claim) {
		(PhaseStatus::Claimed, true, _) => PhaseTone::Success,
		(PhaseStatus::NotClaimed, _, true) => PhaseTone::Ready,
		(PhaseStatus::NotClaimed, _, false) => PhaseTone::Locked,
		_ => PhaseTone::Unknown,
	}
}

fn format_timestamp(secs: Option<u64>, pattern: &str) -> String {
	secs.and_then(|s| i64::try_from(s).ok())
		.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
		.map(|dt| dt.format(pattern).to_string())
		.unwrap_or_else(|| "N/A".to_string())
}

/// Round 1 date, `YYYY-MM-DD`
pub fn format_round1_date(secs: Option<u64>) -> String {
	format_timestamp(secs, "%Y-%m-%d")
}

/// Round 2 date, `YYYY-MM-DD HH:MM:SS` UTC
pub fn format_round2_date(secs: Option<u64>) -> String {
	format_timestamp(secs, "%Y-%m-%d %H:%M:%S")
}

/// Builds both round cards
///
/// # Arguments
/// * `phases` - Backend status of round 1 and round 2
/// * `dates` - Round dates when the contract start time is known
/// * `token_symbol` - Symbol appended to the amounts
pub fn phase_cards(
	phases: [&PhaseClaimStatus; 2],
	dates: Option<PhaseDates>,
	token_symbol: &str,
) -> [PhaseCard; 2] {
	let card = |index: usize, phase: &PhaseClaimStatus, date: String| PhaseCard {
		title: format!("Vesting Round {}", index),
		amount: format!("{} {}", display_whole_str(&phase.claimable_amount), token_symbol),
		claim_date: date,
		status_text: status_text(phase),
		tone: tone(phase),
	};

	[
		card(1, phases[0], format_round1_date(dates.map(|d| d.phase1))),
		card(2, phases[1], format_round2_date(dates.map(|d| d.phase2))),
	]
}

/// Total allocation line
pub fn allocation_text(eligibility: &Eligibility, token_symbol: &str) -> String {
	if eligibility.eligible {
		format!("{} {}", display_whole(eligibility.amount), token_symbol)
	} else {
		"Not eligible".to_string()
	}
}

/// Gas warning shown while the balance is below the reserve
pub fn balance_warning(
	balance: Option<U256>,
	min_gas_reserve: U256,
	native_name: &str,
	native_symbol: &str,
) -> String {
	let current = balance
		.map(|b| format!("{} {}", format_fixed(b, 18, 6), native_symbol))
		.unwrap_or_else(|| "Loading...".to_string());
	format!(
		"Insufficient {} for Gas Fees. Current balance: {} (Minimum required: {} {})",
		native_name,
		current,
		format_minimum(min_gas_reserve),
		native_symbol
	)
}

/// Reserve without trailing zeros, e.g. `0.0001`
fn format_minimum(reserve: U256) -> String {
	let fixed = format_fixed(reserve, 18, 18);
	let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
	if trimmed.is_empty() {
		"0".to_string()
	} else {
		trimmed.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn phase(status: PhaseStatus, claimed: bool, can_claim: bool) -> PhaseClaimStatus {
		PhaseClaimStatus {
			claimed,
			status,
			claimable_amount: "250000000000000000000".into(),
			can_claim,
		}
	}

	#[test]
	fn test_status_text_and_tone() {
		let claimed = phase(PhaseStatus::Claimed, true, false);
		let ready = phase(PhaseStatus::NotClaimed, false, true);
		let locked = phase(PhaseStatus::NotClaimed, false, false);
		let unknown = phase(PhaseStatus::Unknown, false, true);

		assert_eq!(status_text(&claimed), "Claimed Successfully");
		assert_eq!(tone(&claimed), PhaseTone::Success);
		assert_eq!(status_text(&ready), "Ready to claim");
		assert_eq!(tone(&ready), PhaseTone::Ready);
		assert_eq!(status_text(&locked), "Not available to claim");
		assert_eq!(tone(&locked), PhaseTone::Locked);
		assert_eq!(status_text(&unknown), "Not available to claim");
		assert_eq!(tone(&unknown), PhaseTone::Unknown);
	}

	#[test]
	fn test_phase_cards() {
		let p1 = phase(PhaseStatus::NotClaimed, false, true);
		let p2 = phase(PhaseStatus::NotClaimed, false, false);
		let dates = PhaseDates::from_start(1_700_000_000, 2_592_000);
		let [one, two] = phase_cards([&p1, &p2], Some(dates), "GOATED");

		assert_eq!(one.title, "Vesting Round 1");
		assert_eq!(one.amount, "250 GOATED");
		assert_eq!(one.claim_date, "2023-11-14");
		assert_eq!(two.title, "Vesting Round 2");
		assert_eq!(two.claim_date, "2023-12-14 22:13:20");

		let [one, _] = phase_cards([&p1, &p2], None, "GOATED");
		assert_eq!(one.claim_date, "N/A");
	}

	#[test]
	fn test_allocation_text() {
		let eligible = Eligibility {
			eligible: true,
			amount: U256::from(500u64) * U256::from(10u64).pow(U256::from(18u64)),
		};
		assert_eq!(allocation_text(&eligible, "GOATED"), "500 GOATED");
		assert_eq!(allocation_text(&Eligibility::default(), "GOATED"), "Not eligible");
	}

	#[test]
	fn test_balance_warning() {
		let text = balance_warning(
			Some(U256::from(50_000_000_000_000u64)),
			U256::from(100_000_000_000_000u64),
			"BNB Testnet",
			"BNB",
		);
		assert_eq!(
			text,
			"Insufficient BNB Testnet for Gas Fees. Current balance: 0.000050 BNB (Minimum required: 0.0001 BNB)"
		);
	}
}
