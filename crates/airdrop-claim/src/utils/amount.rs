use crate::types::error::{Error, Result};
use alloy_primitives::U256;

/// Parse a base-unit integer string (decimal, or hex with 0x prefix)
pub fn parse_base_units(amount_str: &str) -> Result<U256> {
	let s = amount_str.trim();
	if s.is_empty() {
		return Err(Error::InvalidAmount("empty amount".to_string()));
	}

	let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
		Some(hex) => U256::from_str_radix(hex, 16),
		None => U256::from_str_radix(s, 10),
	};

	parsed.map_err(|e| Error::InvalidAmount(format!("{s}: {e}")))
}

/// Whole-token part of a base-unit amount: `floor(amount / 10^decimals)`
pub fn whole_units(amount: U256, decimals: u8) -> U256 {
	amount / U256::from(10).pow(U256::from(decimals))
}

/// Whole-token display of an 18-decimal amount
pub fn display_whole(amount: U256) -> String {
	whole_units(amount, 18).to_string()
}

/// Whole-token display of a base-unit string; unparsable input shows as 0
pub fn display_whole_str(amount_str: &str) -> String {
	parse_base_units(amount_str)
		.map(display_whole)
		.unwrap_or_else(|_| "0".to_string())
}

/// Format amount with specified decimals to human-readable string
pub fn format_amount_with_decimals(amount: U256, decimals: u8) -> String {
	if amount.is_zero() {
		return "0.0".to_string();
	}

	let divisor = U256::from(10).pow(U256::from(decimals));
	let whole = amount / divisor;
	let fractional = amount % divisor;

	let fractional_str = format!("{:0>width$}", fractional, width = decimals as usize);
	let trimmed = fractional_str.trim_end_matches('0');

	if trimmed.is_empty() {
		format!("{}.0", whole)
	} else {
		format!("{}.{}", whole, trimmed)
	}
}

/// Format amount rounded (half up) to a fixed number of fractional places
pub fn format_fixed(amount: U256, decimals: u8, places: u8) -> String {
	let places = places.min(decimals);
	let scale = U256::from(10).pow(U256::from(decimals - places));
	let half = scale / U256::from(2);
	let rounded = if scale > U256::from(1) {
		(amount + half) / scale
	} else {
		amount
	};

	if places == 0 {
		return rounded.to_string();
	}

	let unit = U256::from(10).pow(U256::from(places));
	let whole = rounded / unit;
	let fractional = rounded % unit;
	format!(
		"{}.{:0>width$}",
		whole,
		fractional.to_string(),
		width = places as usize
	)
}
