//! Backend request and response bodies.
//!
//! Field names follow the backend's camelCase JSON. Every field a response
//! might omit is defaulted so a partial body still decodes.

use crate::types::airdrop::ClaimStatus;
use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize};

/// Normalized result of one backend request.
///
/// Transport, HTTP and decode failures never surface as `Err`; they are
/// recorded in `error` and `status` with `success == false`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
	pub success: bool,
	pub data: Option<T>,
	pub message: Option<String>,
	pub error: Option<String>,
	pub status: Option<u16>,
}

impl<T> ApiResponse<T> {
	pub fn ok(data: T, message: Option<String>, status: u16) -> Self {
		Self {
			success: true,
			data: Some(data),
			message,
			error: None,
			status: Some(status),
		}
	}

	pub fn failure(error: impl Into<String>, status: Option<u16>) -> Self {
		Self {
			success: false,
			data: None,
			message: None,
			error: Some(error.into()),
			status,
		}
	}

	/// True when the backend answered 401.
	pub fn is_unauthorized(&self) -> bool {
		self.status == Some(401)
	}

	/// Returns the payload of a successful response.
	pub fn into_data(self) -> Option<T> {
		if self.success {
			self.data
		} else {
			None
		}
	}

	/// Best available error text, falling back to `default`.
	pub fn error_or(&self, default: &str) -> String {
		self.error
			.clone()
			.filter(|e| !e.is_empty())
			.unwrap_or_else(|| default.to_string())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthMessageResponse {
	pub success: bool,
	pub message: String,
	pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
	pub address: String,
	pub signature: String,
	pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginResponse {
	pub success: bool,
	pub message: Option<String>,
	pub token: String,
	pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyResponse {
	pub success: bool,
	pub message: Option<String>,
	pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AirdropEligibleResponse {
	pub success: bool,
	pub eligible: bool,
	pub address: Option<String>,
	pub message: Option<String>,
	/// Allocation in base units.
	#[serde(deserialize_with = "base_units")]
	pub amount: U256,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AirdropClaimStatusResponse {
	pub success: bool,
	pub eligible: bool,
	pub address: Option<String>,
	#[serde(deserialize_with = "base_units")]
	pub amount: U256,
	pub claim_status: Option<ClaimStatus>,
	pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AirdropProofResponse {
	pub success: bool,
	pub address: Option<String>,
	pub amount: Option<String>,
	pub proof: Option<Vec<String>>,
	pub merkle_root: Option<String>,
	pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AirdropRootResponse {
	pub success: bool,
	pub merkle_root: String,
	pub message: Option<String>,
}

/// Accepts a base-unit amount encoded as a decimal string, hex string or JSON
/// number. Missing or null values decode to zero.
fn base_units<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
	D: Deserializer<'de>,
{
	use serde::de::Error as _;

	let value = Option::<serde_json::Value>::deserialize(deserializer)?;
	match value {
		None | Some(serde_json::Value::Null) => Ok(U256::ZERO),
		Some(serde_json::Value::String(s)) => {
			crate::utils::amount::parse_base_units(&s).map_err(D::Error::custom)
		},
		Some(serde_json::Value::Number(n)) => {
			if let Some(v) = n.as_u64() {
				Ok(U256::from(v))
			} else {
				// Large integers arrive as floats; round-trip them through their
				// integral decimal form.
				let f = n
					.as_f64()
					.filter(|f| f.is_finite() && *f >= 0.0)
					.ok_or_else(|| D::Error::custom(format!("invalid amount: {}", n)))?;
				crate::utils::amount::parse_base_units(&format!("{:.0}", f))
					.map_err(D::Error::custom)
			}
		},
		Some(other) => Err(D::Error::custom(format!("invalid amount: {}", other))),
	}
}
