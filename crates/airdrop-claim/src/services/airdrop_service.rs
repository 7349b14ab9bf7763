//! Airdrop queries
//!
//! Read-only backend lookups for the authenticated address. Each call is
//! independent and may fail on its own; no retries happen here.

use crate::core::api::ApiClient;
use crate::types::api::{
	AirdropClaimStatusResponse, AirdropEligibleResponse, AirdropProofResponse,
	AirdropRootResponse, ApiResponse,
};
use tracing::instrument;

#[derive(Clone)]
pub struct AirdropService {
	api: ApiClient,
}

impl AirdropService {
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	/// `GET /api/airdrop/eligible`
	#[instrument(skip(self))]
	pub async fn eligibility(&self) -> ApiResponse<AirdropEligibleResponse> {
		self.api.get("/api/airdrop/eligible").await
	}

	/// `GET /api/airdrop/claim-status`
	#[instrument(skip(self))]
	pub async fn claim_status(&self) -> ApiResponse<AirdropClaimStatusResponse> {
		self.api.get("/api/airdrop/claim-status").await
	}

	/// `GET /api/airdrop/proof`
	#[instrument(skip(self))]
	pub async fn proof(&self) -> ApiResponse<AirdropProofResponse> {
		self.api.get("/api/airdrop/proof").await
	}

	/// `GET /api/airdrop/root`
	#[instrument(skip(self))]
	pub async fn merkle_root(&self) -> ApiResponse<AirdropRootResponse> {
		self.api.get("/api/airdrop/root").await
	}
}
