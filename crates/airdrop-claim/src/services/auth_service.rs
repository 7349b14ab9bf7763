//! Signature-based authentication against the backend
//!
//! Login is a three step exchange: fetch a challenge message for the address,
//! have the wallet sign it, and trade address + signature + message for a
//! bearer token. This service owns the first and last step and is the only
//! place a session credential gets written.

use crate::core::api::ApiClient;
use crate::core::session::{SessionContext, SessionCredential};
use crate::types::api::{
	ApiResponse, AuthMessageResponse, LoginRequest, LoginResponse, VerifyResponse,
};
use alloy_primitives::Address;
use tracing::instrument;

/// Backend authentication endpoints plus credential bookkeeping
#[derive(Clone)]
pub struct AuthService {
	api: ApiClient,
	session: SessionContext,
}

impl AuthService {
	pub fn new(api: ApiClient, session: SessionContext) -> Self {
		Self { api, session }
	}

	pub fn session(&self) -> &SessionContext {
		&self.session
	}

	/// Fetches the challenge message `address` must sign
	#[instrument(skip(self), fields(address = %address))]
	pub async fn get_message(&self, address: &Address) -> ApiResponse<AuthMessageResponse> {
		self.api
			.get(&format!("/api/auth/message/{}", address.to_checksum(None)))
			.await
	}

	/// Exchanges a signed challenge for a session credential
	///
	/// On success the credential is persisted with a three hour lifetime. A
	/// failed login leaves any existing credential untouched.
	#[instrument(skip(self, signature, message), fields(address = %address))]
	pub async fn login(
		&self,
		address: &Address,
		signature: &str,
		message: &str,
	) -> ApiResponse<LoginResponse> {
		let request = LoginRequest {
			address: address.to_checksum(None),
			signature: signature.to_string(),
			message: message.to_string(),
		};

		let response: ApiResponse<LoginResponse> = self.api.post("/api/auth/login", &request).await;

		let token = response
			.data
			.as_ref()
			.filter(|_| response.success)
			.map(|d| d.token.clone())
			.filter(|t| !t.is_empty());

		if let Some(token) = token {
			let bound_address = response
				.data
				.as_ref()
				.map(|d| d.address.clone())
				.filter(|a| !a.is_empty())
				.unwrap_or_else(|| request.address.clone());

			if let Err(e) = self.session.store(SessionCredential::issue(token, bound_address)) {
				tracing::error!("Failed to persist session credential: {}", e);
				return ApiResponse::failure(e.to_string(), response.status);
			}
			tracing::info!("Login succeeded");
		} else {
			tracing::warn!(error = ?response.error, "Login rejected");
		}

		response
	}

	/// Asks the backend which address the current credential belongs to
	#[instrument(skip(self))]
	pub async fn verify(&self) -> ApiResponse<VerifyResponse> {
		self.api
			.post("/api/auth/verify", &serde_json::json!({}))
			.await
	}

	/// Checks that the current credential is live and bound to `address`
	///
	/// Fails closed: a mismatch, an API error or a network error all clear the
	/// credential and report `false`.
	#[instrument(skip(self), fields(address = %address))]
	pub async fn verify_for(&self, address: &Address) -> bool {
		let response = self.verify().await;
		let expected = address.to_checksum(None);

		let valid = response.success
			&& response
				.data
				.as_ref()
				.map(|d| d.address.eq_ignore_ascii_case(&expected))
				.unwrap_or(false);

		if !valid {
			tracing::info!(error = ?response.error, "Session verification failed");
			self.session.clear();
		}
		valid
	}

	/// Ends the session locally
	pub fn logout(&self) {
		self.session.clear();
		tracing::info!("Logged out");
	}
}
