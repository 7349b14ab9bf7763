//! HTTP client for the airdrop backend
//!
//! Wraps every request in a uniform [`ApiResponse`] so callers never deal with
//! transport errors directly. The bearer credential is read from the shared
//! [`SessionContext`] on each request, and a 401 from any endpoint ends the
//! session and sends the user back to the login view.

use crate::constants::HTTP_TIMEOUT_SECS;
use crate::core::navigation::{is_login_path, Navigator};
use crate::core::session::SessionContext;
use crate::types::api::ApiResponse;
use crate::types::error::Result;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Backend API client with session-aware authentication
#[derive(Clone)]
pub struct ApiClient {
	client: Client,
	base_url: String,
	session: SessionContext,
	navigator: Arc<dyn Navigator>,
}

impl ApiClient {
	/// Creates a new API client with specified base URL
	///
	/// # Arguments
	/// * `base_url` - Backend root URL; a trailing slash is ignored
	/// * `session` - Credential source for the `Authorization` header
	/// * `navigator` - Receives the login redirect on 401
	///
	/// # Errors
	/// Returns error if HTTP client construction fails
	pub fn new(
		base_url: &str,
		session: SessionContext,
		navigator: Arc<dyn Navigator>,
	) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
			.build()?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
			session,
			navigator,
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
		self.send(self.client.get(self.url(path))).await
	}

	pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResponse<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		self.send(self.client.post(self.url(path)).json(body)).await
	}

	pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResponse<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		self.send(self.client.put(self.url(path)).json(body)).await
	}

	pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResponse<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		self.send(self.client.patch(self.url(path)).json(body)).await
	}

	pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
		self.send(self.client.delete(self.url(path))).await
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}

	async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResponse<T> {
		let mut request = request.header(ACCEPT, "application/json");
		if let Some(token) = self.session.token() {
			request = request.bearer_auth(token);
		}

		match request.send().await {
			Ok(response) => self.handle_response(response).await,
			Err(e) => {
				tracing::warn!("Backend request failed: {}", e);
				ApiResponse::failure(e.to_string(), e.status().map(|s| s.as_u16()))
			},
		}
	}

	/// Normalizes a backend response
	///
	/// Error text prefers the `message` field of a JSON error body.
	async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResponse<T> {
		let status = response.status();
		let body = response.bytes().await.unwrap_or_default();
		let json: Option<serde_json::Value> = serde_json::from_slice(&body).ok();
		let message = json
			.as_ref()
			.and_then(|v| v.get("message"))
			.and_then(|m| m.as_str())
			.map(String::from);

		if !status.is_success() {
			if status == StatusCode::UNAUTHORIZED {
				self.on_unauthorized();
			}
			let error = message
				.unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
			tracing::debug!(status = status.as_u16(), error = %error, "Backend returned error");
			return ApiResponse::failure(error, Some(status.as_u16()));
		}

		let decoded = match json {
			Some(value) => serde_json::from_value::<T>(value),
			None => serde_json::from_slice::<T>(&body),
		};

		match decoded {
			Ok(data) => ApiResponse::ok(data, message, status.as_u16()),
			Err(e) => {
				tracing::warn!(status = status.as_u16(), "Undecodable backend response: {}", e);
				ApiResponse::failure(format!("Invalid API response: {e}"), Some(status.as_u16()))
			},
		}
	}

	/// Ends the session after a 401
	///
	/// Concurrent requests can all be rejected; only the first one away from
	/// the login view redirects so the `redirect` target survives.
	fn on_unauthorized(&self) {
		tracing::info!("Session rejected by backend, clearing credential");
		self.session.clear();
		if is_login_path(&self.navigator.current_path()) {
			tracing::debug!("Already on the login view");
			return;
		}
		self.navigator.redirect_to_login();
	}
}
