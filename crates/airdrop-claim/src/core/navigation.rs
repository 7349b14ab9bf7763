//! In-app navigation
//!
//! The client has two views: the login view and the claim view. The router
//! tracks which one is current so an expired session can send the user back
//! to login while remembering where they came from.

use crate::constants::{HOME_PATH, LOGIN_PATH};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;
use tokio::sync::watch;

/// Characters `encodeURIComponent` leaves as they are.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// Navigation sink used by components that must move the user elsewhere.
pub trait Navigator: Send + Sync {
	/// Path of the current view.
	fn current_path(&self) -> String;

	/// Replaces the current view with `target`.
	fn replace(&self, target: &str);

	/// Sends the user to the login view, preserving the current path.
	fn redirect_to_login(&self) {
		let target = login_redirect_target(&self.current_path());
		tracing::info!(to = %target, "Redirecting to login");
		self.replace(&target);
	}
}

/// Login target for a redirect away from `current_path`
///
/// `/login` itself redirects to plain `/login`; everything else carries the
/// url-encoded origin path in the `redirect` query parameter.
pub fn login_redirect_target(current_path: &str) -> String {
	if is_login_path(current_path) {
		return LOGIN_PATH.to_string();
	}
	let pathname = current_path.split('?').next().unwrap_or(current_path);
	format!(
		"{}?redirect={}",
		LOGIN_PATH,
		utf8_percent_encode(pathname, COMPONENT)
	)
}

/// Whether `path` points at the login view, with or without a query
pub fn is_login_path(path: &str) -> bool {
	path.split('?').next() == Some(LOGIN_PATH)
}

/// Extracts the `redirect` target of a login path, defaulting to home
///
/// Only same-origin absolute paths are followed; `//host` is rejected.
pub fn redirect_destination(login_path: &str) -> String {
	login_path
		.split_once('?')
		.and_then(|(_, query)| {
			url::form_urlencoded::parse(query.as_bytes())
				.find(|(k, _)| k == "redirect")
				.map(|(_, v)| v.into_owned())
		})
		.filter(|v| v.starts_with('/') && !v.starts_with("//"))
		.unwrap_or_else(|| HOME_PATH.to_string())
}

/// Watchable router holding the current path
#[derive(Debug, Clone)]
pub struct Router {
	path: Arc<watch::Sender<String>>,
}

impl Router {
	pub fn new(initial: &str) -> Self {
		let (tx, _) = watch::channel(initial.to_string());
		Self { path: Arc::new(tx) }
	}

	pub fn subscribe(&self) -> watch::Receiver<String> {
		self.path.subscribe()
	}

	/// Whether the current view is the login view
	pub fn on_login(&self) -> bool {
		is_login_path(&self.path.borrow())
	}
}

impl Default for Router {
	fn default() -> Self {
		Self::new(HOME_PATH)
	}
}

impl Navigator for Router {
	fn current_path(&self) -> String {
		self.path.borrow().clone()
	}

	fn replace(&self, target: &str) {
		self.path.send_replace(target.to_string());
	}
}
