//! Logging setup and operation helpers
//!
//! Pairs user-facing terminal output with structured tracing events so that a
//! CLI run leaves both a readable transcript and a machine-filterable log.

use crate::cli::output::Display;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "airdrop_claim=info,airdrop_wallet=info,warn";
const DEBUG_FILTER: &str = "airdrop_claim=debug,airdrop_wallet=debug,warn";

/// Initialize structured logging
///
/// `RUST_LOG` wins over both defaults. Calling this twice is harmless; the
/// second initialization attempt is ignored.
///
/// # Arguments
/// * `debug` - Use the debug-level default filter
pub fn init_logging(debug: bool) {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let default = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

	let _ = tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_target(true)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.try_init();
}

/// Reports a completed operation to the user and the log
///
/// # Arguments
/// * `operation` - Name of the operation that completed
/// * `details` - Additional context for logging
pub fn operation_success(operation: &str, details: &str) {
	Display::success(&format!("{} completed successfully", operation));
	info!(
		operation = operation,
		details = details,
		"Operation completed successfully"
	);
}

/// Reports a failed operation to the user and the log
pub fn operation_error(operation: &str, error: &anyhow::Error) {
	Display::error(&format!("{} failed: {}", operation, error));
	error!(operation = operation, error = %error, "Operation failed");
}

/// Shows a warning and records its context
pub fn operation_warning(operation: &str, message: &str, context: &str) {
	Display::warning(message);
	warn!(
		operation = operation,
		message = message,
		context = context,
		"Operation warning"
	);
}

pub fn operation_start(operation: &str, context: &str) {
	info!(operation = operation, context = context, "Operation started");
}
