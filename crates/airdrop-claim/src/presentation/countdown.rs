//! Countdown to a unix timestamp

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Time left until `target`; `None` once it has passed
pub fn remaining(target: u64, now: u64) -> Option<Duration> {
	target
		.checked_sub(now)
		.filter(|secs| *secs > 0)
		.map(Duration::from_secs)
}

/// Renders the two coarsest units of `remaining`, starting at the first
/// nonzero one: `3d 4h`, `4h 0m`, `12m 5s`, `5s`
pub fn render(remaining: Duration) -> String {
	let total = remaining.as_secs();
	let days = total / 86_400;
	let hours = (total % 86_400) / 3_600;
	let minutes = (total % 3_600) / 60;
	let seconds = total % 60;

	if days > 0 {
		format!("{}d {}h", days, hours)
	} else if hours > 0 {
		format!("{}h {}m", hours, minutes)
	} else if minutes > 0 {
		format!("{}m {}s", minutes, seconds)
	} else {
		format!("{}s", seconds)
	}
}

/// Rendered countdown, or nothing for a past target
pub fn countdown_text(target: u64, now: u64) -> Option<String> {
	remaining(target, now).map(render)
}

fn unix_now() -> u64 {
	chrono::Utc::now().timestamp().max(0) as u64
}

/// Background ticker publishing the rendered countdown once per second
///
/// The receiver sees `None` once the target has passed, after which the task
/// stops. Dropping the timer aborts the task.
pub struct CountdownTimer {
	receiver: watch::Receiver<Option<String>>,
	handle: JoinHandle<()>,
}

impl CountdownTimer {
	/// Starts ticking towards `target` (unix seconds). Needs a tokio runtime.
	pub fn start(target: u64) -> Self {
		let (tx, receiver) = watch::channel(countdown_text(target, unix_now()));
		let handle = tokio::spawn(async move {
			let mut interval = tokio::time::interval(Duration::from_secs(1));
			loop {
				interval.tick().await;
				let text = countdown_text(target, unix_now());
				let expired = text.is_none();
				if tx.send(text).is_err() || expired {
					break;
				}
			}
		});
		Self { receiver, handle }
	}

	pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
		self.receiver.clone()
	}

	pub fn current(&self) -> Option<String> {
		self.receiver.borrow().clone()
	}

	pub fn is_finished(&self) -> bool {
		self.handle.is_finished()
	}
}

impl Drop for CountdownTimer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}
