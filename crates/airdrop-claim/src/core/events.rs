//! Event bus for user-facing claim notifications.
//!
//! The orchestrator publishes notifications (the toast messages of the claim
//! flow), state changes and transaction lifecycle updates. Front ends such as
//! the CLI subscribe and render them; having no subscriber is not an error.

use crate::claim::state::ClaimState;
use crate::types::airdrop::TxLifecycle;
use tokio::sync::broadcast;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
	Info,
	Success,
	Warning,
	Error,
}

/// Message shown to the user, optionally with an explorer link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	pub level: NotificationLevel,
	pub message: String,
	pub link: Option<String>,
}

impl Notification {
	pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
		Self {
			level,
			message: message.into(),
			link: None,
		}
	}

	pub fn with_link(mut self, link: impl Into<String>) -> Self {
		self.link = Some(link.into());
		self
	}
}

/// Events emitted by the claim flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimEvent {
	Notification(Notification),
	StateChanged { from: ClaimState, to: ClaimState },
	Tx(TxLifecycle),
}

/// Broadcast channel carrying [`ClaimEvent`]s to any number of subscribers
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<ClaimEvent>,
}

impl EventBus {
	/// Creates a bus buffering up to `capacity` events per lagging subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<ClaimEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns an error if there are no active subscribers.
	pub fn publish(&self, event: ClaimEvent) -> Result<(), broadcast::error::SendError<ClaimEvent>> {
		self.sender.send(event)?;
		Ok(())
	}

	/// Publishes a notification, ignoring the absence of subscribers.
	pub fn notify(&self, notification: Notification) {
		let _ = self.publish(ClaimEvent::Notification(notification));
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(64)
	}
}
