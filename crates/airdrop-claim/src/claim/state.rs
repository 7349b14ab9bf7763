//! Claim flow state machine
//!
//! Tracks where the user is in the flow: signed out, signing in, loading
//! airdrop data, ready to act, or waiting for a claim transaction. Transitions
//! are checked against a static table and every accepted change is published
//! on the event bus.

use crate::core::events::{ClaimEvent, EventBus};
use crate::types::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tokio::sync::watch;

/// Position in the claim flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClaimState {
	#[default]
	Unauthenticated,
	Authenticating,
	Loading,
	Ready {
		eligible: bool,
	},
	Claiming,
	Claimed,
	ClaimFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
	Unauthenticated,
	Authenticating,
	Loading,
	Ready,
	Claiming,
	Claimed,
	ClaimFailed,
}

impl ClaimState {
	fn kind(&self) -> Kind {
		match self {
			ClaimState::Unauthenticated => Kind::Unauthenticated,
			ClaimState::Authenticating => Kind::Authenticating,
			ClaimState::Loading => Kind::Loading,
			ClaimState::Ready { .. } => Kind::Ready,
			ClaimState::Claiming => Kind::Claiming,
			ClaimState::Claimed => Kind::Claimed,
			ClaimState::ClaimFailed => Kind::ClaimFailed,
		}
	}

	pub fn is_authenticated(&self) -> bool {
		!matches!(
			self,
			ClaimState::Unauthenticated | ClaimState::Authenticating
		)
	}

	/// Checks the transition table. Staying in the same kind of state is
	/// always allowed so a ready view can flip eligibility without reloading.
	pub fn can_transition_to(&self, to: &ClaimState) -> bool {
		static TRANSITIONS: Lazy<HashMap<Kind, HashSet<Kind>>> = Lazy::new(|| {
			let mut m = HashMap::new();
			m.insert(
				Kind::Unauthenticated,
				HashSet::from([Kind::Authenticating, Kind::Loading]),
			);
			m.insert(
				Kind::Authenticating,
				HashSet::from([Kind::Loading, Kind::Unauthenticated]),
			);
			m.insert(
				Kind::Loading,
				HashSet::from([Kind::Ready, Kind::Unauthenticated]),
			);
			m.insert(
				Kind::Ready,
				HashSet::from([Kind::Claiming, Kind::Loading, Kind::Unauthenticated]),
			);
			m.insert(
				Kind::Claiming,
				HashSet::from([
					Kind::Claimed,
					Kind::ClaimFailed,
					Kind::Ready,
					Kind::Unauthenticated,
				]),
			);
			m.insert(
				Kind::Claimed,
				HashSet::from([Kind::Loading, Kind::Unauthenticated]),
			);
			m.insert(
				Kind::ClaimFailed,
				HashSet::from([Kind::Loading, Kind::Unauthenticated]),
			);
			m
		});

		let (from, to) = (self.kind(), to.kind());
		from == to || TRANSITIONS.get(&from).is_some_and(|next| next.contains(&to))
	}
}

impl fmt::Display for ClaimState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ClaimState::Unauthenticated => write!(f, "Unauthenticated"),
			ClaimState::Authenticating => write!(f, "Authenticating"),
			ClaimState::Loading => write!(f, "Loading"),
			ClaimState::Ready { eligible: true } => write!(f, "Ready (eligible)"),
			ClaimState::Ready { eligible: false } => write!(f, "Ready (not eligible)"),
			ClaimState::Claiming => write!(f, "Claiming"),
			ClaimState::Claimed => write!(f, "Claimed"),
			ClaimState::ClaimFailed => write!(f, "ClaimFailed"),
		}
	}
}

/// Holder of the current [`ClaimState`]
pub struct ClaimStateMachine {
	state: watch::Sender<ClaimState>,
	events: EventBus,
}

impl ClaimStateMachine {
	pub fn new(events: EventBus) -> Self {
		let (state, _) = watch::channel(ClaimState::default());
		Self { state, events }
	}

	pub fn current(&self) -> ClaimState {
		*self.state.borrow()
	}

	pub fn subscribe(&self) -> watch::Receiver<ClaimState> {
		self.state.subscribe()
	}

	/// Moves to `to`, returning the previous state
	///
	/// # Errors
	/// Returns `InvalidTransition` if the table does not allow the move; the
	/// state is left unchanged in that case
	pub fn transition(&self, to: ClaimState) -> Result<ClaimState> {
		self.apply(to, |from| {
			(!from.can_transition_to(&to)).then(|| Error::InvalidTransition {
				from: from.to_string(),
				to: to.to_string(),
			})
		})
	}

	/// Enters `Claiming`, checking and switching under one lock
	///
	/// # Errors
	/// Returns `ClaimInProgress` if a claim already runs and
	/// `InvalidTransition` if no data is loaded
	pub fn begin_claim(&self) -> Result<ClaimState> {
		let to = ClaimState::Claiming;
		self.apply(to, |from| match from {
			ClaimState::Claiming => Some(Error::ClaimInProgress),
			_ if !from.can_transition_to(&to) => Some(Error::InvalidTransition {
				from: from.to_string(),
				to: to.to_string(),
			}),
			_ => None,
		})
	}

	fn apply(
		&self,
		to: ClaimState,
		reject: impl FnOnce(ClaimState) -> Option<Error>,
	) -> Result<ClaimState> {
		let mut outcome = Ok(ClaimState::default());
		self.state.send_if_modified(|current| {
			let from = *current;
			if let Some(e) = reject(from) {
				outcome = Err(e);
				return false;
			}
			outcome = Ok(from);
			*current = to;
			from != to
		});

		let from = outcome?;
		if from != to {
			tracing::debug!(%from, %to, "Claim state changed");
			let _ = self.events.publish(ClaimEvent::StateChanged { from, to });
		}
		Ok(from)
	}

	/// Returns to the signed-out state from anywhere
	pub fn reset(&self) {
		let _ = self.transition(ClaimState::Unauthenticated);
	}
}
