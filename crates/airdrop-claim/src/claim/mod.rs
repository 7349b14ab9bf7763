//! Claim flow: state machine, button gating and the orchestrator tying the
//! wallet, backend and chain together.

pub mod gating;
pub mod orchestrator;
pub mod state;

pub use gating::{claim_button, claim_enabled, has_enough_balance, ClaimButton, ClaimView};
pub use orchestrator::{classify_claim_error, ClaimOrchestrator, ClaimSettings};
pub use state::{ClaimState, ClaimStateMachine};
