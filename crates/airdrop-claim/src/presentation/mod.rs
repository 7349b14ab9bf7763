//! Derived display values: countdown and vesting round cards.

pub mod countdown;
pub mod phase;

pub use countdown::{countdown_text, CountdownTimer};
pub use phase::{allocation_text, balance_warning, phase_cards, PhaseCard, PhaseDates, PhaseTone};
