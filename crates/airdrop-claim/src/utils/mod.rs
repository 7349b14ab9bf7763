//! Amount conversion and display formatting helpers.

pub mod amount;
pub mod format;

pub use amount::{display_whole, format_amount_with_decimals, format_fixed, parse_base_units};
pub use format::{shorten_address, tx_link};
