//! Terminal rendering for the claim client
//!
//! Colored status lines, key/value rows and the renderers for claim
//! notifications, phase cards and the wallet picker.

use crate::core::events::{Notification, NotificationLevel};
use crate::presentation::phase::{PhaseCard, PhaseTone};
use airdrop_wallet::WalletOption;
use colored::Colorize;

/// Terminal display utilities
pub struct Display;

impl Display {
	/// Section header with underline
	pub fn header(text: &str) {
		println!("\n{}", text.bold().cyan());
		println!("{}", "─".repeat(text.chars().count()).cyan());
	}

	pub fn success(message: &str) {
		println!("{} {}", "✓".green().bold(), message);
	}

	/// Error line on stderr
	pub fn error(message: &str) {
		eprintln!("{} {}", "✗".red().bold(), message.red());
	}

	pub fn warning(message: &str) {
		println!("{} {}", "⚠".yellow().bold(), message.yellow());
	}

	pub fn info(message: &str) {
		println!("{} {}", "ℹ".blue().bold(), message);
	}

	/// Key/value row with a bold label
	pub fn kv(key: &str, value: &str) {
		println!("  {} {}", format!("{}:", key).bold(), value);
	}

	pub fn section(title: &str) {
		println!("\n{}", format!("▸ {}", title).bold());
	}

	/// Numbered list of follow-up steps
	pub fn next_steps(steps: &[&str]) {
		Self::section("Next Steps");
		for (i, step) in steps.iter().enumerate() {
			println!("  {}. {}", i + 1, step);
		}
	}

	/// Renders a claim flow notification, with its explorer link if any
	pub fn notification(notification: &Notification) {
		match notification.level {
			NotificationLevel::Info => Self::info(&notification.message),
			NotificationLevel::Success => Self::success(&notification.message),
			NotificationLevel::Warning => Self::warning(&notification.message),
			NotificationLevel::Error => Self::error(&notification.message),
		}
		if let Some(link) = &notification.link {
			println!("  {} {}", "↳".dimmed(), link.underline());
		}
	}

	/// One vesting round with its status colored by tone
	pub fn phase_card(card: &PhaseCard) {
		Self::section(&card.title);
		Self::kv("Amount", &card.amount);
		Self::kv("Claim date", &card.claim_date);
		let status = match card.tone {
			PhaseTone::Success => card.status_text.green(),
			PhaseTone::Ready => card.status_text.cyan(),
			PhaseTone::Locked => card.status_text.yellow(),
			PhaseTone::Unknown => card.status_text.dimmed(),
		};
		println!("  {} {}", "Status:".bold(), status);
	}

	/// Wallet picker entries; wallets that are not installed are greyed out
	pub fn wallet_options(options: &[WalletOption]) {
		for option in options {
			if option.installed {
				println!("  {} {} ({})", "●".green(), option.name.bold(), option.id);
			} else {
				println!(
					"  {} {}",
					"○".dimmed(),
					format!("{} ({}) - not installed", option.name, option.id).dimmed()
				);
			}
		}
	}
}
