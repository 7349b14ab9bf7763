//! Command-line entry point of the airdrop claim client

use airdrop_claim::{
	claim::has_enough_balance,
	cli::{output::Display, Cli, Commands},
	core::{
		events::ClaimEvent,
		logging::{operation_error, operation_start, operation_success, operation_warning},
	},
	init_logging,
	presentation::{self, countdown::countdown_text, CountdownTimer},
	types::TxLifecycle,
	utils::format::{address_link, shorten_address},
	ClaimState, Config, Context,
};
use airdrop_wallet::{WalletId, WalletPicker};
use anyhow::{bail, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tracing::instrument;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.debug);

	let config = Config::load(cli.config.as_deref())?;
	let ctx = Context::build(config).await?;

	let result = run(&ctx, cli.wallet, cli.command).await;
	if let Err(e) = &result {
		operation_error("airdrop-claim", e);
	}
	result
}

async fn run(ctx: &Context, wallet: WalletId, command: Commands) -> Result<()> {
	match command {
		Commands::Wallets => {
			handle_wallets(ctx);
			Ok(())
		},
		Commands::Logout => {
			ctx.orchestrator.logout();
			operation_success("Logout", "session cleared");
			Ok(())
		},
		Commands::Login => handle_login(ctx, wallet).await,
		Commands::Status { verbose } => handle_status(ctx, wallet, verbose).await,
		Commands::Claim => handle_claim(ctx, wallet).await,
		Commands::Countdown => handle_countdown(ctx, wallet).await,
	}
}

fn handle_wallets(ctx: &Context) {
	Display::header("Wallets");
	Display::wallet_options(ctx.wallet.options());
	if ctx.wallet.options().iter().all(|o| !o.installed) {
		Display::next_steps(&[
			"Set AIRDROP_PRIVATE_KEY to sign with a local key, or",
			"Set AIRDROP_INJECTED_RPC to the JSON-RPC endpoint of your wallet",
		]);
	}
}

/// Connects the chosen wallet through the picker and signs in
#[instrument(skip(ctx))]
async fn connect_and_sign_in(ctx: &Context, wallet: WalletId) -> Result<ClaimState> {
	operation_start("connect", &wallet.to_string());

	let mut picker = WalletPicker::default();
	picker.open();
	let chosen = ctx
		.wallet
		.options()
		.iter()
		.find(|o| o.id == wallet)
		.and_then(|option| picker.select(option));
	let Some(chosen) = chosen else {
		bail!("{} is not available, run `airdrop-claim wallets`", wallet.display_name());
	};

	let Some(connection) = ctx.wallet.connect(chosen).await? else {
		bail!("{} is not installed", chosen.display_name());
	};
	if let Some(address) = connection.address {
		Display::kv("Wallet", &shorten_address(&address));
	}

	let state = ctx.orchestrator.on_wallet_change().await?;
	if let Some(error) = ctx.orchestrator.auth_error() {
		bail!(error);
	}
	Ok(state)
}

async fn handle_login(ctx: &Context, wallet: WalletId) -> Result<()> {
	let state = connect_and_sign_in(ctx, wallet).await?;
	if state.is_authenticated() {
		operation_success("Login", &state.to_string());
	} else {
		operation_warning("Login", "Not signed in", &state.to_string());
	}
	Ok(())
}

async fn handle_status(ctx: &Context, wallet: WalletId, verbose: bool) -> Result<()> {
	let state = connect_and_sign_in(ctx, wallet).await?;
	if !state.is_authenticated() || !ctx.orchestrator.check_access().await {
		bail!("Not signed in, run `airdrop-claim login`");
	}
	render_status(ctx, verbose).await;
	Ok(())
}

async fn render_status(ctx: &Context, verbose: bool) {
	let settings = ctx.orchestrator.settings();
	let snapshot = ctx.orchestrator.snapshot();
	let now = unix_now();

	Display::header("Airdrop");
	Display::kv(
		"Total allocation",
		&presentation::allocation_text(&snapshot.eligibility, &settings.token_symbol),
	);
	Display::kv(
		"Contract",
		&address_link(&settings.explorer_url, &settings.contract),
	);
	if verbose {
		let root = ctx.airdrop.merkle_root().await;
		match root.into_data() {
			Some(data) => Display::kv("Merkle root", &data.merkle_root),
			None => Display::kv("Merkle root", "unavailable"),
		}
	}

	let claim = &snapshot.claim_status;
	let cards = presentation::phase_cards(
		[&claim.phase1, &claim.phase2],
		ctx.orchestrator.phase_dates(),
		&settings.token_symbol,
	);
	for card in &cards {
		Display::phase_card(card);
	}

	let connected = ctx.wallet.connection().is_connected();
	if connected && !has_enough_balance(snapshot.balance, settings.min_gas_reserve) {
		println!();
		Display::warning(&presentation::balance_warning(
			snapshot.balance,
			settings.min_gas_reserve,
			&settings.native_name,
			&settings.native_symbol,
		));
	}

	let button = ctx.orchestrator.claim_button(now);
	let label = match button.countdown_target.and_then(|t| countdown_text(t, now)) {
		Some(countdown) => format!("{} ({})", button.label, countdown),
		None => button.label.clone(),
	};
	Display::section("Claim");
	if button.enabled {
		Display::success(&label);
	} else {
		Display::info(&format!("{} (unavailable)", label));
	}
}

async fn handle_claim(ctx: &Context, wallet: WalletId) -> Result<()> {
	let state = connect_and_sign_in(ctx, wallet).await?;
	if !state.is_authenticated() {
		bail!("Not signed in, run `airdrop-claim login`");
	}

	let button = ctx.orchestrator.claim_button(unix_now());
	if !button.enabled {
		Display::info(&format!("Nothing to claim: {}", button.label));
		return Ok(());
	}

	let mut events = ctx.events.subscribe();
	operation_start("claim", &button.label);

	let claim = ctx.orchestrator.claim();
	tokio::pin!(claim);
	let outcome = loop {
		tokio::select! {
			outcome = &mut claim => break outcome,
			event = events.recv() => show_event(event),
		}
	};
	while let Ok(event) = events.try_recv() {
		show_event(Ok(event));
	}

	match outcome? {
		TxLifecycle::Confirmed(hash) => {
			operation_success("Claim", &hash.to_string());
			render_status(ctx, false).await;
			Ok(())
		},
		TxLifecycle::Failed { reason, .. } => bail!(reason),
		other => {
			tracing::debug!(?other, "Claim finished without a transaction");
			Ok(())
		},
	}
}

fn show_event(event: Result<ClaimEvent, broadcast::error::RecvError>) {
	match event {
		Ok(ClaimEvent::Notification(notification)) => Display::notification(&notification),
		Ok(ClaimEvent::StateChanged { from, to }) => {
			tracing::debug!(%from, %to, "Claim state changed");
		},
		Ok(ClaimEvent::Tx(_)) => {},
		Err(e) => tracing::debug!("Notification stream interrupted: {}", e),
	}
}

async fn handle_countdown(ctx: &Context, wallet: WalletId) -> Result<()> {
	let state = connect_and_sign_in(ctx, wallet).await?;
	if !state.is_authenticated() {
		bail!("Not signed in, run `airdrop-claim login`");
	}
	let Some(dates) = ctx.orchestrator.phase_dates() else {
		bail!("Contract start time unavailable");
	};

	let timer = CountdownTimer::start(dates.phase2);
	let mut rx = timer.subscribe();
	loop {
		match rx.borrow_and_update().clone() {
			Some(text) => println!("Vesting Round 2 opens in {}", text),
			None => {
				Display::success("Vesting Round 2 is open");
				break;
			},
		}
		tokio::select! {
			changed = rx.changed() => {
				if changed.is_err() {
					break;
				}
			},
			_ = tokio::signal::ctrl_c() => break,
		}
	}
	Ok(())
}

fn unix_now() -> u64 {
	chrono::Utc::now().timestamp().max(0) as u64
}
