pub mod create;
pub mod execute;
pub mod proposals;
pub mod status;
pub mod vote;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::coordinator::Confirmed;
use crate::dashboard::Dashboard;
use crate::session::ProviderConnector;
use crate::wallet;

const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a dashboard from the saved configuration (does not connect)
pub fn open_dashboard() -> Result<(Config, Dashboard)> {
    let config = Config::load()?;
    let contracts = config.contracts()?;

    let signer = wallet::load_signer(&config)?;

    let connector = Arc::new(ProviderConnector::new(
        config.rpc_url.clone(),
        RPC_REQUEST_TIMEOUT,
        signer,
    ));
    let dashboard = Dashboard::new(
        connector,
        config.chain_id,
        contracts,
        config.confirmation_policy(),
    );

    Ok((config, dashboard))
}

/// Connect and load the snapshot, printing what is going on
pub async fn connect(dashboard: &Dashboard, config: &Config) -> Result<()> {
    println!(
        "{}",
        format!("Connecting to {} ({})...", config.network, config.rpc_url).dimmed()
    );

    dashboard
        .connect()
        .await
        .context("Failed to load dashboard")?;

    if let Some(session) = dashboard.current_session() {
        println!("  Wallet: {}", session.address.to_string().bright_yellow());
    }
    println!();

    Ok(())
}

/// Spinner shown while a transaction waits to be mined
pub fn confirmation_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

pub fn print_confirmed(confirmed: &Confirmed) {
    println!("  Transaction: {}", confirmed.receipt.hash.to_string().bright_yellow());
    println!("  Block:       {}", confirmed.receipt.block_number);
    if !confirmed.refreshed {
        println!(
            "{}",
            "⚠ Could not refresh proposals after confirmation. Run 'dao-dashboard proposals' to reload"
                .yellow()
        );
    }
}
